use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RequirementError {
    #[error("Invalid bounds for '{kind}': max_count {max} is below min_count {min}")]
    InvalidBounds { kind: String, min: usize, max: usize },

    #[error("Volume must be a finite non-negative number, got {0}")]
    InvalidVolume(f64),

    #[error("Scale factor must be a finite non-negative number, got {0}")]
    InvalidScale(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bounds_display() {
        let e = RequirementError::InvalidBounds {
            kind: "driver".to_string(),
            min: 5,
            max: 2,
        };
        assert_eq!(
            e.to_string(),
            "Invalid bounds for 'driver': max_count 2 is below min_count 5"
        );
    }

    #[test]
    fn invalid_volume_display() {
        let e = RequirementError::InvalidVolume(-1.0);
        assert!(e.to_string().contains("-1"));
    }

    #[test]
    fn invalid_scale_display() {
        let e = RequirementError::InvalidScale(f64::NAN);
        assert!(e.to_string().starts_with("Scale factor"));
    }
}
