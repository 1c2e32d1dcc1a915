use super::errors::ScheduleError;

/// Axis time usable as an ordered key in sets and event logs.
///
/// Ordering and equality both follow `f64::total_cmp`; NaN never gets in.
#[derive(Debug, Clone, Copy)]
pub struct F64Key(f64);

impl F64Key {
    pub const ZERO: F64Key = F64Key(0.0);

    pub fn new(value: f64) -> Result<Self, ScheduleError> {
        if value.is_nan() {
            Err(ScheduleError::NaNTime)
        } else {
            Ok(Self(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for F64Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for F64Key {}

impl Ord for F64Key {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for F64Key {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
