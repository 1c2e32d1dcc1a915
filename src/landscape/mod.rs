//! Zones: mutually exclusive spatial resources with a status.
//!
//! Every zone starts in a configured status. Moving a zone from status `a` to
//! status `b` takes `time_costs[a][b]` axis units during which nothing else
//! may use the zone.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interval::Interval;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ZoneError {
    #[error("Unknown zone: {0}")]
    UnknownZone(String),

    #[error("Zone '{zone}' has no status {status} (statuses 0..{statuses})")]
    InvalidStatus {
        zone: String,
        status: usize,
        statuses: usize,
    },

    #[error("Transition cost matrix must be square, row {row} has {len} entries for {size} statuses")]
    NonSquareCosts { row: usize, len: usize, size: usize },

    #[error("Transition cost from {from} to {to} must be finite and non-negative")]
    InvalidCost { from: usize, to: usize },
}

/// A zone in a given status.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Zone {
    pub name: String,
    pub status: usize,
}

impl Zone {
    pub fn new(name: impl Into<String>, status: usize) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

/// Initial zone statuses and the status transition cost matrix.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawZoneConfiguration"))]
pub struct ZoneConfiguration {
    start_statuses: BTreeMap<String, usize>,
    time_costs: Vec<Vec<f64>>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawZoneConfiguration {
    start_statuses: BTreeMap<String, usize>,
    time_costs: Vec<Vec<f64>>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawZoneConfiguration> for ZoneConfiguration {
    type Error = ZoneError;

    fn try_from(raw: RawZoneConfiguration) -> Result<Self, Self::Error> {
        Self::new(raw.start_statuses, raw.time_costs)
    }
}

impl ZoneConfiguration {
    /// # Errors
    ///
    /// - `NonSquareCosts` if `time_costs` is not a square matrix
    /// - `InvalidCost` for negative or non-finite entries
    /// - `InvalidStatus` if a start status is outside the matrix
    pub fn new(
        start_statuses: BTreeMap<String, usize>,
        time_costs: Vec<Vec<f64>>,
    ) -> Result<Self, ZoneError> {
        let size = time_costs.len();
        for (row, costs) in time_costs.iter().enumerate() {
            if costs.len() != size {
                return Err(ZoneError::NonSquareCosts {
                    row,
                    len: costs.len(),
                    size,
                });
            }
            if let Some(to) = costs.iter().position(|c| !c.is_finite() || *c < 0.0) {
                return Err(ZoneError::InvalidCost { from: row, to });
            }
        }
        for (zone, &status) in &start_statuses {
            if status >= size {
                return Err(ZoneError::InvalidStatus {
                    zone: zone.clone(),
                    status,
                    statuses: size,
                });
            }
        }
        Ok(Self {
            start_statuses,
            time_costs,
        })
    }

    pub fn statuses(&self) -> usize {
        self.time_costs.len()
    }

    pub fn start_status(&self, zone: &str) -> Result<usize, ZoneError> {
        self.start_statuses
            .get(zone)
            .copied()
            .ok_or_else(|| ZoneError::UnknownZone(zone.to_string()))
    }

    pub fn zones(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.start_statuses.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Time needed to move `zone` from `from` to `to`.
    pub fn time_cost(&self, zone: &str, from: usize, to: usize) -> Result<f64, ZoneError> {
        let statuses = self.statuses();
        for status in [from, to] {
            if status >= statuses {
                return Err(ZoneError::InvalidStatus {
                    zone: zone.to_string(),
                    status,
                    statuses,
                });
            }
        }
        Ok(self.time_costs[from][to])
    }
}

/// A status change of one zone over a time window.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneTransition {
    pub name: String,
    pub from_status: usize,
    pub to_status: usize,
    pub interval: Interval,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ZoneConfiguration {
        ZoneConfiguration::new(
            BTreeMap::from([("yard".to_string(), 0)]),
            vec![vec![0.0, 2.0], vec![1.0, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn lookups() {
        let cfg = config();
        assert_eq!(cfg.statuses(), 2);
        assert_eq!(cfg.start_status("yard"), Ok(0));
        assert_eq!(cfg.time_cost("yard", 0, 1), Ok(2.0));
        assert_eq!(cfg.time_cost("yard", 1, 0), Ok(1.0));
    }

    #[test]
    fn unknown_zone() {
        assert_eq!(
            config().start_status("roof"),
            Err(ZoneError::UnknownZone("roof".into()))
        );
    }

    #[test]
    fn status_out_of_range() {
        let err = config().time_cost("yard", 0, 5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Zone 'yard' has no status 5 (statuses 0..2)"
        );
    }

    #[test]
    fn rejects_ragged_matrix() {
        let err = ZoneConfiguration::new(BTreeMap::new(), vec![vec![0.0, 1.0], vec![0.0]])
            .unwrap_err();
        assert_eq!(
            err,
            ZoneError::NonSquareCosts {
                row: 1,
                len: 1,
                size: 2
            }
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_validates_the_matrix() {
        let ok: ZoneConfiguration = serde_json::from_str(
            r#"{"start_statuses":{"yard":0},"time_costs":[[0.0,2.0],[1.0,0.0]]}"#,
        )
        .unwrap();
        assert_eq!(ok, config());

        let ragged = serde_json::from_str::<ZoneConfiguration>(
            r#"{"start_statuses":{"yard":0},"time_costs":[[0.0,2.0],[1.0]]}"#,
        );
        assert!(ragged.is_err());
        let outside = serde_json::from_str::<ZoneConfiguration>(
            r#"{"start_statuses":{"yard":5},"time_costs":[[0.0]]}"#,
        );
        assert!(outside.is_err());
    }

    #[test]
    fn rejects_start_status_outside_matrix() {
        let err = ZoneConfiguration::new(
            BTreeMap::from([("yard".to_string(), 3)]),
            vec![vec![0.0]],
        )
        .unwrap_err();
        assert!(matches!(err, ZoneError::InvalidStatus { status: 3, .. }));
    }
}
