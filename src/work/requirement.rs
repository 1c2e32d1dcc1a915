//! Typed resource requirements attached to a [`WorkUnit`](super::WorkUnit).
//!
//! Every requirement is one variant of the closed [`Requirement`] set and
//! answers two questions: what it demands ([`Requirement::demand`]) and,
//! where it makes sense, which concrete resource it stands for
//! ([`Requirement::materialize`]).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::RequirementError;
use crate::landscape::Zone;
use crate::resource::Material;

/// Upper bound on workers of one kind when none is given.
pub const DEFAULT_MAX_COUNT: usize = 100;

fn check_scale(factor: f64) -> Result<(), RequirementError> {
    if factor.is_finite() && factor >= 0.0 {
        Ok(())
    } else {
        Err(RequirementError::InvalidScale(factor))
    }
}

fn check_volume(volume: f64) -> Result<(), RequirementError> {
    if volume.is_finite() && volume >= 0.0 {
        Ok(())
    } else {
        Err(RequirementError::InvalidVolume(volume))
    }
}

/// Demand for workers of one kind.
///
/// `volume` is the amount of work the kind performs; the team size is chosen
/// by the scheduler within `[min_count, max_count]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawWorkerReq"))]
pub struct WorkerReq {
    kind: String,
    volume: f64,
    min_count: usize,
    max_count: usize,
    name: String,
}

/// Unchecked wire form of [`WorkerReq`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawWorkerReq {
    kind: String,
    volume: f64,
    min_count: usize,
    max_count: usize,
    name: String,
}

#[cfg(feature = "serde")]
impl TryFrom<RawWorkerReq> for WorkerReq {
    type Error = RequirementError;

    fn try_from(raw: RawWorkerReq) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.kind, raw.volume, raw.min_count, raw.max_count)?.named(raw.name))
    }
}

impl WorkerReq {
    /// # Errors
    ///
    /// - `InvalidBounds` if `max_count < min_count`
    /// - `InvalidVolume` if `volume` is negative or not finite
    pub fn new(
        kind: impl Into<String>,
        volume: f64,
        min_count: usize,
        max_count: usize,
    ) -> Result<Self, RequirementError> {
        let kind = kind.into();
        check_volume(volume)?;
        if max_count < min_count {
            return Err(RequirementError::InvalidBounds {
                kind,
                min: min_count,
                max: max_count,
            });
        }
        Ok(Self {
            name: kind.clone(),
            kind,
            volume,
            min_count,
            max_count,
        })
    }

    /// Requirement with `min_count = 1` and the default upper bound.
    pub fn with_defaults(kind: impl Into<String>, volume: f64) -> Result<Self, RequirementError> {
        Self::new(kind, volume, 1, DEFAULT_MAX_COUNT)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn min_count(&self) -> usize {
        self.min_count
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    /// Scales both the volume and the upper team bound by `factor`.
    ///
    /// The new upper bound is `round(max_count * factor)` (halves round away
    /// from zero) and never drops below `min_count`.
    pub fn scale_all(&self, factor: f64) -> Result<Self, RequirementError> {
        check_scale(factor)?;
        let scaled_max = (self.max_count as f64 * factor).round() as usize;
        Ok(Self {
            volume: self.volume * factor,
            max_count: scaled_max.max(self.min_count),
            ..self.clone()
        })
    }

    /// Scales only the volume; team bounds are kept.
    pub fn scale_volume(&self, factor: f64) -> Result<Self, RequirementError> {
        check_scale(factor)?;
        Ok(Self {
            volume: self.volume * factor,
            ..self.clone()
        })
    }
}

/// Fixed count of one equipment kind.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EquipmentReq {
    pub kind: String,
    pub count: usize,
}

/// Fixed amount of one material.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MaterialReq {
    pub kind: String,
    pub count: usize,
}

/// Fixed count of one construction object kind.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstructionObjectReq {
    pub kind: String,
    pub count: usize,
}

/// Zone that must be in `required_status` while the work runs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneReq {
    pub kind: String,
    pub required_status: usize,
}

impl ZoneReq {
    pub fn new(kind: impl Into<String>, required_status: usize) -> Self {
        Self {
            kind: kind.into(),
            required_status,
        }
    }
}

/// Closed set of requirement kinds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Requirement {
    Worker(WorkerReq),
    Equipment(EquipmentReq),
    Material(MaterialReq),
    ConstructionObject(ConstructionObjectReq),
    Zone(ZoneReq),
}

/// What a requirement asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demand<'a> {
    /// A team of `min..=max` interchangeable agents.
    Agents { kind: &'a str, min: usize, max: usize },
    /// A fixed quantity.
    Fixed { kind: &'a str, count: usize },
    /// Exclusive use of a zone in a given status.
    ZoneStatus { zone: &'a str, status: usize },
}

/// Concrete resource a requirement stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum Materialized {
    Material(Material),
    Zone(Zone),
}

impl Requirement {
    pub fn kind(&self) -> &str {
        match self {
            Requirement::Worker(r) => r.kind(),
            Requirement::Equipment(r) => &r.kind,
            Requirement::Material(r) => &r.kind,
            Requirement::ConstructionObject(r) => &r.kind,
            Requirement::Zone(r) => &r.kind,
        }
    }

    pub fn demand(&self) -> Demand<'_> {
        match self {
            Requirement::Worker(r) => Demand::Agents {
                kind: r.kind(),
                min: r.min_count(),
                max: r.max_count(),
            },
            Requirement::Equipment(EquipmentReq { kind, count })
            | Requirement::Material(MaterialReq { kind, count })
            | Requirement::ConstructionObject(ConstructionObjectReq { kind, count }) => {
                Demand::Fixed {
                    kind,
                    count: *count,
                }
            }
            Requirement::Zone(r) => Demand::ZoneStatus {
                zone: &r.kind,
                status: r.required_status,
            },
        }
    }

    /// Materials and zones have a concrete counterpart; agents and objects
    /// are drawn from pools instead.
    pub fn materialize(&self) -> Option<Materialized> {
        match self {
            Requirement::Material(r) => Some(Materialized::Material(Material::new(
                crate::generate_id(),
                r.kind.clone(),
                r.count,
            ))),
            Requirement::Zone(r) => Some(Materialized::Zone(Zone::new(
                r.kind.clone(),
                r.required_status,
            ))),
            _ => None,
        }
    }
}

impl From<WorkerReq> for Requirement {
    fn from(r: WorkerReq) -> Self {
        Requirement::Worker(r)
    }
}

impl From<EquipmentReq> for Requirement {
    fn from(r: EquipmentReq) -> Self {
        Requirement::Equipment(r)
    }
}

impl From<MaterialReq> for Requirement {
    fn from(r: MaterialReq) -> Self {
        Requirement::Material(r)
    }
}

impl From<ConstructionObjectReq> for Requirement {
    fn from(r: ConstructionObjectReq) -> Self {
        Requirement::ConstructionObject(r)
    }
}

impl From<ZoneReq> for Requirement {
    fn from(r: ZoneReq) -> Self {
        Requirement::Zone(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_bounds_eagerly() {
        let err = WorkerReq::new("welder", 10.0, 4, 3).unwrap_err();
        assert!(matches!(err, RequirementError::InvalidBounds { min: 4, max: 3, .. }));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_checks_bounds_and_volume() {
        let ok: WorkerReq = serde_json::from_str(
            r#"{"kind":"welder","volume":6.0,"min_count":1,"max_count":3,"name":"Welding"}"#,
        )
        .unwrap();
        assert_eq!(ok, WorkerReq::new("welder", 6.0, 1, 3).unwrap().named("Welding"));

        let inverted = serde_json::from_str::<WorkerReq>(
            r#"{"kind":"welder","volume":6.0,"min_count":4,"max_count":3,"name":"welder"}"#,
        );
        assert!(inverted.is_err());
        let negative = serde_json::from_str::<WorkerReq>(
            r#"{"kind":"welder","volume":-2.0,"min_count":1,"max_count":3,"name":"welder"}"#,
        );
        assert!(negative.is_err());
    }

    #[test]
    fn rejects_negative_volume() {
        assert_eq!(
            WorkerReq::new("welder", -1.0, 1, 3),
            Err(RequirementError::InvalidVolume(-1.0))
        );
    }

    #[test]
    fn scale_all_keeps_max_above_min() {
        let req = WorkerReq::new("driver", 8.0, 3, 4).unwrap();
        let shrunk = req.scale_all(0.1).unwrap();
        assert_eq!(shrunk.max_count(), 3);
        assert_eq!(shrunk.min_count(), 3);
        assert!((shrunk.volume() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn scale_all_rounds_half_away_from_zero() {
        let req = WorkerReq::new("driver", 1.0, 1, 5).unwrap();
        // 5 * 0.5 = 2.5 -> 3
        assert_eq!(req.scale_all(0.5).unwrap().max_count(), 3);
        // 5 * 0.3 = 1.5 -> 2
        assert_eq!(req.scale_all(0.3).unwrap().max_count(), 2);
    }

    #[test]
    fn scale_volume_keeps_bounds() {
        let req = WorkerReq::new("driver", 10.0, 2, 6).unwrap();
        let scaled = req.scale_volume(1.5).unwrap();
        assert_eq!((scaled.min_count(), scaled.max_count()), (2, 6));
        assert_eq!(scaled.volume(), 15.0);
    }

    #[test]
    fn scale_rejects_negative_factor() {
        let req = WorkerReq::with_defaults("driver", 10.0).unwrap();
        assert_eq!(
            req.scale_all(-2.0),
            Err(RequirementError::InvalidScale(-2.0))
        );
    }

    #[test]
    fn demand_per_variant() {
        let worker: Requirement = WorkerReq::new("mason", 5.0, 1, 7).unwrap().into();
        assert_eq!(
            worker.demand(),
            Demand::Agents {
                kind: "mason",
                min: 1,
                max: 7
            }
        );

        let crane: Requirement = EquipmentReq {
            kind: "crane".into(),
            count: 2,
        }
        .into();
        assert_eq!(
            crane.demand(),
            Demand::Fixed {
                kind: "crane",
                count: 2
            }
        );

        let zone: Requirement = ZoneReq::new("floor-1", 2).into();
        assert_eq!(
            zone.demand(),
            Demand::ZoneStatus {
                zone: "floor-1",
                status: 2
            }
        );
    }

    #[test]
    fn materialize_only_materials_and_zones() {
        let material: Requirement = MaterialReq {
            kind: "brick".into(),
            count: 400,
        }
        .into();
        match material.materialize() {
            Some(Materialized::Material(m)) => {
                assert_eq!(m.name, "brick");
                assert_eq!(m.count, 400);
            }
            other => panic!("unexpected {other:?}"),
        }

        let zone: Requirement = ZoneReq::new("yard", 1).into();
        assert_eq!(
            zone.materialize(),
            Some(Materialized::Zone(Zone::new("yard", 1)))
        );

        let worker: Requirement = WorkerReq::with_defaults("mason", 1.0).unwrap().into();
        assert_eq!(worker.materialize(), None);
    }
}
