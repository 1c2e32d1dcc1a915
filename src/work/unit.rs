#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::RequirementError;
use super::requirement::{
    ConstructionObjectReq, EquipmentReq, MaterialReq, Requirement, WorkerReq, ZoneReq,
};
use crate::resource::Material;
use crate::Id;

/// A unit of work: the payload of one node in a [`WorkGraph`](crate::graph::WorkGraph).
///
/// Work units are values. Builder methods consume `self` and return the
/// updated unit, and graph edits copy units instead of patching them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawWorkUnit"))]
pub struct WorkUnit {
    id: Id,
    name: String,
    display_name: String,
    description: String,
    volume: f64,
    volume_type: String,
    priority: u32,
    group: String,
    is_service_unit: bool,
    requirements: Vec<Requirement>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawWorkUnit {
    id: Id,
    name: String,
    display_name: String,
    description: String,
    volume: f64,
    volume_type: String,
    priority: u32,
    group: String,
    is_service_unit: bool,
    requirements: Vec<Requirement>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawWorkUnit> for WorkUnit {
    type Error = RequirementError;

    fn try_from(raw: RawWorkUnit) -> Result<Self, Self::Error> {
        let unit = Self {
            id: raw.id,
            name: raw.name,
            display_name: raw.display_name,
            description: raw.description,
            volume: 0.0,
            volume_type: raw.volume_type,
            priority: raw.priority,
            group: raw.group,
            is_service_unit: raw.is_service_unit,
            requirements: raw.requirements,
        };
        unit.with_volume(raw.volume)
    }
}

impl WorkUnit {
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            display_name: name.clone(),
            name,
            description: String::new(),
            volume: 1.0,
            volume_type: "unit".to_string(),
            priority: 1,
            group: "main project".to_string(),
            is_service_unit: false,
            requirements: Vec::new(),
        }
    }

    /// A zero-volume bookkeeping unit such as a graph sentinel.
    pub fn service(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            volume: 0.0,
            is_service_unit: true,
            ..Self::new(id, name)
        }
    }

    /// # Errors
    ///
    /// `InvalidVolume` for negative or non-finite volumes.
    pub fn with_volume(mut self, volume: f64) -> Result<Self, RequirementError> {
        if !volume.is_finite() || volume < 0.0 {
            return Err(RequirementError::InvalidVolume(volume));
        }
        self.volume = volume;
        Ok(self)
    }

    pub fn with_volume_type(mut self, volume_type: impl Into<String>) -> Self {
        self.volume_type = volume_type.into();
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_requirement(mut self, req: impl Into<Requirement>) -> Self {
        self.requirements.push(req.into());
        self
    }

    pub fn with_requirements<I, R>(mut self, reqs: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Requirement>,
    {
        self.requirements.extend(reqs.into_iter().map(Into::into));
        self
    }

    /// Same unit under another id.
    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn volume_type(&self) -> &str {
        &self.volume_type
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn is_service_unit(&self) -> bool {
        self.is_service_unit
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn worker_reqs(&self) -> impl Iterator<Item = &WorkerReq> + '_ {
        self.requirements.iter().filter_map(|r| match r {
            Requirement::Worker(w) => Some(w),
            _ => None,
        })
    }

    pub fn equipment_reqs(&self) -> impl Iterator<Item = &EquipmentReq> + '_ {
        self.requirements.iter().filter_map(|r| match r {
            Requirement::Equipment(e) => Some(e),
            _ => None,
        })
    }

    pub fn material_reqs(&self) -> impl Iterator<Item = &MaterialReq> + '_ {
        self.requirements.iter().filter_map(|r| match r {
            Requirement::Material(m) => Some(m),
            _ => None,
        })
    }

    pub fn object_reqs(&self) -> impl Iterator<Item = &ConstructionObjectReq> + '_ {
        self.requirements.iter().filter_map(|r| match r {
            Requirement::ConstructionObject(o) => Some(o),
            _ => None,
        })
    }

    pub fn zone_reqs(&self) -> impl Iterator<Item = &ZoneReq> + '_ {
        self.requirements.iter().filter_map(|r| match r {
            Requirement::Zone(z) => Some(z),
            _ => None,
        })
    }

    /// Materials this unit consumes, one entry per material requirement.
    pub fn need_materials(&self) -> Vec<Material> {
        self.material_reqs()
            .map(|m| Material::new(crate::generate_id(), m.kind.clone(), m.count))
            .collect()
    }
}
