//! Static rule tables: building, research and unit definitions
//!
//! The tables are loaded once at startup from TOML data files and treated as
//! immutable for the lifetime of the engine. Planners only ever read them.

pub mod building;
pub mod loader;
pub mod research;

pub use building::{BuildingType, Capability, UpgradeTier};
pub use research::{LabLevels, ResearchType};

use crate::core::types::{BuildingTypeId, TechId, UnitKind};
use serde::Deserialize;

/// A buildable unit from the static rule tables
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnitType {
    pub kind: UnitKind,
    pub cost: i64,
    #[serde(default)]
    pub requires_orbital_factory: bool,
}

/// All loaded rule tables
#[derive(Debug, Clone, Default)]
pub struct RuleTables {
    pub buildings: Vec<BuildingType>,
    pub research: Vec<ResearchType>,
    pub units: Vec<UnitType>,
}

impl RuleTables {
    pub fn building(&self, id: &BuildingTypeId) -> Option<&BuildingType> {
        self.buildings.iter().find(|b| &b.id == id)
    }

    pub fn research(&self, id: &TechId) -> Option<&ResearchType> {
        self.research.iter().find(|r| &r.id == id)
    }

    pub fn unit(&self, kind: UnitKind) -> Option<&UnitType> {
        self.units.iter().find(|u| u.kind == kind)
    }
}
