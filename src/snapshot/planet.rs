//! Read-only planet projection

use crate::core::types::{BuildingTypeId, FactionId, PlanetId, SurfaceKind, Vec2};
use crate::rules::{LabLevels, RuleTables};
use crate::snapshot::grid::PlacementGrid;
use serde::{Deserialize, Serialize};

/// Per-planet awareness gradient for a faction
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum PlanetKnowledge {
    /// The planet's existence is unknown or only inferred
    None,
    /// Name and position known
    Name,
    /// Ownership known, surface scanned
    Owner,
}

/// State of one building instance on a planet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingState {
    Constructing,
    Active,
    Damaged,
}

/// One building instance on a planet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingInstance {
    pub type_id: BuildingTypeId,
    pub level: u32,
    pub state: BuildingState,
}

/// Aggregated per-planet capacity statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanetStats {
    /// Lab counts from Active buildings only
    pub active_labs: LabLevels,
    /// Lab counts from all completed buildings (Active + Damaged)
    pub total_labs: LabLevels,
    pub has_military_spaceport: bool,
    pub spaceport_constructing: bool,
    pub has_orbital_factory: bool,
    /// True while any building on the planet is under construction
    pub constructing: bool,
}

/// Read-only view of one planet as known to a faction this tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetView {
    pub id: PlanetId,
    pub name: String,
    pub owner: Option<FactionId>,
    pub knowledge: PlanetKnowledge,
    pub position: Vec2,
    pub surface: SurfaceKind,
    pub buildings: Vec<BuildingInstance>,
    pub stats: PlanetStats,
    pub grid: PlacementGrid,
}

impl PlanetView {
    /// Minimal view of a planet known only by name and position
    pub fn sighted(id: PlanetId, name: impl Into<String>, position: Vec2) -> Self {
        Self {
            id,
            name: name.into(),
            owner: None,
            knowledge: PlanetKnowledge::Name,
            position,
            surface: SurfaceKind::Rock,
            buildings: Vec::new(),
            stats: PlanetStats::default(),
            grid: PlacementGrid::open(0, 0),
        }
    }

    pub fn is_owned_by(&self, faction: FactionId) -> bool {
        self.owner == Some(faction)
    }

    /// Recompute `stats` from the building list and rule tables
    ///
    /// Snapshot providers call this after assembling the building list so
    /// the per-planet statistics stay consistent with it.
    pub fn recompute_stats(&mut self, rules: &RuleTables) {
        use crate::rules::Capability;

        let mut stats = PlanetStats::default();
        for instance in &self.buildings {
            let Some(building_type) = rules.building(&instance.type_id) else {
                tracing::warn!(type_id = %instance.type_id, "building instance references unknown type");
                continue;
            };
            match instance.state {
                BuildingState::Constructing => {
                    stats.constructing = true;
                    if building_type.provides(Capability::MilitarySpaceport) {
                        stats.spaceport_constructing = true;
                    }
                }
                BuildingState::Active => {
                    for category in crate::core::types::LabCategory::ALL {
                        let capacity = building_type.lab_capacity(category) * instance.level;
                        stats.active_labs.add(category, capacity);
                        stats.total_labs.add(category, capacity);
                    }
                    if building_type.provides(Capability::MilitarySpaceport) {
                        stats.has_military_spaceport = true;
                    }
                    if building_type.provides(Capability::OrbitalFactory) {
                        stats.has_orbital_factory = true;
                    }
                }
                BuildingState::Damaged => {
                    for category in crate::core::types::LabCategory::ALL {
                        stats
                            .total_labs
                            .add(category, building_type.lab_capacity(category) * instance.level);
                    }
                }
            }
        }
        self.stats = stats;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knowledge_is_totally_ordered() {
        assert!(PlanetKnowledge::None < PlanetKnowledge::Name);
        assert!(PlanetKnowledge::Name < PlanetKnowledge::Owner);
        assert!(PlanetKnowledge::Owner >= PlanetKnowledge::Owner);
    }

    #[test]
    fn test_sighted_planet_has_minimal_knowledge() {
        let planet = PlanetView::sighted(PlanetId(7), "Kepler-442b", Vec2::new(1.0, 2.0));
        assert_eq!(planet.knowledge, PlanetKnowledge::Name);
        assert!(planet.owner.is_none());
        assert!(planet.buildings.is_empty());
    }
}
