//! Building type definitions from the static rule tables

use crate::core::types::{BuildingTypeId, LabCategory, SurfaceKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A named capacity a building type can provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    Energy,
    Lab(LabCategory),
    Radar,
    Repair,
    Vehicles,
    MilitarySpaceport,
    OrbitalFactory,
    ShipYard,
}

impl Capability {
    /// Parse a capability name as it appears in the rule files
    pub fn parse(name: &str) -> Option<Capability> {
        match name {
            "energy" => Some(Capability::Energy),
            "civil_lab" => Some(Capability::Lab(LabCategory::Civil)),
            "mechanical_lab" => Some(Capability::Lab(LabCategory::Mechanical)),
            "computer_lab" => Some(Capability::Lab(LabCategory::Computer)),
            "ai_lab" => Some(Capability::Lab(LabCategory::Ai)),
            "military_lab" => Some(Capability::Lab(LabCategory::Military)),
            "radar" => Some(Capability::Radar),
            "repair" => Some(Capability::Repair),
            "vehicles" => Some(Capability::Vehicles),
            "military_spaceport" => Some(Capability::MilitarySpaceport),
            "orbital_factory" => Some(Capability::OrbitalFactory),
            "ship_yard" => Some(Capability::ShipYard),
            _ => None,
        }
    }

    pub fn lab(category: LabCategory) -> Capability {
        Capability::Lab(category)
    }
}

/// One upgrade tier of a building type, ordered by level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeTier {
    pub cost: i64,
}

/// A building type from the static rule tables
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingType {
    pub id: BuildingTypeId,
    /// Category tag shared by related types (e.g. "Spaceport")
    pub kind: String,
    pub cost: i64,
    /// Footprint on the planet placement grid
    pub size: (u32, u32),
    /// Capacity amounts per capability
    pub capacities: BTreeMap<Capability, u32>,
    /// Negative = at most |limit| buildings of this kind per planet,
    /// positive = at most limit buildings of this type, zero = unlimited
    pub limit: i32,
    /// Surface kinds this type cannot be placed on
    pub except: BTreeSet<SurfaceKind>,
    /// Ordered upgrade tiers; a building at level n has consumed tiers 0..n-1
    pub upgrades: Vec<UpgradeTier>,
}

impl BuildingType {
    /// Capacity this type provides for the given capability (0 if none)
    pub fn capacity(&self, capability: Capability) -> u32 {
        self.capacities.get(&capability).copied().unwrap_or(0)
    }

    pub fn provides(&self, capability: Capability) -> bool {
        self.capacity(capability) > 0
    }

    pub fn lab_capacity(&self, category: LabCategory) -> u32 {
        self.capacity(Capability::Lab(category))
    }

    /// Highest level this type can be upgraded to (level 1 = freshly built)
    pub fn max_level(&self) -> u32 {
        1 + self.upgrades.len() as u32
    }

    /// Cost of upgrading from `level` to `level + 1`, if such a tier exists
    pub fn upgrade_cost(&self, level: u32) -> Option<i64> {
        self.upgrades.get(level.saturating_sub(1) as usize).map(|t| t.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solar_plant() -> BuildingType {
        BuildingType {
            id: BuildingTypeId::new("solar_plant"),
            kind: "Power".into(),
            cost: 20_000,
            size: (2, 2),
            capacities: BTreeMap::from([(Capability::Energy, 4)]),
            limit: 0,
            except: BTreeSet::from([SurfaceKind::Gas]),
            upgrades: vec![UpgradeTier { cost: 30_000 }, UpgradeTier { cost: 60_000 }],
        }
    }

    #[test]
    fn test_capability_parse() {
        assert_eq!(Capability::parse("energy"), Some(Capability::Energy));
        assert_eq!(
            Capability::parse("ai_lab"),
            Some(Capability::Lab(LabCategory::Ai))
        );
        assert_eq!(Capability::parse("plasma_cannon"), None);
    }

    #[test]
    fn test_capacity_lookup() {
        let bt = solar_plant();
        assert_eq!(bt.capacity(Capability::Energy), 4);
        assert_eq!(bt.capacity(Capability::Radar), 0);
        assert!(bt.provides(Capability::Energy));
        assert!(!bt.provides(Capability::OrbitalFactory));
    }

    #[test]
    fn test_upgrade_tiers() {
        let bt = solar_plant();
        assert_eq!(bt.max_level(), 3);
        assert_eq!(bt.upgrade_cost(1), Some(30_000));
        assert_eq!(bt.upgrade_cost(2), Some(60_000));
        assert_eq!(bt.upgrade_cost(3), None);
    }
}
