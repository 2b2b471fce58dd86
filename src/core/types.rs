//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Simulation tick counter
pub type Tick = u64;

/// Unique identifier for factions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactionId(pub u32);

/// Unique identifier for planets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanetId(pub u32);

/// Unique identifier for fleets (fleets are created dynamically)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FleetId(pub Uuid);

impl FleetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FleetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier for a building type in the static rule tables
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingTypeId(pub String);

impl BuildingTypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for BuildingTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier for a research item in the static rule tables
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechId(pub String);

impl TechId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for TechId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Buildable unit kinds that can sit in faction inventory or fleet cargo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    ColonyShip,
    Fighter,
    Transport,
}

/// The five research-capacity resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LabCategory {
    Civil,
    Mechanical,
    Computer,
    Ai,
    Military,
}

impl LabCategory {
    pub const ALL: [LabCategory; 5] = [
        LabCategory::Civil,
        LabCategory::Mechanical,
        LabCategory::Computer,
        LabCategory::Ai,
        LabCategory::Military,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LabCategory::Civil => "civil",
            LabCategory::Mechanical => "mechanical",
            LabCategory::Computer => "computer",
            LabCategory::Ai => "ai",
            LabCategory::Military => "military",
        }
    }
}

/// Planet surface classification, restricts building placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SurfaceKind {
    Terran,
    Rock,
    Ice,
    Ocean,
    Gas,
}

/// 2D position on the galaxy map
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planet_id_equality() {
        let a = PlanetId(1);
        let b = PlanetId(1);
        let c = PlanetId(2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_fleet_id_unique() {
        assert_ne!(FleetId::new(), FleetId::new());
    }

    #[test]
    fn test_tech_id_ordering_is_lexicographic() {
        assert!(TechId::new("alpha") < TechId::new("beta"));
        assert!(TechId::new("fusion_power") < TechId::new("warp_drive"));
    }

    #[test]
    fn test_lab_category_all_covers_five() {
        assert_eq!(LabCategory::ALL.len(), 5);
        let names: Vec<_> = LabCategory::ALL.iter().map(|c| c.name()).collect();
        assert!(names.contains(&"civil"));
        assert!(names.contains(&"military"));
    }

    #[test]
    fn test_surface_kind_works_in_sorted_sets() {
        let set = std::collections::BTreeSet::from([SurfaceKind::Gas, SurfaceKind::Ocean]);
        assert!(set.contains(&SurfaceKind::Gas));
        assert!(!set.contains(&SurfaceKind::Terran));
    }

    #[test]
    fn test_vec2_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }
}
