//! Immutable per-tick, per-faction projection of galactic state
//!
//! The snapshot is built externally from the authoritative world at the start
//! of each tick and never mutated afterwards. All cross-references between
//! planets, fleets and factions are stable ids, never pointers, so commands
//! captured from an older snapshot stay valid to *attempt* even after the
//! snapshot is rebuilt.

pub mod fleet;
pub mod grid;
pub mod planet;

pub use fleet::{FleetTask, FleetView};
pub use grid::PlacementGrid;
pub use planet::{BuildingInstance, BuildingState, PlanetKnowledge, PlanetStats, PlanetView};

use crate::core::types::{FactionId, PlanetId, TechId, Tick, UnitKind, Vec2};
use crate::rules::{LabLevels, RuleTables};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Aggregated faction-wide capacity statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub active_labs: LabLevels,
    pub total_labs: LabLevels,
    /// Operational military spaceports across all owned planets
    pub military_spaceports: u32,
    pub spaceports_constructing: u32,
    pub orbital_factories: u32,
}

impl GlobalStats {
    /// Aggregate from per-planet statistics
    pub fn aggregate(own_planets: &BTreeMap<PlanetId, PlanetView>) -> Self {
        let mut stats = GlobalStats::default();
        for planet in own_planets.values() {
            for category in crate::core::types::LabCategory::ALL {
                stats
                    .active_labs
                    .add(category, planet.stats.active_labs.get(category));
                stats
                    .total_labs
                    .add(category, planet.stats.total_labs.get(category));
            }
            if planet.stats.has_military_spaceport {
                stats.military_spaceports += 1;
            }
            if planet.stats.spaceport_constructing {
                stats.spaceports_constructing += 1;
            }
            if planet.stats.has_orbital_factory {
                stats.orbital_factories += 1;
            }
        }
        stats
    }
}

/// Operator-configured policy thresholds, fixed for the duration of a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyThresholds {
    /// Treasury reserve kept aside for automatic construction
    pub auto_build_limit: i64,
    /// Maximum expansion distance from owned territory (opportunistic mode)
    pub colonization_limit: f32,
    /// Whether enemy-held planets are acceptable expansion targets
    pub may_conquer: bool,
    /// Whether pending research should drive territorial expansion
    pub research_requires_colonization: bool,
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            auto_build_limit: 100_000,
            colonization_limit: 500.0,
            may_conquer: false,
            research_requires_colonization: true,
        }
    }
}

/// Immutable per-tick view of one faction's known galaxy state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub faction: FactionId,
    pub tick: Tick,
    pub money: i64,
    /// Techs not yet completed whose prerequisites are met
    pub remaining_research: Vec<TechId>,
    /// Techs unlockable later, behind unfinished prerequisites
    pub further_research: Vec<TechId>,
    /// At most one research item runs at a time
    pub running_research: Option<TechId>,
    /// Explicitly chosen expansion targets (explicit mode only)
    pub colonization_targets: BTreeSet<PlanetId>,
    pub own_planets: BTreeMap<PlanetId, PlanetView>,
    pub enemy_planets: BTreeMap<PlanetId, PlanetView>,
    pub unknown_planets: BTreeMap<PlanetId, PlanetView>,
    pub own_fleets: BTreeMap<crate::core::types::FleetId, FleetView>,
    /// Faction stock of built units awaiting fleet assignment
    pub inventory: BTreeMap<UnitKind, u32>,
    pub global: GlobalStats,
    pub policy: PolicyThresholds,
}

impl WorldSnapshot {
    pub fn new(faction: FactionId, tick: Tick) -> Self {
        Self {
            faction,
            tick,
            money: 0,
            remaining_research: Vec::new(),
            further_research: Vec::new(),
            running_research: None,
            colonization_targets: BTreeSet::new(),
            own_planets: BTreeMap::new(),
            enemy_planets: BTreeMap::new(),
            unknown_planets: BTreeMap::new(),
            own_fleets: BTreeMap::new(),
            inventory: BTreeMap::new(),
            global: GlobalStats::default(),
            policy: PolicyThresholds::default(),
        }
    }

    /// Look up a planet view in any of the three partitions
    pub fn planet(&self, id: PlanetId) -> Option<&PlanetView> {
        self.own_planets
            .get(&id)
            .or_else(|| self.enemy_planets.get(&id))
            .or_else(|| self.unknown_planets.get(&id))
    }

    pub fn in_inventory(&self, kind: UnitKind) -> u32 {
        self.inventory.get(&kind).copied().unwrap_or(0)
    }

    /// Distance from a position to the nearest owned planet
    pub fn distance_to_territory(&self, position: Vec2) -> Option<f32> {
        self.own_planets
            .values()
            .map(|p| ordered_float::OrderedFloat(p.position.distance(&position)))
            .min()
            .map(|d| d.into_inner())
    }

    /// Recompute planet and global statistics from building lists
    pub fn refresh_stats(&mut self, rules: &RuleTables) {
        for planet in self.own_planets.values_mut() {
            planet.recompute_stats(rules);
        }
        self.global = GlobalStats::aggregate(&self.own_planets);
    }
}
