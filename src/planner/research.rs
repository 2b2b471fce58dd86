//! Research queue planning
//!
//! Classifies every pending tech into one of three buckets and advances the
//! queue by at most one command per tick: start the most-unlocking startable
//! tech, or take exactly one remedial step toward the cheapest lab rebuild.

use crate::command::Command;
use crate::core::types::{FactionId, LabCategory, TechId};
use crate::planner::toolkit::find_building;
use crate::planner::Planner;
use crate::rules::{Capability, ResearchType, RuleTables};
use crate::snapshot::{BuildingState, PlanetView, WorldSnapshot};
use std::cmp::Reverse;

/// A 2x money-speed multiplier is allocated when the treasury covers this
/// many times the research cost
const SPEED_UP_COST_FACTOR: i64 = 5;

/// Advances the research queue for exactly one governed faction
pub struct ResearchPlanner {
    pub faction: FactionId,
}

/// Classification of a pending tech against current capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    /// Active lab capacity already satisfies every requirement
    Startable,
    /// Achievable by rebuilding labs across currently owned planets
    Reconstructable,
    /// Needs more owned planets in at least one category
    Deferred,
}

impl ResearchPlanner {
    pub fn new(faction: FactionId) -> Self {
        Self { faction }
    }

    fn classify(&self, tech: &ResearchType, snapshot: &WorldSnapshot) -> Bucket {
        let orbital_ok = !tech.requires_orbital_factory || snapshot.global.orbital_factories > 0;
        if snapshot.global.active_labs.meets(&tech.labs) && orbital_ok {
            return Bucket::Startable;
        }
        let planets = snapshot.own_planets.len() as u32;
        if LabCategory::ALL.iter().all(|&c| tech.labs.get(c) <= planets) {
            Bucket::Reconstructable
        } else {
            Bucket::Deferred
        }
    }

    /// Number of other pending/future techs listing `tech` as a prerequisite
    fn unlock_count(&self, tech: &TechId, snapshot: &WorldSnapshot, rules: &RuleTables) -> usize {
        snapshot
            .remaining_research
            .iter()
            .chain(snapshot.further_research.iter())
            .filter_map(|id| rules.research(id))
            .filter(|other| other.prerequisites.contains(tech))
            .count()
    }

    /// Total cost of building the labs this tech still lacks
    ///
    /// `None` when a lab category has no building type in the rule tables —
    /// a configuration error that skips the tech for this tick.
    fn rebuild_cost(
        &self,
        tech: &ResearchType,
        snapshot: &WorldSnapshot,
        rules: &RuleTables,
    ) -> Option<i64> {
        let mut cost = 0;
        for category in LabCategory::ALL {
            let deficit = tech
                .labs
                .get(category)
                .saturating_sub(snapshot.global.active_labs.get(category));
            if deficit > 0 {
                let lab = find_building(rules, Capability::Lab(category))?;
                cost += deficit as i64 * lab.cost;
            }
        }
        Some(cost)
    }

    fn start_command(&self, tech: &ResearchType, snapshot: &WorldSnapshot) -> Command {
        let speed = if snapshot.money >= SPEED_UP_COST_FACTOR * tech.research_cost {
            2
        } else {
            1
        };
        Command::StartResearch { tech: tech.id.clone(), speed }
    }

    /// Exactly one remedial step toward the chosen tech, in priority order:
    /// restore unpowered labs, build a first lab, demolish an excess lab
    fn remedial_command(
        &self,
        tech: &ResearchType,
        snapshot: &WorldSnapshot,
        rules: &RuleTables,
    ) -> Option<Command> {
        self.restore_power(snapshot, rules)
            .or_else(|| self.place_first_lab(tech, snapshot, rules))
            .or_else(|| self.demolish_excess_lab(tech, snapshot, rules))
    }

    /// Step (a): a planet has completed labs that are not active, meaning
    /// its power supply is down; repair the damaged power building, or
    /// upgrade it if that is affordable
    fn restore_power(&self, snapshot: &WorldSnapshot, rules: &RuleTables) -> Option<Command> {
        for planet in snapshot.own_planets.values() {
            if planet.stats.constructing {
                continue;
            }
            if planet.stats.total_labs.total() <= planet.stats.active_labs.total() {
                continue;
            }
            // A damaged plant anywhere on the planet outranks upgrading a
            // healthy one
            for instance in &planet.buildings {
                let Some(building_type) = rules.building(&instance.type_id) else {
                    continue;
                };
                if building_type.provides(Capability::Energy)
                    && instance.state == BuildingState::Damaged
                {
                    return Some(Command::RepairBuilding {
                        planet: planet.id,
                        building: instance.type_id.clone(),
                    });
                }
            }
            for instance in &planet.buildings {
                let Some(building_type) = rules.building(&instance.type_id) else {
                    continue;
                };
                if !building_type.provides(Capability::Energy)
                    || instance.state != BuildingState::Active
                {
                    continue;
                }
                let affordable = building_type
                    .upgrade_cost(instance.level)
                    .map_or(false, |cost| {
                        snapshot.money - snapshot.policy.auto_build_limit >= cost
                    });
                if affordable {
                    return Some(Command::UpgradeBuilding {
                        planet: planet.id,
                        building: instance.type_id.clone(),
                        to_level: instance.level + 1,
                    });
                }
            }
        }
        None
    }

    /// Step (b): a planet with no labs at all gets one lab of the category
    /// the chosen tech lacks most
    fn place_first_lab(
        &self,
        tech: &ResearchType,
        snapshot: &WorldSnapshot,
        rules: &RuleTables,
    ) -> Option<Command> {
        let category = LabCategory::ALL
            .iter()
            .copied()
            .max_by_key(|&c| {
                tech.labs
                    .get(c)
                    .saturating_sub(snapshot.global.active_labs.get(c))
            })?;
        let Some(lab) = find_building(rules, Capability::Lab(category)) else {
            tracing::warn!(category = category.name(), "no lab building type in rule tables");
            return None;
        };

        for planet in snapshot.own_planets.values() {
            if planet.stats.constructing || planet.stats.total_labs.total() > 0 {
                continue;
            }
            if crate::planner::toolkit::can_place(planet, lab, rules) {
                return Some(Command::PlaceBuilding {
                    planet: planet.id,
                    building: lab.id.clone(),
                });
            }
        }
        None
    }

    /// Step (c): demolish one lab of a category held in excess of the
    /// chosen tech's requirement, freeing room to rebuild
    fn demolish_excess_lab(
        &self,
        tech: &ResearchType,
        snapshot: &WorldSnapshot,
        rules: &RuleTables,
    ) -> Option<Command> {
        for category in LabCategory::ALL {
            if snapshot.global.active_labs.get(category) <= tech.labs.get(category) {
                continue;
            }
            for planet in snapshot.own_planets.values() {
                if planet.stats.constructing {
                    continue;
                }
                if let Some(instance) = lab_instance(planet, category, rules) {
                    return Some(Command::DemolishBuilding {
                        planet: planet.id,
                        building: instance,
                    });
                }
            }
        }
        None
    }
}

impl Planner for ResearchPlanner {
    fn name(&self) -> &'static str {
        "research"
    }

    fn plan(&self, snapshot: &WorldSnapshot, rules: &RuleTables) -> Vec<Command> {
        if snapshot.faction != self.faction || snapshot.running_research.is_some() {
            return Vec::new();
        }

        let mut pending: Vec<&ResearchType> = Vec::new();
        for id in &snapshot.remaining_research {
            match rules.research(id) {
                Some(tech) => pending.push(tech),
                None => tracing::warn!(tech = %id, "pending research references unknown tech"),
            }
        }
        if pending.is_empty() {
            return Vec::new();
        }

        let mut startable = Vec::new();
        let mut reconstructable = Vec::new();
        let mut deferred = Vec::new();
        for tech in pending {
            match self.classify(tech, snapshot) {
                Bucket::Startable => startable.push(tech),
                Bucket::Reconstructable => reconstructable.push(tech),
                Bucket::Deferred => deferred.push(tech),
            }
        }

        if !startable.is_empty() {
            // Highest unlock count; ties break on lexicographic tech id
            startable.sort_by_key(|tech| {
                (
                    Reverse(self.unlock_count(&tech.id, snapshot, rules)),
                    tech.id.clone(),
                )
            });
            return vec![self.start_command(startable[0], snapshot)];
        }

        if !reconstructable.is_empty() {
            // Cheapest lab rebuild; ties break on lexicographic tech id
            let mut costed: Vec<(i64, &ResearchType)> = Vec::new();
            for tech in reconstructable {
                match self.rebuild_cost(tech, snapshot, rules) {
                    Some(cost) if cost > 0 => costed.push((cost, tech)),
                    Some(_) => {
                        // Labs already satisfied; the tech waits on an
                        // orbital factory, so there is nothing to rebuild
                        tracing::debug!(tech = %tech.id, "research blocked on orbital factory");
                    }
                    None => {
                        tracing::warn!(tech = %tech.id, "lab building type missing, skipping rebuild costing");
                    }
                }
            }
            costed.sort_by_key(|(cost, tech)| (*cost, tech.id.clone()));
            if let Some((_, tech)) = costed.first() {
                // Rate limited: at most one remedial command per tick
                return self
                    .remedial_command(tech, snapshot, rules)
                    .into_iter()
                    .collect();
            }
            return Vec::new();
        }

        // Deferred techs are only scored; planets must be acquired first
        for tech in &deferred {
            tracing::debug!(
                tech = %tech.id,
                unlocks = self.unlock_count(&tech.id, snapshot, rules),
                "research deferred pending more planets"
            );
        }
        Vec::new()
    }
}

/// First lab building instance of the given category on a planet
fn lab_instance(
    planet: &PlanetView,
    category: LabCategory,
    rules: &RuleTables,
) -> Option<crate::core::types::BuildingTypeId> {
    planet
        .buildings
        .iter()
        .find(|instance| {
            instance.state == BuildingState::Active
                && rules
                    .building(&instance.type_id)
                    .map(|bt| bt.lab_capacity(category) > 0)
                    .unwrap_or(false)
        })
        .map(|instance| instance.type_id.clone())
}
