//! Infrastructure upkeep planning
//!
//! Keeps power supply ahead of demand on owned planets: repairs damaged
//! power buildings first, then places the cheapest affordable energy
//! building on the planet with the worst deficit. One command per tick.

use crate::command::Command;
use crate::planner::toolkit::{self, may_spend_money};
use crate::planner::Planner;
use crate::rules::{Capability, RuleTables};
use crate::snapshot::{BuildingState, PlanetView, WorldSnapshot};

pub struct ConstructionPlanner;

impl ConstructionPlanner {
    pub fn new() -> Self {
        Self
    }

    fn repair_command(&self, snapshot: &WorldSnapshot, rules: &RuleTables) -> Option<Command> {
        for planet in snapshot.own_planets.values() {
            if planet.stats.constructing {
                continue;
            }
            let damaged = planet.buildings.iter().find(|instance| {
                instance.state == BuildingState::Damaged
                    && rules
                        .building(&instance.type_id)
                        .map(|bt| bt.provides(Capability::Energy))
                        .unwrap_or(false)
            });
            if let Some(instance) = damaged {
                return Some(Command::RepairBuilding {
                    planet: planet.id,
                    building: instance.type_id.clone(),
                });
            }
        }
        None
    }
}

impl Default for ConstructionPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner for ConstructionPlanner {
    fn name(&self) -> &'static str {
        "construction"
    }

    fn plan(&self, snapshot: &WorldSnapshot, rules: &RuleTables) -> Vec<Command> {
        if !may_spend_money(snapshot) {
            return Vec::new();
        }

        if let Some(repair) = self.repair_command(snapshot, rules) {
            return vec![repair];
        }

        let budget = snapshot.money - snapshot.policy.auto_build_limit;
        toolkit::plan_category(
            snapshot,
            rules,
            |p| !p.stats.constructing && energy_deficit(p, rules) > 0,
            |a, b| energy_deficit(b, rules).cmp(&energy_deficit(a, rules)),
            |bt, _| bt.provides(Capability::Energy) && bt.cost <= budget,
            |a, b| a.cost.cmp(&b.cost),
            false,
        )
    }
}

/// Active buildings drawing power minus active power capacity
fn energy_deficit(planet: &PlanetView, rules: &RuleTables) -> i64 {
    let mut demand = 0i64;
    let mut capacity = 0i64;
    for instance in &planet.buildings {
        if instance.state != BuildingState::Active {
            continue;
        }
        let Some(building_type) = rules.building(&instance.type_id) else {
            continue;
        };
        let energy = building_type.capacity(Capability::Energy);
        if energy > 0 {
            capacity += energy as i64 * instance.level as i64;
        } else {
            demand += 1;
        }
    }
    demand - capacity
}
