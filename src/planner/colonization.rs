//! Territorial expansion planning
//!
//! Decides once per tick whether and how to expand: reconciles stale
//! colonize missions, fires colonize commands for arrived fleets, assigns
//! idle colony fleets to targets, and falls back through the infrastructure
//! chain (spaceport -> fleet deployment -> colony ship production) when no
//! fleet is ready.

use crate::command::Command;
use crate::core::types::{FleetId, PlanetId, UnitKind};
use crate::planner::toolkit::{self, find_building, may_spend_money};
use crate::planner::Planner;
use crate::rules::{Capability, RuleTables};
use crate::snapshot::{FleetTask, PlanetKnowledge, PlanetView, WorldSnapshot};
use ordered_float::OrderedFloat;
use std::collections::BTreeSet;

/// A rival must hold this many more planets than us before envy alone
/// triggers expansion
const RIVAL_LEAD_MARGIN: usize = 2;

/// Plans territorial expansion for the snapshot's faction
///
/// In explicit mode only the externally supplied target set is considered;
/// in opportunistic mode expansion triggers on blocked research, a rival
/// planet lead, or colony ships already at hand.
pub struct ColonizationPlanner {
    /// Operator-configured between ticks, never during planning
    pub explicit_mode: bool,
}

impl ColonizationPlanner {
    pub fn new() -> Self {
        Self { explicit_mode: false }
    }

    pub fn explicit() -> Self {
        Self { explicit_mode: true }
    }

    /// Colonize-tasked fleets whose target became ineligible
    fn invalid_colonizers(&self, snapshot: &WorldSnapshot) -> Vec<FleetId> {
        toolkit::find_fleets_with_task(snapshot, FleetTask::Colonize, |fleet| {
            let Some(target) = fleet.target_planet else {
                return true;
            };
            match snapshot.planet(target) {
                None => true,
                Some(planet) => {
                    planet.owner.is_some()
                        || planet.knowledge < PlanetKnowledge::Owner
                        || (self.explicit_mode
                            && !snapshot.colonization_targets.contains(&target))
                }
            }
        })
        .into_iter()
        .map(|f| f.id)
        .collect()
    }

    /// Colonize commands for fleets stationed at their target
    fn arrival_commands(
        &self,
        snapshot: &WorldSnapshot,
        cancelled: &BTreeSet<FleetId>,
    ) -> Vec<Command> {
        let mut commands = Vec::new();
        let arrived = toolkit::find_fleets_with_task(snapshot, FleetTask::Colonize, |fleet| {
            !cancelled.contains(&fleet.id)
                && !fleet.is_moving()
                && fleet.target_planet.is_some()
                && fleet.arrived_at == fleet.target_planet
        });
        for fleet in arrived {
            if let Some(planet) = fleet.target_planet {
                commands.push(Command::Colonize { fleet: fleet.id, planet });
                commands.push(Command::ClearColonizationTarget { planet });
            }
        }
        commands
    }

    /// Opportunistic-mode expansion triggers
    fn expansion_triggered(&self, snapshot: &WorldSnapshot, rules: &RuleTables) -> bool {
        if research_blocked_on_planets(snapshot, rules) {
            tracing::debug!("expansion trigger: research blocked pending planets");
            return true;
        }
        if self.rival_has_material_lead(snapshot) && !snapshot.unknown_planets.is_empty() {
            tracing::debug!("expansion trigger: rival planet lead");
            return true;
        }
        if colony_ships_available(snapshot) {
            tracing::debug!("expansion trigger: colony ships at hand");
            return true;
        }
        false
    }

    fn rival_has_material_lead(&self, snapshot: &WorldSnapshot) -> bool {
        let mut per_owner: std::collections::BTreeMap<_, usize> = Default::default();
        for planet in snapshot.enemy_planets.values() {
            if let Some(owner) = planet.owner {
                *per_owner.entry(owner).or_default() += 1;
            }
        }
        per_owner
            .values()
            .any(|&count| count > snapshot.own_planets.len() + RIVAL_LEAD_MARGIN)
    }

    /// Eligible expansion targets: sufficient knowledge, not ours, not
    /// already being flown to, filtered by mode
    fn candidate_planets<'a>(&self, snapshot: &'a WorldSnapshot) -> Vec<&'a PlanetView> {
        let in_flight: BTreeSet<PlanetId> =
            toolkit::find_fleets_with_task(snapshot, FleetTask::Colonize, |_| true)
                .into_iter()
                .filter_map(|f| f.target_planet)
                .collect();

        snapshot
            .enemy_planets
            .values()
            .chain(snapshot.unknown_planets.values())
            .filter(|planet| {
                if planet.knowledge < PlanetKnowledge::Owner {
                    return false;
                }
                if planet.is_owned_by(snapshot.faction) {
                    return false;
                }
                if planet.owner.is_some() && !snapshot.policy.may_conquer {
                    return false;
                }
                if in_flight.contains(&planet.id) {
                    return false;
                }
                if self.explicit_mode {
                    snapshot.colonization_targets.contains(&planet.id)
                } else {
                    snapshot
                        .distance_to_territory(planet.position)
                        .map_or(false, |d| d <= snapshot.policy.colonization_limit)
                }
            })
            .collect()
    }

    /// Greedily send each idle colony fleet to its nearest unclaimed
    /// candidate; targets are picked per fleet, not as a global matching
    fn assignment_commands(
        &self,
        snapshot: &WorldSnapshot,
        candidates: &[&PlanetView],
    ) -> Vec<Command> {
        let mut pool: Vec<&PlanetView> = candidates
            .iter()
            .copied()
            .filter(|p| p.owner.is_none())
            .collect();
        let fleets = toolkit::find_fleets_for(snapshot, FleetTask::Colonize, |fleet| {
            fleet.task == FleetTask::Idle && fleet.carries(UnitKind::ColonyShip)
        });

        let mut commands = Vec::new();
        for fleet in fleets {
            let Some((index, _)) = pool.iter().enumerate().min_by_key(|(_, planet)| {
                (
                    OrderedFloat(planet.position.distance(&fleet.position)),
                    planet.id,
                )
            }) else {
                break;
            };
            let target = pool.remove(index);
            commands.push(Command::MoveFleet {
                fleet: fleet.id,
                target: target.id,
                task: FleetTask::Colonize,
            });
        }
        commands
    }

    /// Queue construction of the first military spaceport
    fn spaceport_commands(&self, snapshot: &WorldSnapshot, rules: &RuleTables) -> Vec<Command> {
        let Some(spaceport) = find_building(rules, Capability::MilitarySpaceport) else {
            tracing::warn!("rule tables define no military spaceport building");
            return Vec::new();
        };
        // Most developed planet first
        toolkit::plan_category(
            snapshot,
            rules,
            |p| !p.stats.constructing,
            |a, b| b.buildings.len().cmp(&a.buildings.len()),
            |bt, _| bt.id == spaceport.id,
            |a, b| a.cost.cmp(&b.cost),
            false,
        )
    }

    /// Create a fleet at a spaceport planet and load a colony ship from
    /// inventory
    fn deployment_commands(&self, snapshot: &WorldSnapshot) -> Vec<Command> {
        let Some(planet) = snapshot
            .own_planets
            .values()
            .find(|p| p.stats.has_military_spaceport)
        else {
            return Vec::new();
        };
        vec![
            Command::CreateFleet {
                planet: planet.id,
                cargo: vec![(UnitKind::ColonyShip, 1)],
            },
            Command::ChangeInventory { kind: UnitKind::ColonyShip, delta: -1 },
        ]
    }

    /// Order colony ship production, building an orbital factory first if
    /// the unit requires one
    fn production_commands(&self, snapshot: &WorldSnapshot, rules: &RuleTables) -> Vec<Command> {
        let Some(unit) = rules.unit(UnitKind::ColonyShip) else {
            tracing::warn!("rule tables define no colony ship unit");
            return Vec::new();
        };

        if unit.requires_orbital_factory && snapshot.global.orbital_factories == 0 {
            let Some(factory) = find_building(rules, Capability::OrbitalFactory) else {
                tracing::warn!("rule tables define no orbital factory building");
                return Vec::new();
            };
            return toolkit::plan_category(
                snapshot,
                rules,
                |p| !p.stats.constructing,
                |a, b| b.buildings.len().cmp(&a.buildings.len()),
                |bt, _| bt.id == factory.id,
                |a, b| a.cost.cmp(&b.cost),
                false,
            );
        }

        let Some(yard) = snapshot
            .own_planets
            .values()
            .find(|p| p.stats.has_orbital_factory)
            .or_else(|| {
                snapshot
                    .own_planets
                    .values()
                    .find(|p| p.stats.has_military_spaceport)
            })
        else {
            return Vec::new();
        };

        let budget = snapshot.money - snapshot.policy.auto_build_limit;
        let affordable = (budget / unit.cost.max(1)).max(1) as u32;
        let count = if self.explicit_mode { affordable } else { 1 };
        vec![Command::OrderUnits { planet: yard.id, kind: UnitKind::ColonyShip, count }]
    }
}

impl Default for ColonizationPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner for ColonizationPlanner {
    fn name(&self) -> &'static str {
        "colonization"
    }

    fn plan(&self, snapshot: &WorldSnapshot, rules: &RuleTables) -> Vec<Command> {
        let mut queue = Vec::new();

        // Cancellations always precede any new assignment this tick
        let cancelled: BTreeSet<FleetId> = self.invalid_colonizers(snapshot).into_iter().collect();
        queue.extend(cancelled.iter().map(|&fleet| Command::StopFleet { fleet }));

        queue.extend(self.arrival_commands(snapshot, &cancelled));

        // A colonizer still on mission counts as this tick's expansion action
        let active_colonizers =
            toolkit::find_fleets_with_task(snapshot, FleetTask::Colonize, |fleet| {
                !cancelled.contains(&fleet.id)
            });
        if !active_colonizers.is_empty() {
            return queue;
        }

        if self.explicit_mode {
            if snapshot.colonization_targets.is_empty() {
                return queue;
            }
        } else if !self.expansion_triggered(snapshot, rules) {
            return queue;
        }

        // An empty candidate set does not end the tick: readiness work
        // below still runs so ships are on hand when targets appear
        let candidates = self.candidate_planets(snapshot);
        let assignments = self.assignment_commands(snapshot, &candidates);
        if !assignments.is_empty() {
            queue.extend(assignments);
            return queue;
        }

        // Infrastructure gating: no spaceport means no colonization progress
        // this tick, at best we start building one
        if snapshot.global.military_spaceports == 0 {
            if snapshot.global.spaceports_constructing == 0 && may_spend_money(snapshot) {
                queue.extend(self.spaceport_commands(snapshot, rules));
            }
            return queue;
        }

        if snapshot.in_inventory(UnitKind::ColonyShip) > 0 {
            queue.extend(self.deployment_commands(snapshot));
            return queue;
        }

        if may_spend_money(snapshot) {
            queue.extend(self.production_commands(snapshot, rules));
        }
        queue
    }
}

/// True when every pending research item needs more owned planets than the
/// faction holds in at least one lab category
fn research_blocked_on_planets(snapshot: &WorldSnapshot, rules: &RuleTables) -> bool {
    if !snapshot.policy.research_requires_colonization {
        return false;
    }
    if snapshot.running_research.is_some() {
        return false;
    }
    let pending: Vec<_> = snapshot
        .remaining_research
        .iter()
        .filter_map(|id| rules.research(id))
        .collect();
    if pending.is_empty() {
        return false;
    }
    let planets = snapshot.own_planets.len() as u32;
    pending.iter().all(|tech| {
        crate::core::types::LabCategory::ALL
            .iter()
            .any(|&c| tech.labs.get(c) > planets)
    })
}

fn colony_ships_available(snapshot: &WorldSnapshot) -> bool {
    snapshot.in_inventory(UnitKind::ColonyShip) > 0
        || snapshot
            .own_fleets
            .values()
            .any(|f| f.carries(UnitKind::ColonyShip))
}
