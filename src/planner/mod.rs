//! Strategic planners and the per-tick orchestrator
//!
//! Planning is synchronous, single-threaded and read-only: a planner never
//! touches shared state, it only returns commands. The read-plan /
//! write-apply phase separation is the concurrency mechanism; planners hold
//! no locks and need none.

pub mod colonization;
pub mod construction;
pub mod research;
pub mod toolkit;

pub use colonization::ColonizationPlanner;
pub use construction::ConstructionPlanner;
pub use research::ResearchPlanner;

use crate::command::Command;
use crate::rules::RuleTables;
use crate::snapshot::WorldSnapshot;

/// One strategic concern, planned once per tick
///
/// `plan` must never panic: configuration errors degrade to "do nothing this
/// tick" and are retried naturally once the data is fixed.
pub trait Planner {
    fn name(&self) -> &'static str;

    fn plan(&self, snapshot: &WorldSnapshot, rules: &RuleTables) -> Vec<Command>;
}

/// Runs the configured ordered planner list for a tick
///
/// Every planner runs every tick; their command lists are concatenated in
/// planner order. Running all planners (rather than halting after the first
/// one that queues commands) is safe because each planner owns a disjoint
/// concern and every command re-validates its precondition at apply time.
pub struct TickPlanner {
    planners: Vec<Box<dyn Planner>>,
}

impl TickPlanner {
    pub fn new() -> Self {
        Self { planners: Vec::new() }
    }

    /// The standard planner stack for a faction, in priority order
    pub fn standard(faction: crate::core::types::FactionId) -> Self {
        let mut tick_planner = Self::new();
        tick_planner.push(Box::new(ColonizationPlanner::new()));
        tick_planner.push(Box::new(ResearchPlanner::new(faction)));
        tick_planner.push(Box::new(ConstructionPlanner::new()));
        tick_planner
    }

    pub fn push(&mut self, planner: Box<dyn Planner>) {
        self.planners.push(planner);
    }

    /// Plan one tick: the concatenation of every planner's command list
    pub fn plan_tick(&self, snapshot: &WorldSnapshot, rules: &RuleTables) -> Vec<Command> {
        let mut queue = Vec::new();
        for planner in &self.planners {
            let commands = planner.plan(snapshot, rules);
            tracing::debug!(
                planner = planner.name(),
                commands = commands.len(),
                tick = snapshot.tick,
                "planner finished"
            );
            queue.extend(commands);
        }
        queue
    }
}

impl Default for TickPlanner {
    fn default() -> Self {
        Self::new()
    }
}
