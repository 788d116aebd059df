//! Presentation of a running scenario
//!
//! The scene never draws anything. The run loop hands every frame to a
//! [`Presenter`], which decides what to show and where.

use log::info;

use rust_physics::prelude::*;

use crate::scenario::Scenario;

/// Totals gathered over a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    /// Ticks executed
    pub ticks: u64,
    /// Simulated seconds elapsed
    pub time: f64,
    /// Collision handlers invoked
    pub collisions: usize,
    /// Bodies removed
    pub removed: usize,
}

/// Receives the scene after every tick
pub trait Presenter {
    /// Called once before the first tick
    fn begin(&mut self, _scenario: &Scenario) {}

    /// Called after each tick with that tick's counters
    fn frame(&mut self, tick: u64, scenario: &Scenario, stats: &TickStats);

    /// Called once after the last tick
    fn finish(&mut self, _scenario: &Scenario, _summary: &RunSummary) {}
}

/// Logs a line per body every `every` ticks
#[derive(Debug)]
pub struct LogPresenter {
    every: u64,
}

impl LogPresenter {
    /// Report every `every` ticks; 0 reports only the start and the end
    pub const fn new(every: u64) -> Self {
        Self { every }
    }

    fn log_bodies(scenario: &Scenario) {
        for (handle, body) in scenario.scene.bodies() {
            let c = body.centroid();
            let v = body.velocity();
            info!(
                "  {:<12} {:?} at ({:.3}, {:.3}) v=({:.3}, {:.3}) angle {:.3}",
                scenario.name_of(handle),
                body.kind(),
                c.x,
                c.y,
                v.x,
                v.y,
                body.angle()
            );
        }
    }
}

impl Presenter for LogPresenter {
    fn begin(&mut self, scenario: &Scenario) {
        info!("t=0.000: {} bodies", scenario.scene.body_count());
        Self::log_bodies(scenario);
    }

    fn frame(&mut self, tick: u64, scenario: &Scenario, stats: &TickStats) {
        if stats.removed > 0 {
            info!("tick {tick}: {} bodies removed", stats.removed);
        }
        if self.every > 0 && tick % self.every == 0 {
            info!(
                "tick {tick} t={:.3}: {} bodies, {} collisions",
                scenario.scene.time(),
                scenario.scene.body_count(),
                stats.collisions
            );
            Self::log_bodies(scenario);
        }
    }

    fn finish(&mut self, scenario: &Scenario, summary: &RunSummary) {
        info!(
            "finished after {} ticks ({:.3}s simulated): {} collisions, {} bodies removed, {} left",
            summary.ticks,
            summary.time,
            summary.collisions,
            summary.removed,
            scenario.scene.body_count()
        );
    }
}

/// Tick `scenario` up to `ticks` times, stopping early once the scene is empty
pub fn run(scenario: &mut Scenario, ticks: u64, dt: f64, presenter: &mut dyn Presenter) -> RunSummary {
    let mut summary = RunSummary::default();
    presenter.begin(scenario);

    for tick in 1..=ticks {
        if scenario.scene.body_count() == 0 {
            break;
        }
        let stats = scenario.scene.tick(dt);
        summary.ticks = tick;
        summary.collisions += stats.collisions;
        summary.removed += stats.removed;
        presenter.frame(tick, scenario, &stats);
    }

    summary.time = scenario.scene.time();
    presenter.finish(scenario, &summary);
    summary
}
