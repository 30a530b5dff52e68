//! Migration-based local search.
//!
//! Refines an initial schedule toward lower device energy under the
//! completion-time deadline by repeatedly moving one task to a different
//! venue. Steepest descent: every iteration re-enumerates all candidate
//! moves from scratch, evaluates each hypothetical schedule with a full
//! kernel re-computation, and commits the best one.
//!
//! # Acceptance rules
//!
//! - **Pass 1 (energy reduction)**: among candidates whose makespan does
//!   not exceed the pre-move makespan, take the largest strict energy
//!   reduction.
//! - **Pass 2 (efficiency ratio)**: only when pass 1 finds nothing — among
//!   candidates that meet the deadline, strictly reduce energy, and
//!   strictly increase the makespan, take the largest energy-saved per
//!   makespan-added ratio. Candidates at or below the pre-move makespan are
//!   excluded here (a positive saving there would already have won pass 1),
//!   which also keeps the ratio's denominator strictly positive.
//!
//! Both passes compare with strict `>`, so the first enumerated candidate
//! wins ties; enumeration runs source venue ascending, lane position
//! ascending, destination venue ascending (cloud first). Every committed
//! move strictly lowers energy and venue assignments are finite, so the
//! search always terminates.
//!
//! Only tasks currently on a local core are considered as migration
//! sources; a task that reaches the cloud stays there. The published
//! heuristic carries this asymmetry and it is preserved here as-is.

use tracing::{debug, trace};

use crate::models::{FinishTimes, Move, Platform, Schedule, TaskGraph, CLOUD_VENUE};

use super::{kernel, kpi};

/// Which acceptance rule selected a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePass {
    /// Pass 1: strict energy reduction without stretching the makespan.
    EnergyReduction,
    /// Pass 2: best energy-per-time ratio within the deadline.
    EfficiencyRatio,
}

/// A selected migration together with the evaluation that justified it.
#[derive(Debug, Clone, Copy)]
pub struct ChosenMove {
    /// The migration to commit.
    pub mv: Move,
    /// Total energy of the hypothetical schedule.
    pub energy: f64,
    /// Makespan of the hypothetical schedule.
    pub makespan: f64,
    /// The acceptance rule that selected it.
    pub pass: MovePass,
}

/// The converged schedule and its final evaluation.
#[derive(Debug, Clone)]
pub struct MigrationResult {
    /// The committed schedule after the last accepted move.
    pub schedule: Schedule,
    /// Finish times freshly recomputed on the committed schedule.
    pub finish_times: FinishTimes,
    /// Total device energy of the committed schedule.
    pub total_energy: f64,
    /// Makespan of the committed schedule.
    pub makespan: f64,
    /// Number of accepted migrations.
    pub iterations: usize,
}

/// Selects the best single-task migration for the current schedule, or
/// `None` when no candidate passes either acceptance rule.
///
/// `prev_energy` and `prev_makespan` must be the current schedule's own
/// evaluation; candidates are judged relative to them.
pub fn best_move(
    graph: &TaskGraph,
    platform: &Platform,
    schedule: &Schedule,
    prev_energy: f64,
    prev_makespan: f64,
) -> Option<ChosenMove> {
    struct Candidate {
        mv: Move,
        energy: f64,
        makespan: f64,
    }

    let mut candidates = Vec::new();
    for source in 1..=schedule.core_count() {
        for &task in schedule.lane(source) {
            for dest in 0..schedule.venue_count() {
                if dest == source {
                    continue;
                }
                let mv = Move {
                    task,
                    from: source,
                    to: dest,
                };
                let hypothetical = schedule.apply_move(graph, &mv);
                let eval = kernel::evaluate(graph, platform, &hypothetical);
                let energy = kpi::total_energy(graph, platform, &hypothetical);
                trace!(
                    task,
                    from = source,
                    to = dest,
                    energy,
                    makespan = eval.makespan,
                    "candidate evaluated"
                );
                candidates.push(Candidate {
                    mv,
                    energy,
                    makespan: eval.makespan,
                });
            }
        }
    }

    // Pass 1: greedy energy reduction, makespan must not grow.
    let mut chosen: Option<ChosenMove> = None;
    let mut best_reduction = 0.0;
    for c in &candidates {
        if c.makespan > prev_makespan {
            continue;
        }
        let reduction = prev_energy - c.energy;
        if reduction > best_reduction {
            best_reduction = reduction;
            chosen = Some(ChosenMove {
                mv: c.mv,
                energy: c.energy,
                makespan: c.makespan,
                pass: MovePass::EnergyReduction,
            });
        }
    }
    if chosen.is_some() {
        return chosen;
    }

    // Pass 2: trade makespan for energy at the best rate, within deadline.
    let mut best_ratio = 0.0;
    for c in &candidates {
        if c.makespan > platform.deadline || c.energy >= prev_energy {
            continue;
        }
        if c.makespan <= prev_makespan {
            // A saving here would have won pass 1; also guards the ratio
            // against a zero or negative time delta.
            continue;
        }
        let ratio = (prev_energy - c.energy) / (c.makespan - prev_makespan);
        if ratio > best_ratio {
            best_ratio = ratio;
            chosen = Some(ChosenMove {
                mv: c.mv,
                energy: c.energy,
                makespan: c.makespan,
                pass: MovePass::EfficiencyRatio,
            });
        }
    }
    chosen
}

/// Runs the local search to convergence, committing one move per iteration.
///
/// Flips the migrated task's cloud classification whenever it crosses the
/// cloud boundary. The returned finish times come from a kernel run on the
/// final committed schedule — never from a discarded candidate.
pub fn optimize(
    graph: &mut TaskGraph,
    platform: &Platform,
    mut schedule: Schedule,
) -> MigrationResult {
    let mut iterations = 0usize;
    loop {
        let current = kernel::evaluate(graph, platform, &schedule);
        let prev_energy = kpi::total_energy(graph, platform, &schedule);

        match best_move(graph, platform, &schedule, prev_energy, current.makespan) {
            None => {
                debug!(
                    iterations,
                    energy = prev_energy,
                    makespan = current.makespan,
                    "migration search converged"
                );
                return MigrationResult {
                    schedule,
                    finish_times: current.finish_times,
                    total_energy: prev_energy,
                    makespan: current.makespan,
                    iterations,
                };
            }
            Some(chosen) => {
                debug!(
                    task = chosen.mv.task,
                    from = chosen.mv.from,
                    to = chosen.mv.to,
                    energy = chosen.energy,
                    makespan = chosen.makespan,
                    pass = ?chosen.pass,
                    "committing migration"
                );
                schedule = schedule.apply_move(graph, &chosen.mv);
                graph.task_mut(chosen.mv.task).is_cloud = chosen.mv.to == CLOUD_VENUE;
                iterations += 1;
            }
        }
    }
}
