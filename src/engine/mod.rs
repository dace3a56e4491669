//! Priority scoring engine.
//!
//! Pure and stateless: callers hand in a task snapshot, a [`Strategy`], and
//! the scoring config; they get back a [`Ranking`] with a score, a threshold
//! label, and a factor-citing explanation per task. Identical inputs always
//! produce identical output, so rankings are regression-testable.

pub mod graph;
pub mod scoring;
pub mod strategy;

pub use graph::DependencyCycle;
pub use scoring::{PriorityLabel, Ranking, ScoredTask};
pub use strategy::{Strategy, UnknownStrategyError};

use chrono::NaiveDate;

use crate::config::ScoringConfig;
use crate::tasks::Task;

/// Score every task in the snapshot under the given strategy, evaluating
/// due dates against the local calendar day.
pub fn score(tasks: &[Task], strategy: Strategy, cfg: &ScoringConfig) -> Ranking {
    score_on(tasks, strategy, cfg, chrono::Local::now().date_naive())
}

/// [`score`] with an explicit "today" — the deterministic seam for tests and
/// replays.
pub fn score_on(
    tasks: &[Task],
    strategy: Strategy,
    cfg: &ScoringConfig,
    today: NaiveDate,
) -> Ranking {
    let start = std::time::Instant::now();
    let ranking = scoring::rank(tasks, strategy, cfg, today);
    tracing::debug!(
        strategy = %strategy,
        tasks = tasks.len(),
        cycles = ranking.cycles.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "scored task set"
    );
    ranking
}

/// The top `n` of the full ranking: one scoring call, then truncation.
/// Never re-scored, so the suggestions are always a prefix of [`score`]'s
/// output for the same snapshot.
pub fn suggest_top(tasks: &[Task], strategy: Strategy, cfg: &ScoringConfig, n: usize) -> Ranking {
    suggest_top_on(tasks, strategy, cfg, n, chrono::Local::now().date_naive())
}

/// [`suggest_top`] with an explicit "today".
pub fn suggest_top_on(
    tasks: &[Task],
    strategy: Strategy,
    cfg: &ScoringConfig,
    n: usize,
    today: NaiveDate,
) -> Ranking {
    let mut ranking = score_on(tasks, strategy, cfg, today);
    ranking.entries.truncate(n);
    ranking
}
