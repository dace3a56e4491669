//! Deterministic priority scoring.
//!
//! Pure computation: a task snapshot, a strategy, a config, and an explicit
//! "today" in — a ranked, explained output out. Same inputs always produce
//! the same output; there is no randomness anywhere in this module.

use chrono::NaiveDate;
use serde::Serialize;

use super::graph::DepGraph;
use super::strategy::Strategy;
use crate::config::ScoringConfig;
use crate::tasks::Task;

/// Top of the scoring scale. Labels and normalization are defined over 0–10.
const MAX_SCORE: f64 = 10.0;

/// Priority band a score falls into, by fixed threshold — never by list
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriorityLabel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PriorityLabel::Low => "Low",
            PriorityLabel::Medium => "Medium",
            PriorityLabel::High => "High",
        })
    }
}

/// A task with its computed priority. Serialized field names match the
/// original client contract (`priority_score`, `priority_label`).
#[derive(Debug, Clone, Serialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: Task,
    #[serde(rename = "priority_score")]
    pub score: f64,
    #[serde(rename = "priority_label")]
    pub label: PriorityLabel,
    pub explanation: String,
}

/// Output of one scoring call: tasks in descending score order plus any
/// dependency cycles found (dependency_aware only). Recomputed per call,
/// never persisted.
#[derive(Debug, Clone, Serialize, Default)]
pub struct Ranking {
    pub entries: Vec<ScoredTask>,
    pub cycles: Vec<super::graph::DependencyCycle>,
}

pub(crate) fn rank(
    tasks: &[Task],
    strategy: Strategy,
    cfg: &ScoringConfig,
    today: NaiveDate,
) -> Ranking {
    if tasks.is_empty() {
        return Ranking::default();
    }

    let urgency: Vec<f64> = tasks.iter().map(|t| urgency_score(t, today, cfg)).collect();
    let importance: Vec<f64> = tasks.iter().map(|t| f64::from(t.importance)).collect();

    let mut cycles = Vec::new();
    let scored: Vec<(f64, String)> = match strategy {
        Strategy::Urgency => tasks
            .iter()
            .zip(&urgency)
            .map(|(t, &u)| (u, urgency_explanation(t, today, u)))
            .collect(),
        Strategy::Importance => tasks
            .iter()
            .map(|t| {
                (
                    f64::from(t.importance),
                    format!("importance {}/10", t.importance),
                )
            })
            .collect(),
        Strategy::Balanced => balanced_scores(&urgency, &importance, cfg)
            .into_iter()
            .map(|b| (b.score, b.explanation))
            .collect(),
        Strategy::DependencyAware => {
            let graph = DepGraph::build(tasks);
            let balanced = balanced_scores(&urgency, &importance, cfg);
            let scored = tasks
                .iter()
                .enumerate()
                .map(|(i, _)| dependency_aware_score(i, &graph, &balanced[i], cfg))
                .collect();
            cycles = graph.cycles().to_vec();
            scored
        }
    };

    // Stable descending sort: score first, then the strategy's tie key, then
    // original insertion order — equal-score tasks never swap run-to-run.
    let mut order: Vec<usize> = (0..tasks.len()).collect();
    order.sort_by(|&a, &b| {
        scored[b].0.total_cmp(&scored[a].0).then_with(|| {
            let tie = match strategy {
                Strategy::Urgency => tasks[b].importance.cmp(&tasks[a].importance),
                _ => std::cmp::Ordering::Equal,
            };
            tie.then(a.cmp(&b))
        })
    });

    let entries = order
        .into_iter()
        .map(|i| {
            let (score, explanation) = scored[i].clone();
            ScoredTask {
                task: tasks[i].clone(),
                score,
                label: label_for(score, cfg),
                explanation,
            }
        })
        .collect();

    Ranking { entries, cycles }
}

// ─── Factor scores ────────────────────────────────────────────────────────────

/// Inverse of days-until-due: due today or overdue hits the ceiling; an
/// undated task sits at the configured non-zero floor.
fn urgency_score(task: &Task, today: NaiveDate, cfg: &ScoringConfig) -> f64 {
    match task.due_date {
        Some(due) => {
            let days = (due - today).num_days();
            if days <= 0 {
                MAX_SCORE
            } else {
                MAX_SCORE / (1.0 + days as f64)
            }
        }
        None => cfg.no_due_date_score,
    }
}

fn urgency_explanation(task: &Task, today: NaiveDate, score: f64) -> String {
    let due_phrase = match task.due_date {
        Some(due) => {
            let days = (due - today).num_days();
            if days < 0 {
                format!("overdue by {} day(s), maximum urgency", -days)
            } else if days == 0 {
                "due today, maximum urgency".to_string()
            } else {
                format!("due in {} day(s), urgency {:.1}/10", days, score)
            }
        }
        None => format!("no due date, floor urgency {:.1}/10", score),
    };
    format!("{}; importance {}/10", due_phrase, task.importance)
}

struct BalancedScore {
    score: f64,
    norm_urgency: f64,
    norm_importance: f64,
    explanation: String,
}

fn balanced_scores(urgency: &[f64], importance: &[f64], cfg: &ScoringConfig) -> Vec<BalancedScore> {
    let norm_u = normalize(urgency);
    let norm_i = normalize(importance);

    // Degenerate weights (both zero) fall back to an even split so the
    // result stays on the 0-10 scale.
    let (uw, iw) = if cfg.urgency_weight + cfg.importance_weight > 0.0 {
        (cfg.urgency_weight, cfg.importance_weight)
    } else {
        (1.0, 1.0)
    };
    let wsum = uw + iw;

    norm_u
        .iter()
        .zip(&norm_i)
        .map(|(&nu, &ni)| {
            let score = (uw * nu + iw * ni) / wsum;
            let explanation = format!(
                "urgency {:.1}/10 and importance {:.1}/10, weighted {:.0}%/{:.0}%",
                nu,
                ni,
                uw / wsum * 100.0,
                iw / wsum * 100.0
            );
            BalancedScore {
                score,
                norm_urgency: nu,
                norm_importance: ni,
                explanation,
            }
        })
        .collect()
}

fn dependency_aware_score(
    i: usize,
    graph: &DepGraph,
    balanced: &BalancedScore,
    cfg: &ScoringConfig,
) -> (f64, String) {
    if graph.in_cycle(i) {
        let explanation = format!(
            "part of a dependency cycle, scored on urgency {:.1}/10 and importance {:.1}/10 only",
            balanced.norm_urgency, balanced.norm_importance
        );
        return (balanced.score, explanation);
    }

    let dependents = graph.direct_dependents(i);
    let height = graph.height(i);
    let boost = cfg.dependents_weight * dependents as f64 + cfg.depth_weight * height as f64;
    let score = (balanced.score + boost).clamp(0.0, MAX_SCORE);

    let explanation = if dependents > 0 {
        format!(
            "{} task(s) depend on this (longest chain {}), boost +{:.1}; balanced base {:.1}/10",
            dependents, height, boost, balanced.score
        )
    } else {
        format!(
            "no tasks waiting on this; balanced base {:.1}/10",
            balanced.score
        )
    };
    (score, explanation)
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Min-max normalization of a batch onto [0,10]. A batch with no spread maps
/// to the 5.0 midpoint (ordering is unaffected: every value is equal).
fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return vec![MAX_SCORE / 2.0; values.len()];
    }
    values
        .iter()
        .map(|v| (v - min) / (max - min) * MAX_SCORE)
        .collect()
}

fn label_for(score: f64, cfg: &ScoringConfig) -> PriorityLabel {
    if score >= cfg.high_threshold {
        PriorityLabel::High
    } else if score >= cfg.medium_threshold {
        PriorityLabel::Medium
    } else {
        PriorityLabel::Low
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
