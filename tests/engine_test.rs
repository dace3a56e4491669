//! Integration tests for the priority scoring engine.

use chrono::NaiveDate;
use proptest::prelude::{prop, prop_assert, prop_assert_eq, proptest};
use proptest::strategy::Strategy as _;
use taskdeck::config::ScoringConfig;
use taskdeck::engine::{score_on, suggest_top_on, PriorityLabel, Strategy};
use taskdeck::tasks::Task;

fn day(s: &str) -> NaiveDate {
    s.parse().expect("iso date")
}

const TODAY: &str = "2026-08-08";

fn task(id: &str, importance: u8, due: Option<&str>, deps: &[&str]) -> Task {
    Task {
        id: id.to_string(),
        title: format!("task {id}"),
        due_date: due.map(day),
        estimated_hours: 1.0,
        importance,
        dependencies: deps.iter().map(|d| d.to_string()).collect(),
    }
}

// ── Determinism ──────────────────────────────────────────────────────────────

#[test]
fn scoring_twice_yields_identical_output() {
    let tasks = vec![
        task("a", 8, Some("2026-08-10"), &[]),
        task("b", 3, None, &["a"]),
        task("c", 5, Some("2026-09-01"), &["a", "b"]),
    ];
    for strategy in Strategy::ALL {
        let cfg = ScoringConfig::default();
        let first = score_on(&tasks, strategy, &cfg, day(TODAY));
        let second = score_on(&tasks, strategy, &cfg, day(TODAY));
        let a = serde_json::to_string(&first).unwrap();
        let b = serde_json::to_string(&second).unwrap();
        assert_eq!(a, b, "strategy {strategy} must be reproducible");
    }
}

// ── Worked example from the scoring contract ─────────────────────────────────

#[test]
fn importance_strategy_worked_example() {
    // X: importance 8, no due date. Y: importance 3, due today.
    let tasks = vec![
        Task {
            id: "1".to_string(),
            title: "X".to_string(),
            due_date: None,
            estimated_hours: 2.0,
            importance: 8,
            dependencies: vec![],
        },
        Task {
            id: "2".to_string(),
            title: "Y".to_string(),
            due_date: Some(day(TODAY)),
            estimated_hours: 1.0,
            importance: 3,
            dependencies: vec![],
        },
    ];
    let r = score_on(&tasks, Strategy::Importance, &ScoringConfig::default(), day(TODAY));
    assert_eq!(r.entries[0].task.title, "X");
    assert_eq!(r.entries[0].score, 8.0);
    assert_eq!(r.entries[0].label, PriorityLabel::High);
    assert_eq!(r.entries[1].task.title, "Y");
    assert_eq!(r.entries[1].score, 3.0);
    assert_eq!(r.entries[1].label, PriorityLabel::Low);
}

// ── Urgency ordering ─────────────────────────────────────────────────────────

#[test]
fn due_today_scores_at_least_due_next_week() {
    let tasks = vec![
        task("next_week", 5, Some("2026-08-15"), &[]),
        task("today", 5, Some(TODAY), &[]),
    ];
    let r = score_on(&tasks, Strategy::Urgency, &ScoringConfig::default(), day(TODAY));
    assert_eq!(r.entries[0].task.id, "today");
    assert!(r.entries[0].score >= r.entries[1].score);
}

#[test]
fn overdue_tasks_hit_the_ceiling() {
    let tasks = vec![task("late", 5, Some("2026-08-01"), &[])];
    let r = score_on(&tasks, Strategy::Urgency, &ScoringConfig::default(), day(TODAY));
    assert_eq!(r.entries[0].score, 10.0);
    assert!(r.entries[0].explanation.contains("overdue"));
}

// ── Dependency awareness ─────────────────────────────────────────────────────

#[test]
fn three_cycle_is_reported_and_independent_task_still_scores() {
    let tasks = vec![
        task("a", 5, None, &["b"]),
        task("b", 5, None, &["c"]),
        task("c", 5, None, &["a"]),
        task("d", 7, Some(TODAY), &[]),
    ];
    let r = score_on(
        &tasks,
        Strategy::DependencyAware,
        &ScoringConfig::default(),
        day(TODAY),
    );

    assert_eq!(r.cycles.len(), 1, "exactly one cycle expected");
    let mut ids = r.cycles[0].ids.clone();
    ids.sort();
    assert_eq!(ids, vec!["a", "b", "c"]);

    // Best effort: every task is present, including the cyclic ones.
    assert_eq!(r.entries.len(), tasks.len());
    let d = r.entries.iter().find(|e| e.task.id == "d").unwrap();
    assert!(d.score > 0.0, "independent task must still be scored");
}

#[test]
fn prerequisite_of_many_outranks_its_dependents() {
    let tasks = vec![
        task("leaf1", 6, None, &["hub"]),
        task("hub", 5, None, &[]),
        task("leaf2", 6, None, &["hub"]),
        task("leaf3", 6, None, &["hub"]),
    ];
    let r = score_on(
        &tasks,
        Strategy::DependencyAware,
        &ScoringConfig::default(),
        day(TODAY),
    );
    assert_eq!(r.entries[0].task.id, "hub");
    assert!(r.entries[0].explanation.contains("3 task(s)"));
}

// ── Suggest-top-N ────────────────────────────────────────────────────────────

#[test]
fn suggest_top_2_is_a_prefix_of_the_full_ranking() {
    let tasks = vec![
        task("a", 2, None, &[]),
        task("b", 9, Some(TODAY), &[]),
        task("c", 5, Some("2026-08-20"), &[]),
        task("d", 7, None, &["a"]),
        task("e", 4, Some("2026-08-09"), &[]),
    ];
    for strategy in Strategy::ALL {
        let cfg = ScoringConfig::default();
        let full = score_on(&tasks, strategy, &cfg, day(TODAY));
        let top = suggest_top_on(&tasks, strategy, &cfg, 2, day(TODAY));

        assert_eq!(top.entries.len(), 2);
        for (t, f) in top.entries.iter().zip(&full.entries) {
            assert_eq!(t.task.id, f.task.id, "{strategy}: suggestion diverged");
            assert_eq!(t.score, f.score, "{strategy}: score diverged");
            assert_eq!(t.explanation, f.explanation);
        }
    }
}

#[test]
fn suggest_more_than_available_returns_everything() {
    let tasks = vec![task("only", 5, None, &[])];
    let top = suggest_top_on(
        &tasks,
        Strategy::Balanced,
        &ScoringConfig::default(),
        10,
        day(TODAY),
    );
    assert_eq!(top.entries.len(), 1);
}

// ── Empty input ──────────────────────────────────────────────────────────────

#[test]
fn empty_task_set_is_an_empty_ranking_not_an_error() {
    for strategy in Strategy::ALL {
        let r = score_on(&[], strategy, &ScoringConfig::default(), day(TODAY));
        assert!(r.entries.is_empty());
        assert!(r.cycles.is_empty());
    }
}

// ── Property tests ───────────────────────────────────────────────────────────

/// Arbitrary task sets: bounded importance, optional near-future due dates,
/// dependencies only on earlier tasks (acyclic) or on unknown external ids.
fn arb_tasks() -> impl proptest::strategy::Strategy<Value = Vec<Task>> {
    prop::collection::vec(
        (
            1u8..=10,
            prop::option::of(0i64..60),
            prop::collection::vec(0usize..20, 0..3),
            prop::bool::ANY,
        ),
        0..20,
    )
    .prop_map(|rows| {
        let today = day(TODAY);
        rows.iter()
            .enumerate()
            .map(|(i, (importance, due_offset, dep_picks, external_dep))| {
                let mut dependencies: Vec<String> = dep_picks
                    .iter()
                    .filter(|&&p| p < i)
                    .map(|p| format!("t{p}"))
                    .collect();
                if *external_dep {
                    dependencies.push("external".to_string());
                }
                Task {
                    id: format!("t{i}"),
                    title: format!("task {i}"),
                    due_date: due_offset.map(|d| today + chrono::Duration::days(d)),
                    estimated_hours: 1.0,
                    importance: *importance,
                    dependencies,
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn output_length_always_equals_input_length(tasks in arb_tasks()) {
        for strategy in Strategy::ALL {
            let r = score_on(&tasks, strategy, &ScoringConfig::default(), day(TODAY));
            prop_assert_eq!(r.entries.len(), tasks.len());
        }
    }

    #[test]
    fn output_is_sorted_descending_by_score(tasks in arb_tasks()) {
        for strategy in Strategy::ALL {
            let r = score_on(&tasks, strategy, &ScoringConfig::default(), day(TODAY));
            for pair in r.entries.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }
    }

    #[test]
    fn equal_scores_preserve_insertion_order(tasks in arb_tasks()) {
        let index_of = |id: &str| tasks.iter().position(|t| t.id == id).unwrap();
        // Importance and balanced tie-break purely on insertion order.
        for strategy in [Strategy::Importance, Strategy::Balanced] {
            let r = score_on(&tasks, strategy, &ScoringConfig::default(), day(TODAY));
            for pair in r.entries.windows(2) {
                if pair[0].score == pair[1].score {
                    prop_assert!(
                        index_of(&pair[0].task.id) < index_of(&pair[1].task.id),
                        "equal-score tasks swapped"
                    );
                }
            }
        }
    }

    #[test]
    fn scores_stay_on_the_ten_point_scale(tasks in arb_tasks()) {
        for strategy in Strategy::ALL {
            let r = score_on(&tasks, strategy, &ScoringConfig::default(), day(TODAY));
            for e in &r.entries {
                prop_assert!(e.score.is_finite());
                prop_assert!((0.0..=10.0).contains(&e.score), "score {} off scale", e.score);
            }
        }
    }

    #[test]
    fn every_entry_carries_an_explanation(tasks in arb_tasks()) {
        for strategy in Strategy::ALL {
            let r = score_on(&tasks, strategy, &ScoringConfig::default(), day(TODAY));
            for e in &r.entries {
                prop_assert!(!e.explanation.is_empty());
            }
        }
    }
}
