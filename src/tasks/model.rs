//! Task data model: drafts in, validated tasks out.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Generate a new ULID string.
pub fn new_id() -> String {
    ulid::Ulid::new().to_string()
}

/// Fallback effort estimate when the input is absent or invalid.
pub const DEFAULT_ESTIMATED_HOURS: f64 = 1.0;
/// Fallback importance when the input is absent or outside 1–10.
pub const DEFAULT_IMPORTANCE: u8 = 5;

/// One unit of work. Field names match the persisted JSON schema, so stored
/// arrays round-trip byte-compatibly across versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque unique id, assigned at creation, immutable.
    pub id: String,
    pub title: String,
    /// Optional calendar date; never earlier than the creation day.
    pub due_date: Option<NaiveDate>,
    /// Positive effort estimate in hours.
    pub estimated_hours: f64,
    /// 1 (lowest) … 10 (highest).
    pub importance: u8,
    /// Ids of tasks this task depends on. Ids absent from the current set are
    /// treated as already satisfied/external.
    pub dependencies: Vec<String>,
}

/// User input for creating or editing a task. Optional scalars get the
/// documented defaults applied; the store validates the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: Option<f64>,
    pub importance: Option<u8>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Rejected task input. The task is not added or updated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("task title must not be empty")]
    EmptyTitle,
    #[error("due date {due} is earlier than today ({today})")]
    DueDateInPast { due: NaiveDate, today: NaiveDate },
    #[error("task {id} cannot depend on itself")]
    SelfDependency { id: String },
}

impl Task {
    /// Validate a draft and mint a new task with a fresh id.
    ///
    /// Defaulting rules: `estimated_hours` falls back to 1.0 when absent,
    /// non-finite, or ≤ 0; `importance` falls back to 5 when absent or
    /// outside 1–10. Dependencies are deduplicated preserving first
    /// occurrence. A draft cannot self-depend — the id does not exist yet.
    pub fn from_draft(draft: TaskDraft, today: NaiveDate) -> Result<Self, ValidationError> {
        let (title, due_date) = validate_draft(&draft, today)?;
        Ok(Self {
            id: new_id(),
            title,
            due_date,
            estimated_hours: normalize_hours(draft.estimated_hours),
            importance: normalize_importance(draft.importance),
            dependencies: dedup_preserving_order(draft.dependencies),
        })
    }

    /// Apply a draft to an existing task, keeping its id.
    ///
    /// Same rules as [`Task::from_draft`], plus self-dependency rejection:
    /// a dependency list naming this task's own id is refused outright.
    pub fn apply_draft(&self, draft: TaskDraft, today: NaiveDate) -> Result<Self, ValidationError> {
        let (title, due_date) = validate_draft(&draft, today)?;
        if draft.dependencies.iter().any(|d| d == &self.id) {
            return Err(ValidationError::SelfDependency {
                id: self.id.clone(),
            });
        }
        Ok(Self {
            id: self.id.clone(),
            title,
            due_date,
            estimated_hours: normalize_hours(draft.estimated_hours),
            importance: normalize_importance(draft.importance),
            dependencies: dedup_preserving_order(draft.dependencies),
        })
    }
}

fn validate_draft(
    draft: &TaskDraft,
    today: NaiveDate,
) -> Result<(String, Option<NaiveDate>), ValidationError> {
    let title = draft.title.trim().to_string();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if let Some(due) = draft.due_date {
        if due < today {
            return Err(ValidationError::DueDateInPast { due, today });
        }
    }
    Ok((title, draft.due_date))
}

fn normalize_hours(hours: Option<f64>) -> f64 {
    match hours {
        Some(h) if h.is_finite() && h > 0.0 => h,
        _ => DEFAULT_ESTIMATED_HOURS,
    }
}

fn normalize_importance(importance: Option<u8>) -> u8 {
    match importance {
        Some(i) if (1..=10).contains(&i) => i,
        _ => DEFAULT_IMPORTANCE,
    }
}

fn dedup_preserving_order(deps: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    deps.into_iter().filter(|d| seen.insert(d.clone())).collect()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().expect("iso date")
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_or_whitespace_title_is_rejected() {
        let today = day("2026-08-08");
        assert_eq!(
            Task::from_draft(draft(""), today),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(
            Task::from_draft(draft("   \t"), today),
            Err(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn past_due_date_is_rejected_today_is_fine() {
        let today = day("2026-08-08");
        let mut d = draft("ship release");
        d.due_date = Some(day("2026-08-07"));
        assert!(matches!(
            Task::from_draft(d, today),
            Err(ValidationError::DueDateInPast { .. })
        ));

        let mut d = draft("ship release");
        d.due_date = Some(today);
        assert!(Task::from_draft(d, today).is_ok());
    }

    #[test]
    fn invalid_scalars_fall_back_to_defaults() {
        let today = day("2026-08-08");
        let mut d = draft("estimate me");
        d.estimated_hours = Some(-2.0);
        d.importance = Some(0);
        let t = Task::from_draft(d, today).unwrap();
        assert_eq!(t.estimated_hours, DEFAULT_ESTIMATED_HOURS);
        assert_eq!(t.importance, DEFAULT_IMPORTANCE);

        let mut d = draft("nan hours");
        d.estimated_hours = Some(f64::NAN);
        d.importance = Some(11);
        let t = Task::from_draft(d, today).unwrap();
        assert_eq!(t.estimated_hours, 1.0);
        assert_eq!(t.importance, 5);
    }

    #[test]
    fn absent_scalars_fall_back_to_defaults() {
        let t = Task::from_draft(draft("bare"), day("2026-08-08")).unwrap();
        assert_eq!(t.estimated_hours, 1.0);
        assert_eq!(t.importance, 5);
        assert!(t.due_date.is_none());
        assert!(t.dependencies.is_empty());
    }

    #[test]
    fn dependencies_dedup_keeps_first_occurrence_order() {
        let mut d = draft("deps");
        d.dependencies = vec!["b".into(), "a".into(), "b".into(), "c".into(), "a".into()];
        let t = Task::from_draft(d, day("2026-08-08")).unwrap();
        assert_eq!(t.dependencies, vec!["b", "a", "c"]);
    }

    #[test]
    fn update_rejects_self_dependency() {
        let today = day("2026-08-08");
        let t = Task::from_draft(draft("loop"), today).unwrap();
        let mut d = draft("loop");
        d.dependencies = vec![t.id.clone()];
        assert_eq!(
            t.apply_draft(d, today),
            Err(ValidationError::SelfDependency { id: t.id.clone() })
        );
    }

    #[test]
    fn update_keeps_id_and_applies_new_fields() {
        let today = day("2026-08-08");
        let t = Task::from_draft(draft("before"), today).unwrap();
        let mut d = draft("after");
        d.importance = Some(9);
        let updated = t.apply_draft(d, today).unwrap();
        assert_eq!(updated.id, t.id);
        assert_eq!(updated.title, "after");
        assert_eq!(updated.importance, 9);
    }

    #[test]
    fn serde_round_trip_preserves_all_fields() {
        let mut d = draft("round trip");
        d.due_date = Some(day("2026-12-01"));
        d.estimated_hours = Some(2.5);
        d.importance = Some(8);
        d.dependencies = vec!["x".into(), "y".into()];
        let t = Task::from_draft(d, day("2026-08-08")).unwrap();

        let json = serde_json::to_string(&t).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
