//! Ordered, persistent task collection.
//!
//! Single-writer discipline: every mutation serializes through one async
//! mutex, persists the full ordered array, then notifies subscribers. Readers
//! get cloned snapshots, so scoring never races a write.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::model::{Task, TaskDraft, ValidationError};
use crate::events::{EventBroadcaster, StoreEvent};
use crate::storage::{Storage, TASKS_KEY};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("reorder index {index} out of range for {len} task(s)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("task not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub struct TaskStore {
    tasks: Mutex<Vec<Task>>,
    storage: Arc<Storage>,
    broadcaster: Arc<EventBroadcaster>,
}

impl TaskStore {
    /// Open the store, loading any previously persisted task array.
    ///
    /// A corrupt stored value is logged and replaced with an empty list on
    /// the next write rather than failing startup.
    pub async fn open(
        storage: Arc<Storage>,
        broadcaster: Arc<EventBroadcaster>,
    ) -> Result<Self, StoreError> {
        let tasks = match storage.get(TASKS_KEY).await? {
            Some(raw) => match serde_json::from_str::<Vec<Task>>(&raw) {
                Ok(tasks) => tasks,
                Err(e) => {
                    warn!(err = %e, "stored task array is unreadable — starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        info!(count = tasks.len(), "task store loaded");
        Ok(Self {
            tasks: Mutex::new(tasks),
            storage,
            broadcaster,
        })
    }

    /// Validate and append a new task. Returns the stored task with its id.
    pub async fn add(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        self.add_on(draft, today()).await
    }

    /// [`TaskStore::add`] with an explicit "today" — the deterministic seam
    /// used by due-date validation tests.
    pub async fn add_on(&self, draft: TaskDraft, today: NaiveDate) -> Result<Task, StoreError> {
        let task = Task::from_draft(draft, today)?;
        let mut tasks = self.tasks.lock().await;
        tasks.push(task.clone());
        self.persist(&tasks).await?;
        drop(tasks);
        self.broadcaster.broadcast(&StoreEvent::TaskAdded {
            id: task.id.clone(),
            title: task.title.clone(),
        });
        info!(id = %task.id, title = %task.title, "task added");
        Ok(task)
    }

    /// Replace an existing task's fields, keeping its id and position.
    pub async fn update(&self, id: &str, draft: TaskDraft) -> Result<Task, StoreError> {
        self.update_on(id, draft, today()).await
    }

    /// [`TaskStore::update`] with an explicit "today".
    pub async fn update_on(
        &self,
        id: &str,
        draft: TaskDraft,
        today: NaiveDate,
    ) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.lock().await;
        let slot = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let updated = slot.apply_draft(draft, today)?;
        *slot = updated.clone();
        self.persist(&tasks).await?;
        drop(tasks);
        self.broadcaster.broadcast(&StoreEvent::TaskUpdated {
            id: updated.id.clone(),
        });
        info!(id = %updated.id, "task updated");
        Ok(updated)
    }

    /// Remove a task by id ("mark done"). Returns whether a task was found.
    pub async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.lock().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.persist(&tasks).await?;
        drop(tasks);
        self.broadcaster.broadcast(&StoreEvent::TaskRemoved {
            id: id.to_string(),
        });
        info!(id = %id, "task removed");
        Ok(true)
    }

    /// Move the task at `from` so it sits at `to` (splice semantics: remove,
    /// then insert). Equal indices are a no-op; out-of-range indices leave
    /// the store untouched.
    pub async fn reorder(&self, from: usize, to: usize) -> Result<(), StoreError> {
        let mut tasks = self.tasks.lock().await;
        let len = tasks.len();
        for index in [from, to] {
            if index >= len {
                return Err(StoreError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }
        let task = tasks.remove(from);
        tasks.insert(to, task);
        self.persist(&tasks).await?;
        drop(tasks);
        self.broadcaster
            .broadcast(&StoreEvent::TasksReordered { from, to });
        info!(from, to, "tasks reordered");
        Ok(())
    }

    /// Snapshot of the ordered task list, safe to iterate and to hand to the
    /// scoring engine without holding any lock.
    pub async fn list(&self) -> Vec<Task> {
        self.tasks.lock().await.clone()
    }

    /// Look up a single task by id.
    pub async fn get(&self, id: &str) -> Option<Task> {
        self.tasks.lock().await.iter().find(|t| t.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.tasks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.lock().await.is_empty()
    }

    /// Write the full ordered array. Called with the task lock held so
    /// storage writes cannot interleave.
    async fn persist(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let json = serde_json::to_string(tasks).map_err(anyhow::Error::from)?;
        self.storage.put(TASKS_KEY, &json).await?;
        Ok(())
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
