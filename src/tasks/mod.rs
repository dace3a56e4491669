pub mod model;
pub mod store;

pub use model::{Task, TaskDraft, ValidationError};
pub use store::{StoreError, TaskStore};
