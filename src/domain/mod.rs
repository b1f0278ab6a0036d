pub mod enums;
pub mod task;
pub mod views;

pub use enums::{Importance, Quadrant, Relevance, UiMode};
pub use task::{today, SubTask, Task};
pub use views::{
    flatten_groups, has_due_date, has_snoozed_date, is_completed, quadrant_of, relative_label,
    relevance_of, sort_tasks_by_relevance, RelevanceGroups, Row,
};
