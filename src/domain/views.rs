use super::enums::{Importance, Quadrant, Relevance};
use super::task::Task;
use chrono::{Duration, NaiveDate};

/// Tasks due within this many days count as urgent
pub const URGENCY_WINDOW_DAYS: i64 = 14;

pub fn has_due_date(task: &Task, today: NaiveDate) -> bool {
    task.due(today).is_some()
}

pub fn is_urgent(task: &Task, today: NaiveDate) -> bool {
    match task.due(today) {
        Some(due) => due - today < Duration::days(URGENCY_WINDOW_DAYS),
        None => false,
    }
}

/// Snoozed strictly into the future
pub fn has_snoozed_date(task: &Task, today: NaiveDate) -> bool {
    task.snooze(today).map_or(false, |snooze| snooze > today)
}

pub fn is_completed(task: &Task) -> bool {
    task.completed().is_some()
}

pub fn is_important(task: &Task) -> bool {
    task.importance() == Importance::Important
}

pub fn quadrant_of(task: &Task, today: NaiveDate) -> Quadrant {
    Quadrant::from_flags(is_important(task), is_urgent(task, today))
}

/// Bucket a single task, checked in priority order
pub fn relevance_of(task: &Task, today: NaiveDate) -> Relevance {
    if is_completed(task) {
        Relevance::Completed
    } else if has_snoozed_date(task, today) {
        Relevance::Snoozed
    } else if is_urgent(task, today) {
        Relevance::Due
    } else {
        Relevance::Normal
    }
}

/// Tasks partitioned by relevance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelevanceGroups<'a> {
    pub due: Vec<&'a Task>,
    pub normal: Vec<&'a Task>,
    pub snoozed: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

impl<'a> RelevanceGroups<'a> {
    pub fn bucket(&self, relevance: Relevance) -> &[&'a Task] {
        match relevance {
            Relevance::Due => &self.due,
            Relevance::Normal => &self.normal,
            Relevance::Snoozed => &self.snoozed,
            Relevance::Completed => &self.completed,
        }
    }

    pub fn len(&self) -> usize {
        self.due.len() + self.normal.len() + self.snoozed.len() + self.completed.len()
    }
}

/// Partition tasks into disjoint relevance buckets.
///
/// Due tasks are ordered by due date and snoozed tasks by wake-up date;
/// the other buckets keep collection order.
pub fn sort_tasks_by_relevance<'a, I>(tasks: I, today: NaiveDate) -> RelevanceGroups<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut groups = RelevanceGroups::default();
    for task in tasks {
        match relevance_of(task, today) {
            Relevance::Completed => groups.completed.push(task),
            Relevance::Snoozed => groups.snoozed.push(task),
            Relevance::Due => groups.due.push(task),
            Relevance::Normal => groups.normal.push(task),
        }
    }
    groups.due.sort_by_key(|task| task.due(today));
    groups.snoozed.sort_by_key(|task| task.snooze(today));
    groups
}

/// A flattened row for rendering one importance column
#[derive(Debug, Clone, PartialEq)]
pub enum Row<'a> {
    /// Bucket header with its task count
    Header(Relevance, usize),
    Task(&'a Task),
}

/// Flatten a column's relevance groups into display rows, skipping empty
/// buckets and, unless requested, the completed bucket
pub fn flatten_groups<'a>(groups: &RelevanceGroups<'a>, show_completed: bool) -> Vec<Row<'a>> {
    let mut rows = Vec::new();
    for relevance in Relevance::all() {
        if *relevance == Relevance::Completed && !show_completed {
            continue;
        }
        let bucket = groups.bucket(*relevance);
        if bucket.is_empty() {
            continue;
        }
        rows.push(Row::Header(*relevance, bucket.len()));
        rows.extend(bucket.iter().map(|task| Row::Task(*task)));
    }
    rows
}

/// Short "in N days"/"N days ago" label relative to today
pub fn relative_label(date: NaiveDate, today: NaiveDate) -> String {
    let days = (date - today).num_days();
    match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        d if d > 1 => format!("in {}d", d),
        d => format!("{}d ago", -d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::SubTask;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn days(n: i64) -> NaiveDate {
        today() + Duration::days(n)
    }

    #[test]
    fn test_is_urgent() {
        assert!(!is_urgent(&Task::new("none"), today()));
        assert!(is_urgent(&Task::new("overdue").with_due(Some(days(-30))), today()));
        assert!(is_urgent(&Task::new("soon").with_due(Some(days(13))), today()));
        assert!(!is_urgent(&Task::new("edge").with_due(Some(days(14))), today()));
        let distant = NaiveDate::from_ymd_opt(9999, 1, 1).unwrap();
        assert!(!is_urgent(&Task::new("distant").with_due(Some(distant)), today()));
    }

    #[test]
    fn test_has_due_date() {
        assert!(has_due_date(&Task::new("far").with_due(Some(days(400))), today()));
        assert!(!has_due_date(&Task::new("none"), today()));
    }

    #[test]
    fn test_has_snoozed_date_requires_future() {
        assert!(has_snoozed_date(&Task::new("later").with_snooze(Some(days(1))), today()));
        assert!(!has_snoozed_date(&Task::new("today").with_snooze(Some(today())), today()));
        assert!(!has_snoozed_date(&Task::new("past").with_snooze(Some(days(-2))), today()));
    }

    #[test]
    fn test_due_example_with_sub_tasks() {
        let d1 = days(20);
        let d2 = days(3);
        let task = Task::new("example").with_sub_tasks(vec![
            SubTask::new("open").with_due(Some(d1)),
            SubTask::new("snoozed")
                .with_due(Some(d2))
                .with_snooze(Some(days(5))),
        ]);
        assert_eq!(task.due(today()), Some(d1));
        assert!(!is_urgent(&task, today()));
    }

    #[test]
    fn test_sort_tasks_by_relevance() {
        let a = Task::new("A").with_completed(Some(days(-1)));
        let b = Task::new("B").with_snooze(Some(days(3)));
        let c = Task::new("C").with_due(Some(days(5)));
        let d = Task::new("D");
        let tasks = vec![a.clone(), b.clone(), c.clone(), d.clone()];

        let groups = sort_tasks_by_relevance(&tasks, today());
        assert_eq!(groups.due, vec![&c]);
        assert_eq!(groups.normal, vec![&d]);
        assert_eq!(groups.snoozed, vec![&b]);
        assert_eq!(groups.completed, vec![&a]);
        assert_eq!(groups.len(), tasks.len());
    }

    #[test]
    fn test_completed_wins_over_snooze_and_due() {
        let task = Task::new("all")
            .with_due(Some(days(1)))
            .with_snooze(Some(days(2)))
            .with_completed(Some(today()));
        assert_eq!(relevance_of(&task, today()), Relevance::Completed);

        let snoozed_and_due = Task::new("both")
            .with_due(Some(days(1)))
            .with_snooze(Some(days(2)));
        assert_eq!(relevance_of(&snoozed_and_due, today()), Relevance::Snoozed);
    }

    #[test]
    fn test_due_bucket_sorted_by_date() {
        let later = Task::new("later").with_due(Some(days(10)));
        let sooner = Task::new("sooner").with_due(Some(days(2)));
        let tasks = vec![later.clone(), sooner.clone()];
        let groups = sort_tasks_by_relevance(&tasks, today());
        assert_eq!(groups.due, vec![&sooner, &later]);
    }

    #[test]
    fn test_quadrant_of() {
        let urgent = Task::new("u").with_due(Some(days(1)));
        assert_eq!(
            quadrant_of(&urgent.clone().with_importance(Importance::Important), today()),
            Quadrant::Do
        );
        assert_eq!(quadrant_of(&urgent, today()), Quadrant::Delegate);
        assert_eq!(
            quadrant_of(&Task::new("i").with_importance(Importance::Important), today()),
            Quadrant::Schedule
        );
        assert_eq!(quadrant_of(&Task::new("n"), today()), Quadrant::Eliminate);
    }

    #[test]
    fn test_flatten_groups_hides_completed() {
        let done = Task::new("done").with_completed(Some(today()));
        let open = Task::new("open");
        let tasks = vec![done.clone(), open.clone()];
        let groups = sort_tasks_by_relevance(&tasks, today());

        let rows = flatten_groups(&groups, false);
        assert_eq!(rows, vec![Row::Header(Relevance::Normal, 1), Row::Task(&open)]);

        let rows = flatten_groups(&groups, true);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2], Row::Header(Relevance::Completed, 1));
    }

    #[test]
    fn test_relative_label() {
        assert_eq!(relative_label(today(), today()), "today");
        assert_eq!(relative_label(days(1), today()), "tomorrow");
        assert_eq!(relative_label(days(-1), today()), "yesterday");
        assert_eq!(relative_label(days(9), today()), "in 9d");
        assert_eq!(relative_label(days(-4), today()), "4d ago");
    }
}
