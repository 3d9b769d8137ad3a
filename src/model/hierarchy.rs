//! Flattening the task tree and deciding which flattened tasks are visible.

use std::collections::HashMap;

use chrono::Datelike;

use super::column::ColumnDef;
use super::task::{FlatTask, Task, TaskId};
use super::toggle::ToggleSet;

/// Pre-order walk of the tree. Children follow their parent immediately;
/// `row_index` is the position in the output.
pub fn flatten(tasks: &[Task]) -> Vec<FlatTask> {
    let mut flat = Vec::new();
    let mut stack: Vec<(&Task, Option<&TaskId>, usize)> =
        tasks.iter().rev().map(|task| (task, None, 0)).collect();

    while let Some((task, parent, level)) = stack.pop() {
        let row_index = flat.len();
        flat.push(FlatTask::from_task(task, parent.cloned(), level, row_index));
        stack.extend(
            task.children
                .iter()
                .rev()
                .map(|child| (child, Some(&task.id), level + 1)),
        );
    }
    flat
}

/// Resolves the searchable text of `task` for `field`. A column's value
/// getter wins over the raw field.
fn search_value(task: &FlatTask, field: &str, columns: &[ColumnDef]) -> Option<String> {
    match columns.iter().find(|c| c.field == field) {
        Some(column) => column.cell_value(task),
        None => task.field_value(field),
    }
}

/// Case-insensitive substring match on one field. Empty text keeps all.
pub fn filter_by_search(
    flat: Vec<FlatTask>,
    search_text: &str,
    search_field: &str,
    columns: &[ColumnDef],
) -> Vec<FlatTask> {
    let needle = search_text.trim().to_lowercase();
    if needle.is_empty() {
        return flat;
    }
    flat.into_iter()
        .filter(|task| {
            search_value(task, search_field, columns)
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        })
        .collect()
}

/// True when the task touches `year`, including tasks spanning it.
pub fn overlaps_year(task: &FlatTask, year: i32) -> bool {
    let start = task.start_date.year();
    let end = task.end_date.year();
    start == year || end == year || (start < year && year < end)
}

pub fn filter_by_year(flat: Vec<FlatTask>, year: i32) -> Vec<FlatTask> {
    flat.into_iter().filter(|task| overlaps_year(task, year)).collect()
}

/// Walks the parent chain; every ancestor must be expanded. A parent id with
/// no record counts as satisfied.
pub fn ancestors_expanded(
    task: &FlatTask,
    by_id: &HashMap<&TaskId, &FlatTask>,
    expanded: &ToggleSet<TaskId>,
) -> bool {
    let mut parent = task.parent_id.as_ref();
    // Bounded so malformed parent links cannot spin forever.
    let mut remaining = by_id.len() + 1;
    while let Some(parent_id) = parent {
        if !expanded.contains(parent_id) {
            return false;
        }
        remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            break;
        }
        parent = match by_id.get(parent_id) {
            Some(record) => record.parent_id.as_ref(),
            None => None,
        };
    }
    true
}

/// Search, year and expansion filters over the full flattened list.
pub fn apply_filters(
    flat: &[FlatTask],
    search_text: &str,
    search_field: &str,
    columns: &[ColumnDef],
    year: i32,
    expanded: &ToggleSet<TaskId>,
) -> Vec<FlatTask> {
    let by_id: HashMap<&TaskId, &FlatTask> = flat.iter().map(|task| (&task.id, task)).collect();
    let searched = filter_by_search(flat.to_vec(), search_text, search_field, columns);
    filter_by_year(searched, year)
        .into_iter()
        .filter(|task| ancestors_expanded(task, &by_id, expanded))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid date")
    }

    fn task(id: &str, title: &str) -> Task {
        Task::new(id, title, day(2025, 4, 1), day(2025, 4, 5))
    }

    fn sample_tree() -> Vec<Task> {
        vec![
            task("1", "Project Planning").with_children(vec![
                task("1-1", "Sub Task 1").with_children(vec![task("1-1-1", "Detail")]),
                task("1-2", "Sub Task 2"),
            ]),
            task("2", "Development"),
        ]
    }

    fn ids(tasks: &[FlatTask]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn flatten_is_pre_order_with_levels() {
        let flat = flatten(&sample_tree());
        assert_eq!(ids(&flat), ["1", "1-1", "1-1-1", "1-2", "2"]);
        let levels: Vec<usize> = flat.iter().map(|t| t.level).collect();
        assert_eq!(levels, [0, 1, 2, 1, 0]);
        let rows: Vec<usize> = flat.iter().map(|t| t.row_index).collect();
        assert_eq!(rows, [0, 1, 2, 3, 4]);
        assert_eq!(flat[2].parent_id, Some(TaskId::from("1-1")));
        assert_eq!(flat[0].child_count, 2);
    }

    #[test]
    fn search_is_case_insensitive_and_empty_is_noop() {
        let flat = flatten(&sample_tree());
        assert_eq!(filter_by_search(flat.clone(), "", "title", &[]).len(), 5);
        assert_eq!(ids(&filter_by_search(flat.clone(), "sub task 1", "title", &[])), ["1-1"]);
        assert!(filter_by_search(flat, "sub", "owner", &[]).is_empty());
    }

    #[test]
    fn search_uses_column_value_getter() {
        let flat = flatten(&sample_tree());
        let columns = [ColumnDef::new("title", "Title").value_getter(|t| format!("#{}", t.id))];
        assert_eq!(ids(&filter_by_search(flat, "#2", "title", &columns)), ["2"]);
    }

    #[test]
    fn year_filter_keeps_spanning_tasks() {
        let tasks = vec![
            Task::new("a", "a", day(2024, 11, 1), day(2024, 12, 1)),
            Task::new("b", "b", day(2024, 12, 1), day(2025, 1, 5)),
            Task::new("c", "c", day(2023, 6, 1), day(2026, 6, 1)),
            Task::new("d", "d", day(2026, 1, 1), day(2026, 2, 1)),
        ];
        let kept = filter_by_year(flatten(&tasks), 2025);
        assert_eq!(ids(&kept), ["b", "c"]);
    }

    #[test]
    fn collapsed_ancestor_hides_descendants_and_reexpanding_restores() {
        let flat = flatten(&sample_tree());
        let all: ToggleSet<TaskId> = ["1", "1-1"].into_iter().map(TaskId::from).collect();
        let visible = apply_filters(&flat, "", "title", &[], 2025, &all);
        assert_eq!(visible.len(), 5);

        let collapsed = all.toggled(&TaskId::from("1"));
        assert_eq!(ids(&apply_filters(&flat, "", "title", &[], 2025, &collapsed)), ["1", "2"]);

        let restored = collapsed.toggled(&TaskId::from("1"));
        assert_eq!(apply_filters(&flat, "", "title", &[], 2025, &restored), visible);
    }

    #[test]
    fn search_does_not_auto_expand() {
        let flat = flatten(&sample_tree());
        let nothing_expanded = ToggleSet::new();
        assert!(apply_filters(&flat, "Sub Task 1", "title", &[], 2025, &nothing_expanded).is_empty());

        let expanded: ToggleSet<TaskId> = [TaskId::from("1")].into_iter().collect();
        let found = apply_filters(&flat, "Sub Task 1", "title", &[], 2025, &expanded);
        assert_eq!(ids(&found), ["1-1"]);
    }

    #[test]
    fn orphaned_parent_fails_open() {
        let mut flat = flatten(&[task("x", "orphan")]);
        flat[0].parent_id = Some(TaskId::from("gone"));
        let expanded: ToggleSet<TaskId> = [TaskId::from("gone")].into_iter().collect();
        assert_eq!(apply_filters(&flat, "", "title", &[], 2025, &expanded).len(), 1);
    }

    #[test]
    fn cyclic_parent_links_terminate() {
        let mut flat = flatten(&[task("a", "a"), task("b", "b")]);
        flat[0].parent_id = Some(TaskId::from("b"));
        flat[1].parent_id = Some(TaskId::from("a"));
        let expanded: ToggleSet<TaskId> = ["a", "b"].into_iter().map(TaskId::from).collect();
        assert_eq!(apply_filters(&flat, "", "title", &[], 2025, &expanded).len(), 2);
    }
}
