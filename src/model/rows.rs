use super::column::GroupingColumn;
use super::task::{FlatTask, TaskId};
use super::toggle::ToggleSet;

/// One line of the table and the chart.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Task {
        id: TaskId,
        height: f32,
        data: FlatTask,
        group_id: Option<String>,
    },
    Group {
        id: String,
        height: f32,
        group_value: String,
    },
}

impl Row {
    pub fn height(&self) -> f32 {
        match self {
            Row::Task { height, .. } | Row::Group { height, .. } => *height,
        }
    }

    pub fn task(&self) -> Option<&FlatTask> {
        match self {
            Row::Task { data, .. } => Some(data),
            Row::Group { .. } => None,
        }
    }
}

pub fn group_id_for(group_value: &str) -> String {
    format!("group-{group_value}")
}

/// Builds the row sequence. With grouping, tasks are stably sorted by the
/// group value and a group row opens each run of equal values; tasks of
/// collapsed groups are dropped but their group rows stay.
pub fn build_rows(
    visible: &[FlatTask],
    grouping: Option<&GroupingColumn>,
    collapsed_groups: &ToggleSet<String>,
    row_height: f32,
) -> Vec<Row> {
    let Some(grouping) = grouping else {
        return visible
            .iter()
            .map(|task| Row::Task {
                id: task.id.clone(),
                height: row_height,
                data: task.clone(),
                group_id: None,
            })
            .collect();
    };

    let mut keyed: Vec<(String, &FlatTask)> = visible
        .iter()
        .map(|task| (task.field_value(&grouping.field).unwrap_or_default(), task))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let group_height = grouping.height.unwrap_or(row_height);
    let mut rows = Vec::with_capacity(keyed.len());
    let mut current: Option<&str> = None;
    for (value, task) in &keyed {
        let group_id = group_id_for(value);
        if current != Some(value.as_str()) {
            rows.push(Row::Group {
                id: group_id.clone(),
                height: group_height,
                group_value: value.clone(),
            });
            current = Some(value.as_str());
        }
        if collapsed_groups.contains(&group_id) {
            continue;
        }
        rows.push(Row::Task {
            id: task.id.clone(),
            height: row_height,
            data: (*task).clone(),
            group_id: Some(group_id),
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::hierarchy::flatten;
    use crate::model::task::Task;
    use chrono::NaiveDate;

    fn project_tasks() -> Vec<FlatTask> {
        let start = NaiveDate::from_ymd_opt(2025, 4, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date");
        let tasks: Vec<Task> = [("1", "A"), ("2", "B"), ("3", "A")]
            .into_iter()
            .map(|(id, project)| Task::new(id, format!("Task {id}"), start, start).with_field("projectId", project))
            .collect();
        flatten(&tasks)
    }

    fn labels(rows: &[Row]) -> Vec<String> {
        rows.iter()
            .map(|row| match row {
                Row::Group { group_value, .. } => format!("group {group_value}"),
                Row::Task { id, .. } => format!("task {id}"),
            })
            .collect()
    }

    #[test]
    fn ungrouped_rows_follow_task_order() {
        let rows = build_rows(&project_tasks(), None, &ToggleSet::new(), 50.0);
        assert_eq!(labels(&rows), ["task 1", "task 2", "task 3"]);
        assert!(rows.iter().all(|r| r.height() == 50.0));
    }

    #[test]
    fn grouping_sorts_and_inserts_headers() {
        let grouping = GroupingColumn::new("projectId").height(32.0);
        let rows = build_rows(&project_tasks(), Some(&grouping), &ToggleSet::new(), 50.0);
        assert_eq!(labels(&rows), ["group A", "task 1", "task 3", "group B", "task 2"]);
        assert_eq!(rows[0].height(), 32.0);
        assert!(matches!(&rows[1], Row::Task { group_id: Some(g), .. } if g == "group-A"));
    }

    #[test]
    fn collapsed_group_keeps_its_header() {
        let grouping = GroupingColumn::new("projectId");
        let collapsed = ToggleSet::new().toggled(&group_id_for("A"));
        let rows = build_rows(&project_tasks(), Some(&grouping), &collapsed, 50.0);
        assert_eq!(labels(&rows), ["group A", "group B", "task 2"]);
    }
}
