use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable task identifier, unique across the whole tree.
///
/// Hosts may use numbers or strings in their JSON; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "IdRepr", into = "String")]
pub struct TaskId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Number(i64),
    Text(String),
}

impl From<IdRepr> for TaskId {
    fn from(repr: IdRepr) -> Self {
        match repr {
            IdRepr::Number(n) => Self(n.to_string()),
            IdRepr::Text(s) => Self(s),
        }
    }
}

impl TaskId {
    /// A fresh random identifier for hosts without natural ids.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for TaskId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<Uuid> for TaskId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A task in the host's tree. Children are owned; the tree has no sharing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(with = "date_serde")]
    pub start_date: NaiveDateTime,
    #[serde(with = "date_serde")]
    pub end_date: NaiveDateTime,
    #[serde(default, with = "color_serde", skip_serializing_if = "Option::is_none")]
    pub color: Option<Color32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Task>,
    /// Host-defined fields (e.g. `projectId`), used by search, grouping and
    /// columns.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Task {
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start_date,
            end_date,
            color: None,
            children: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_children(mut self, children: Vec<Task>) -> Self {
        self.children = children;
        self
    }

    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(field.into(), value.into());
        self
    }

    /// Stringified value of a built-in or host-defined field.
    pub fn field_value(&self, field: &str) -> Option<String> {
        lookup_field(
            field,
            &self.id,
            &self.title,
            self.start_date,
            self.end_date,
            self.color,
            &self.extra,
        )
    }
}

/// A task placed in the flattened pre-order sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTask {
    pub id: TaskId,
    pub title: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub color: Option<Color32>,
    pub extra: BTreeMap<String, serde_json::Value>,
    pub child_count: usize,
    /// Lookup-only back reference.
    pub parent_id: Option<TaskId>,
    pub level: usize,
    pub row_index: usize,
}

impl FlatTask {
    pub fn from_task(task: &Task, parent_id: Option<TaskId>, level: usize, row_index: usize) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            start_date: task.start_date,
            end_date: task.end_date,
            color: task.color,
            extra: task.extra.clone(),
            child_count: task.children.len(),
            parent_id,
            level,
            row_index,
        }
    }

    pub fn has_children(&self) -> bool {
        self.child_count > 0
    }

    pub fn field_value(&self, field: &str) -> Option<String> {
        lookup_field(
            field,
            &self.id,
            &self.title,
            self.start_date,
            self.end_date,
            self.color,
            &self.extra,
        )
    }

    pub fn with_dates(&self, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Self {
            start_date,
            end_date,
            ..self.clone()
        }
    }
}

fn lookup_field(
    field: &str,
    id: &TaskId,
    title: &str,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
    color: Option<Color32>,
    extra: &BTreeMap<String, serde_json::Value>,
) -> Option<String> {
    match field {
        "id" => Some(id.to_string()),
        "title" => Some(title.to_string()),
        "startDate" => Some(date_serde::format(start_date)),
        "endDate" => Some(date_serde::format(end_date)),
        "color" => color.map(color_serde::to_hex),
        _ => extra.get(field).map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
    }
}

/// Parses the date forms accepted in task data: `YYYY-MM-DD`,
/// `YYYY-MM-DDTHH:MM[:SS[.fff]]` and RFC 3339 (converted to local time).
pub fn parse_date_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Replaces the dates of the task with `id`, wherever it sits in the tree.
/// Returns `false` when no such task exists.
pub fn set_task_dates(
    tasks: &mut [Task],
    id: &TaskId,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
) -> bool {
    let mut stack: Vec<&mut Task> = tasks.iter_mut().collect();
    while let Some(task) = stack.pop() {
        if task.id == *id {
            task.start_date = start_date;
            task.end_date = end_date;
            return true;
        }
        stack.extend(task.children.iter_mut());
    }
    false
}

/// Copy of `tasks` with one task's dates replaced.
pub fn update_task_dates(
    tasks: &[Task],
    id: &TaskId,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
) -> Vec<Task> {
    let mut updated = tasks.to_vec();
    set_task_dates(&mut updated, id, start_date, end_date);
    updated
}

pub fn find_task<'a>(tasks: &'a [Task], id: &TaskId) -> Option<&'a Task> {
    let mut stack: Vec<&Task> = tasks.iter().collect();
    while let Some(task) = stack.pop() {
        if task.id == *id {
            return Some(task);
        }
        stack.extend(task.children.iter());
    }
    None
}

/// Every id in the tree, in pre-order.
pub fn collect_ids(tasks: &[Task]) -> Vec<TaskId> {
    let mut ids = Vec::new();
    let mut stack: Vec<&Task> = tasks.iter().rev().collect();
    while let Some(task) = stack.pop() {
        ids.push(task.id.clone());
        stack.extend(task.children.iter().rev());
    }
    ids
}

/// Serde helper for task instants.
pub mod date_serde {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use crate::error::GanttError;

    pub fn format(date: NaiveDateTime) -> String {
        date.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_date_time(&s).ok_or_else(|| serde::de::Error::custom(GanttError::InvalidDate(s)))
    }
}

/// Serde helper for optional `Color32` stored as `#RRGGBB` / `#RRGGBBAA`.
pub mod color_serde {
    use egui::Color32;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use crate::error::GanttError;

    pub fn to_hex(color: Color32) -> String {
        let [r, g, b, a] = color.to_array();
        if a == 255 {
            format!("#{:02X}{:02X}{:02X}", r, g, b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
        }
    }

    pub fn parse_hex(s: &str) -> Result<Color32, GanttError> {
        let digits = s.trim().trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            digits
                .get(range)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| GanttError::InvalidColor(s.to_string()))
        };
        match digits.len() {
            6 => Ok(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Color32::from_rgba_unmultiplied(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(GanttError::InvalidColor(s.to_string())),
        }
    }

    pub fn serialize<S>(color: &Option<Color32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match color {
            Some(c) => serializer.serialize_str(&to_hex(*c)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Color32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| parse_hex(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .expect("valid date")
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn deserializes_host_json() {
        let json = r##"[
            {
                "id": 1,
                "title": "Project Planning",
                "startDate": "2025-04-01",
                "endDate": "2025-04-05T18:30",
                "color": "#4F46E5",
                "projectId": "A",
                "children": [
                    { "id": "1-1", "title": "Sub Task 1", "startDate": "2025-04-01T09:00:00", "endDate": "2025-04-02" }
                ]
            }
        ]"##;
        let tasks: Vec<Task> = serde_json::from_str(json).expect("valid tasks");
        let root = &tasks[0];
        assert_eq!(root.id, TaskId::from("1"));
        assert_eq!(root.start_date, day(2025, 4, 1));
        assert_eq!(root.end_date, day(2025, 4, 5) + chrono::Duration::minutes(18 * 60 + 30));
        assert_eq!(root.color, Some(Color32::from_rgb(0x4F, 0x46, 0xE5)));
        assert_eq!(root.field_value("projectId").as_deref(), Some("A"));
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].color, None);
    }

    #[test]
    fn rejects_malformed_dates_and_colors() {
        let bad_date = r#"{"id": 1, "title": "x", "startDate": "April 1st", "endDate": "2025-04-02"}"#;
        assert!(serde_json::from_str::<Task>(bad_date).is_err());

        let bad_color =
            r##"{"id": 1, "title": "x", "startDate": "2025-04-01", "endDate": "2025-04-02", "color": "#12"}"##;
        assert!(serde_json::from_str::<Task>(bad_color).is_err());
    }

    #[test]
    fn field_values_cover_builtins_and_extras() {
        let task = Task::new("7", "Design", day(2025, 4, 1), day(2025, 4, 3))
            .with_field("estimate", 12)
            .with_color(Color32::from_rgb(255, 0, 16));
        assert_eq!(task.field_value("title").as_deref(), Some("Design"));
        assert_eq!(task.field_value("id").as_deref(), Some("7"));
        assert_eq!(task.field_value("startDate").as_deref(), Some("2025-04-01T00:00:00"));
        assert_eq!(task.field_value("estimate").as_deref(), Some("12"));
        assert_eq!(task.field_value("color").as_deref(), Some("#FF0010"));
        assert_eq!(task.field_value("missing"), None);
    }

    #[test]
    fn set_task_dates_reaches_nested_tasks() {
        let mut tasks = vec![Task::new("1", "root", day(2025, 1, 1), day(2025, 1, 9)).with_children(vec![
            Task::new("2", "child", day(2025, 1, 2), day(2025, 1, 3))
                .with_children(vec![Task::new("3", "leaf", day(2025, 1, 2), day(2025, 1, 3))]),
        ])];
        assert!(set_task_dates(&mut tasks, &TaskId::from("3"), day(2025, 2, 1), day(2025, 2, 2)));
        let leaf = find_task(&tasks, &TaskId::from("3")).expect("leaf");
        assert_eq!(leaf.start_date, day(2025, 2, 1));
        assert!(!set_task_dates(&mut tasks, &TaskId::from("9"), day(2025, 2, 1), day(2025, 2, 2)));

        let copy = update_task_dates(&tasks, &TaskId::from("2"), day(2025, 3, 1), day(2025, 3, 4));
        assert_eq!(find_task(&copy, &TaskId::from("2")).map(|t| t.end_date), Some(day(2025, 3, 4)));
        assert_eq!(find_task(&tasks, &TaskId::from("2")).map(|t| t.end_date), Some(day(2025, 1, 3)));
    }

    #[test]
    fn collect_ids_is_pre_order() {
        let tasks = vec![
            Task::new("a", "a", day(2025, 1, 1), day(2025, 1, 2)).with_children(vec![
                Task::new("a1", "a1", day(2025, 1, 1), day(2025, 1, 2)),
                Task::new("a2", "a2", day(2025, 1, 1), day(2025, 1, 2)),
            ]),
            Task::new("b", "b", day(2025, 1, 1), day(2025, 1, 2)),
        ];
        let ids: Vec<String> = collect_ids(&tasks).into_iter().map(String::from).collect();
        assert_eq!(ids, ["a", "a1", "a2", "b"]);
    }

    #[test]
    fn numeric_and_generated_ids() {
        assert_eq!(TaskId::from(42u64).as_str(), "42");
        assert_ne!(TaskId::generate(), TaskId::generate());
    }
}
