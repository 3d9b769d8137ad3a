//! Per-frame geometry handed to the painter. Everything here is plain
//! numbers; the presentation layer draws them without adjusting.

use chrono::NaiveDateTime;
use egui::Color32;

use super::navigator::{affordance_x, jump_target, task_visibility, TaskVisibility};
use super::window::VisibleRange;
use crate::model::{AxisPosition, FlatTask, Row, TaskId, TimeAxis, ToggleSet};

#[derive(Debug, Clone, PartialEq)]
pub struct TickCell {
    pub index: usize,
    pub date: NaiveDateTime,
    pub x: f32,
    pub label: String,
    pub sub_label: String,
    pub is_today: bool,
}

/// A row with its vertical placement.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSlot {
    pub row: Row,
    pub y: f32,
    pub height: f32,
    /// Task rows: children shown. Group rows: members shown.
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskBarLayout {
    pub row: usize,
    pub task: FlatTask,
    pub x: f32,
    pub width: f32,
    pub y: f32,
    pub height: f32,
    pub color: Option<Color32>,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigatorButton {
    pub row: usize,
    pub task_id: TaskId,
    pub direction: TaskVisibility,
    pub x: f32,
    pub y: f32,
    pub target: NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameLayout {
    pub ticks: Vec<TickCell>,
    pub rows: Vec<RowSlot>,
    pub bars: Vec<TaskBarLayout>,
    pub navigators: Vec<NavigatorButton>,
    pub today_x: Option<f32>,
    pub tick_width: f32,
    pub total_width: f32,
    pub total_height: f32,
}

/// Horizontal extent of a bar. Ends off the axis are pinned to its edges;
/// a task entirely before or after the axis has no bar.
pub fn bar_geometry(axis: &TimeAxis, start: NaiveDateTime, end: NaiveDateTime) -> Option<(f32, f32)> {
    let w = f64::from(axis.tick_width);
    let start_x = match axis.locate(start) {
        AxisPosition::Before => 0.0,
        AxisPosition::At(index) => index as f64 * w + axis.ratio_within_tick(start) * w,
        AxisPosition::After => return None,
    };
    let end_x = match axis.locate(end) {
        AxisPosition::Before => return None,
        AxisPosition::At(index) => index as f64 * w + axis.ratio_within_tick(end) * w,
        AxisPosition::After => f64::from(axis.total_width()),
    };
    Some((start_x as f32, (end_x - start_x).max(0.0) as f32))
}

pub fn layout_frame(
    axis: &TimeAxis,
    range: Option<VisibleRange>,
    rows: &[Row],
    expanded: &ToggleSet<TaskId>,
    collapsed_groups: &ToggleSet<String>,
    bar_height: f32,
    today: NaiveDateTime,
) -> FrameLayout {
    let today_index = axis.index_of(today);
    let mut frame = FrameLayout {
        tick_width: axis.tick_width,
        total_width: axis.total_width(),
        ..FrameLayout::default()
    };

    let mut y = 0.0;
    for row in rows {
        let height = row.height();
        let is_expanded = match row {
            Row::Task { id, .. } => expanded.contains(id),
            Row::Group { id, .. } => !collapsed_groups.contains(id),
        };
        frame.rows.push(RowSlot {
            row: row.clone(),
            y,
            height,
            expanded: is_expanded,
        });
        y += height;
    }
    frame.total_height = y;

    let Some(range) = range else {
        return frame;
    };

    frame.ticks = (range.start..=range.end.min(axis.len().saturating_sub(1)))
        .filter_map(|index| {
            let date = *axis.ticks.get(index)?;
            let (label, sub_label) = axis.labels(date);
            Some(TickCell {
                index,
                date,
                x: axis.tick_x(index),
                label,
                sub_label,
                is_today: today_index == Some(index),
            })
        })
        .collect();

    frame.today_x = today_index
        .filter(|index| range.contains(*index))
        .map(|index| axis.tick_x(index) + axis.tick_width / 2.0);

    for (row_number, slot) in frame.rows.iter().enumerate() {
        let Row::Task { data: task, .. } = &slot.row else {
            continue;
        };
        let bar_y = slot.y + (slot.height - bar_height).max(0.0) / 2.0;
        match task_visibility(task, axis, range) {
            TaskVisibility::Visible => {
                if let Some((x, width)) = bar_geometry(axis, task.start_date, task.end_date) {
                    frame.bars.push(TaskBarLayout {
                        row: row_number,
                        task: task.clone(),
                        x,
                        width,
                        y: bar_y,
                        height: bar_height.min(slot.height),
                        color: task.color,
                        expanded: slot.expanded,
                    });
                }
            }
            direction => {
                let (Some(x), Some(target)) =
                    (affordance_x(direction, axis, range), jump_target(task, axis))
                else {
                    continue;
                };
                frame.navigators.push(NavigatorButton {
                    row: row_number,
                    task_id: task.id.clone(),
                    direction,
                    x,
                    y: slot.y + slot.height / 2.0,
                    target,
                });
            }
        }
    }
    frame
}
