//! Jump affordances for rows whose bar lies outside the visible window.

use chrono::NaiveDateTime;

use super::window::{VisibleRange, BUFFER_TICKS};
use crate::model::{AxisPosition, FlatTask, TimeAxis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskVisibility {
    Before,
    Visible,
    After,
}

/// Tick index of `date`, with off-axis dates mapped just outside the axis.
fn signed_index(axis: &TimeAxis, date: NaiveDateTime) -> isize {
    match axis.locate(date) {
        AxisPosition::Before => -1,
        AxisPosition::At(index) => index as isize,
        AxisPosition::After => axis.len() as isize,
    }
}

pub fn task_visibility(task: &FlatTask, axis: &TimeAxis, range: VisibleRange) -> TaskVisibility {
    let start = signed_index(axis, task.start_date);
    let end = signed_index(axis, task.end_date);
    if end < range.start as isize {
        TaskVisibility::Before
    } else if start > range.end as isize {
        TaskVisibility::After
    } else {
        TaskVisibility::Visible
    }
}

/// X of the affordance, kept inside the window past the scroll buffer.
pub fn affordance_x(direction: TaskVisibility, axis: &TimeAxis, range: VisibleRange) -> Option<f32> {
    match direction {
        TaskVisibility::Before => Some(axis.tick_x(range.start + BUFFER_TICKS + 1)),
        TaskVisibility::After => Some(axis.tick_x(range.end.saturating_sub(BUFFER_TICKS + 2))),
        TaskVisibility::Visible => None,
    }
}

/// Date the viewport recenters on: the task start, pulled onto the axis
/// when the task began in an earlier year.
pub fn jump_target(task: &FlatTask, axis: &TimeAxis) -> Option<NaiveDateTime> {
    let first = *axis.ticks.first()?;
    Some(task.start_date.max(first))
}
