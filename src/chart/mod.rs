//! Component-local state of one Gantt chart: caches, the scroll window, drag
//! sessions and the per-frame layout.

pub mod drag;
pub mod layout;
pub mod memo;
pub mod navigator;
pub mod state;
pub mod window;

pub use drag::{CommittedUpdate, DragController, DragState, ProposedUpdate, ResizeEdge};
pub use layout::{FrameLayout, NavigatorButton, RowSlot, TaskBarLayout, TickCell};
pub use navigator::TaskVisibility;
pub use state::{GanttState, StateMemoStats};
pub use window::{ScrollRequest, VisibleRange, WindowController, BUFFER_TICKS};

use crate::model::FlatTask;

/// Notifications for the host, drained once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum GanttEvent {
    TaskClick(FlatTask),
    TaskDoubleClick(FlatTask),
    TaskRowClick(FlatTask),
    TaskRowDoubleClick(FlatTask),
    GroupClick { group_id: String, group_value: String },
    GroupDoubleClick { group_id: String, group_value: String },
    /// Live preview during a drag; advisory only.
    TaskUpdate(ProposedUpdate),
    /// Committed edit. The host applies `new` to its own tree.
    DataUpdate { new: FlatTask, old: FlatTask },
}
