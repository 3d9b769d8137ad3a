//! gantt-timeline: an embeddable Gantt chart widget for egui.
//!
//! The crate is split into a headless core and a thin egui surface:
//! - [`model`] holds task data, the time axis and the pure row pipeline
//!   (flatten, filter, group).
//! - [`chart`] holds the component state: virtualization window, drag/resize
//!   controller, off-screen navigator and the per-frame layout.
//! - [`ui`] draws a [`chart::FrameLayout`] with egui and feeds pointer input
//!   back into the controllers.

pub mod chart;
pub mod error;
pub mod io;
pub mod model;
pub mod telemetry;
pub mod ui;

pub use chart::{GanttEvent, GanttState};
pub use error::{GanttError, GanttResult};
pub use model::{GanttConfig, Task, TaskId, ViewMode};
