pub mod column;
pub mod config;
pub mod hierarchy;
pub mod locale;
pub mod rows;
pub mod task;
pub mod timeline;
pub mod toggle;

pub use column::{CellAction, CellAlign, CellContext, ColumnDef, ColumnKind, GroupingColumn};
pub use config::GanttConfig;
pub use hierarchy::{apply_filters, flatten};
pub use locale::Locale;
pub use rows::{build_rows, Row};
pub use task::{FlatTask, Task, TaskId};
pub use timeline::{AxisPosition, TimeAxis, TimeScale, ViewMode};
pub use toggle::ToggleSet;
