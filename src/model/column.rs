//! Column and grouping descriptors supplied by the host.

use std::fmt;
use std::sync::Arc;

use egui::Align;

use super::task::FlatTask;

/// Custom accessor used for cell text and search.
pub type ValueGetter = Arc<dyn Fn(&FlatTask) -> String + Send + Sync>;
/// Custom cell body. Replaces the default text label.
pub type CellRenderer = Arc<dyn Fn(&mut egui::Ui, &CellContext<'_>) -> CellAction + Send + Sync>;
pub type HeaderRenderer = Arc<dyn Fn(&mut egui::Ui, &ColumnDef) + Send + Sync>;
pub type GroupHeaderGetter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// What a custom cell asked the table to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellAction {
    #[default]
    None,
    ToggleTask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl CellAlign {
    pub fn to_egui(self) -> Align {
        match self {
            CellAlign::Left => Align::Min,
            CellAlign::Center => Align::Center,
            CellAlign::Right => Align::Max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    #[default]
    String,
    Number,
    Date,
    Boolean,
}

/// Everything a custom cell renderer can see.
pub struct CellContext<'a> {
    pub task: &'a FlatTask,
    pub column: &'a ColumnDef,
    pub value: String,
    pub expanded: bool,
}

#[derive(Clone)]
pub struct ColumnDef {
    pub field: String,
    pub header_name: String,
    pub width: Option<f32>,
    pub min_width: Option<f32>,
    /// Share of the leftover grid width; wins over `width` when set.
    pub flex: Option<f32>,
    pub align: CellAlign,
    pub header_align: Option<CellAlign>,
    pub kind: ColumnKind,
    pub editable: bool,
    pub value_getter: Option<ValueGetter>,
    pub render_cell: Option<CellRenderer>,
    pub render_header: Option<HeaderRenderer>,
}

impl ColumnDef {
    pub const DEFAULT_WIDTH: f32 = 100.0;

    pub fn new(field: impl Into<String>, header_name: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header_name: header_name.into(),
            width: None,
            min_width: None,
            flex: None,
            align: CellAlign::Left,
            header_align: None,
            kind: ColumnKind::String,
            editable: false,
            value_getter: None,
            render_cell: None,
            render_header: None,
        }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn min_width(mut self, min_width: f32) -> Self {
        self.min_width = Some(min_width);
        self
    }

    pub fn flex(mut self, flex: f32) -> Self {
        self.flex = Some(flex);
        self
    }

    pub fn align(mut self, align: CellAlign) -> Self {
        self.align = align;
        self
    }

    pub fn header_align(mut self, align: CellAlign) -> Self {
        self.header_align = Some(align);
        self
    }

    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn value_getter(mut self, getter: impl Fn(&FlatTask) -> String + Send + Sync + 'static) -> Self {
        self.value_getter = Some(Arc::new(getter));
        self
    }

    pub fn render_cell(
        mut self,
        renderer: impl Fn(&mut egui::Ui, &CellContext<'_>) -> CellAction + Send + Sync + 'static,
    ) -> Self {
        self.render_cell = Some(Arc::new(renderer));
        self
    }

    pub fn render_header(mut self, renderer: impl Fn(&mut egui::Ui, &ColumnDef) + Send + Sync + 'static) -> Self {
        self.render_header = Some(Arc::new(renderer));
        self
    }

    /// Cell text: the value getter when present, else the raw field.
    pub fn cell_value(&self, task: &FlatTask) -> Option<String> {
        match &self.value_getter {
            Some(getter) => Some(getter(task)),
            None => task.field_value(&self.field),
        }
    }

    pub fn header_alignment(&self) -> CellAlign {
        self.header_align.unwrap_or(self.align)
    }

    /// Width in points given the leftover space shared by flex columns.
    pub fn resolved_width(&self, flex_unit: f32) -> f32 {
        let width = match self.flex {
            Some(flex) => flex * flex_unit,
            None => self.width.unwrap_or(Self::DEFAULT_WIDTH),
        };
        width.max(self.min_width.unwrap_or(0.0))
    }
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("field", &self.field)
            .field("header_name", &self.header_name)
            .field("width", &self.width)
            .field("flex", &self.flex)
            .field("align", &self.align)
            .field("kind", &self.kind)
            .field("editable", &self.editable)
            .field("value_getter", &self.value_getter.is_some())
            .field("render_cell", &self.render_cell.is_some())
            .finish_non_exhaustive()
    }
}

/// Splits `available` among columns: fixed widths first, then flex shares.
pub fn column_widths(columns: &[ColumnDef], available: f32) -> Vec<f32> {
    let fixed: f32 = columns
        .iter()
        .filter(|c| c.flex.is_none())
        .map(|c| c.resolved_width(0.0))
        .sum();
    let flex_total: f32 = columns.iter().filter_map(|c| c.flex).sum();
    let flex_unit = if flex_total > 0.0 {
        ((available - fixed) / flex_total).max(0.0)
    } else {
        0.0
    };
    columns.iter().map(|c| c.resolved_width(flex_unit)).collect()
}

/// Describes how visible tasks are grouped into header rows.
#[derive(Clone)]
pub struct GroupingColumn {
    pub field: String,
    pub header_getter: Option<GroupHeaderGetter>,
    /// Row height override for group rows.
    pub height: Option<f32>,
}

impl GroupingColumn {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header_getter: None,
            height: None,
        }
    }

    pub fn header_getter(mut self, getter: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.header_getter = Some(Arc::new(getter));
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn header_text(&self, group_value: &str) -> String {
        match &self.header_getter {
            Some(getter) => getter(group_value),
            None => group_value.to_string(),
        }
    }
}

impl fmt::Debug for GroupingColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupingColumn")
            .field("field", &self.field)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
