use egui::{Align2, Pos2, Rect, Sense, Stroke, Ui, UiBuilder, Vec2};
use egui_phosphor::regular as icons;

use crate::chart::{FrameLayout, RowSlot};
use crate::model::column::column_widths;
use crate::model::{CellAction, CellAlign, CellContext, ColumnDef, FlatTask, GroupingColumn, Row, TaskId};
use crate::ui::theme;

/// Actions that the task table can request.
pub enum TaskTableAction {
    None,
    ToggleTask(TaskId),
    ToggleGroup(String),
    RowClicked(FlatTask),
    RowDoubleClicked(FlatTask),
    GroupClicked { group_id: String, group_value: String },
    GroupDoubleClicked { group_id: String, group_value: String },
}

/// Render the grid section: column headers and one line per row.
pub fn show_task_table(
    columns: &[ColumnDef],
    grouping: Option<&GroupingColumn>,
    frame: &FrameLayout,
    width: f32,
    ui: &mut Ui,
) -> TaskTableAction {
    let mut action = TaskTableAction::None;
    let widths = column_widths(columns, width);

    let (rect, _) = ui.allocate_exact_size(
        Vec2::new(width, theme::HEADER_HEIGHT + frame.total_height),
        Sense::hover(),
    );
    let painter = ui.painter_at(rect);
    let origin = rect.min;

    // Header
    let header_rect = Rect::from_min_size(origin, Vec2::new(width, theme::HEADER_HEIGHT));
    painter.rect_filled(header_rect, 0.0, theme::BG_HEADER);
    painter.line_segment(
        [header_rect.left_bottom(), header_rect.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
    let mut x = origin.x;
    for (column, column_width) in columns.iter().zip(&widths) {
        let cell = Rect::from_min_size(Pos2::new(x, origin.y), Vec2::new(*column_width, theme::HEADER_HEIGHT));
        match &column.render_header {
            Some(render) => {
                let mut child = ui.new_child(UiBuilder::new().max_rect(cell.shrink(theme::CELL_PADDING / 2.0)));
                render(&mut child, column);
            }
            None => {
                painter.with_clip_rect(cell).text(
                    aligned_anchor(cell, column.header_alignment()),
                    align2(column.header_alignment()),
                    &column.header_name,
                    theme::font_header(),
                    theme::TEXT_SECONDARY,
                );
            }
        }
        x += column_width;
    }

    // Rows
    for (index, slot) in frame.rows.iter().enumerate() {
        let row_rect = Rect::from_min_size(
            Pos2::new(origin.x, origin.y + theme::HEADER_HEIGHT + slot.y),
            Vec2::new(width, slot.height),
        );
        let response = ui.interact(row_rect, ui.id().with(("gantt-row", index)), Sense::click());
        let fill = match (&slot.row, response.hovered()) {
            (Row::Group { .. }, _) => theme::BG_GROUP,
            (_, true) => theme::BG_ROW_HOVER,
            _ if index % 2 == 1 => theme::BG_ROW_ODD,
            _ => theme::BG_CANVAS,
        };
        painter.rect_filled(row_rect, 0.0, fill);
        painter.line_segment(
            [row_rect.left_bottom(), row_rect.right_bottom()],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );

        let row_action = match &slot.row {
            Row::Group { id, group_value, .. } => {
                show_group_row(ui, &painter, row_rect, slot, id, group_value, grouping, &response)
            }
            Row::Task { data, .. } => {
                show_task_row(ui, &painter, row_rect, slot, data, columns, &widths, &response)
            }
        };
        if !matches!(row_action, TaskTableAction::None) {
            action = row_action;
        }
    }

    action
}

#[allow(clippy::too_many_arguments)]
fn show_group_row(
    ui: &mut Ui,
    painter: &egui::Painter,
    row_rect: Rect,
    slot: &RowSlot,
    group_id: &str,
    group_value: &str,
    grouping: Option<&GroupingColumn>,
    response: &egui::Response,
) -> TaskTableAction {
    let caret_rect = Rect::from_min_size(
        Pos2::new(row_rect.left() + 4.0, row_rect.top()),
        Vec2::new(theme::CARET_WIDTH, row_rect.height()),
    );
    let caret = ui.interact(caret_rect, ui.id().with(("group-caret", group_id)), Sense::click());
    let glyph = if slot.expanded { icons::CARET_DOWN } else { icons::CARET_RIGHT };
    painter.text(caret_rect.center(), Align2::CENTER_CENTER, glyph, theme::font_icon(), theme::TEXT_SECONDARY);

    let title = grouping.map_or_else(|| group_value.to_string(), |g| g.header_text(group_value));
    painter.text(
        Pos2::new(caret_rect.right() + 4.0, row_rect.center().y),
        Align2::LEFT_CENTER,
        title,
        theme::font_header(),
        theme::TEXT_PRIMARY,
    );

    if caret.clicked() {
        TaskTableAction::ToggleGroup(group_id.to_string())
    } else if response.double_clicked() {
        TaskTableAction::GroupDoubleClicked {
            group_id: group_id.to_string(),
            group_value: group_value.to_string(),
        }
    } else if response.clicked() {
        TaskTableAction::GroupClicked {
            group_id: group_id.to_string(),
            group_value: group_value.to_string(),
        }
    } else {
        TaskTableAction::None
    }
}

#[allow(clippy::too_many_arguments)]
fn show_task_row(
    ui: &mut Ui,
    painter: &egui::Painter,
    row_rect: Rect,
    slot: &RowSlot,
    task: &FlatTask,
    columns: &[ColumnDef],
    widths: &[f32],
    response: &egui::Response,
) -> TaskTableAction {
    let mut action = TaskTableAction::None;
    let mut x = row_rect.left();

    for (position, (column, column_width)) in columns.iter().zip(widths).enumerate() {
        let mut cell = Rect::from_min_size(Pos2::new(x, row_rect.top()), Vec2::new(*column_width, row_rect.height()));
        x += column_width;

        // The first column carries the tree: indentation plus expand caret.
        if position == 0 {
            cell.min.x += task.level as f32 * theme::INDENT_PER_LEVEL;
            if task.has_children() {
                let caret_rect = Rect::from_min_size(cell.min, Vec2::new(theme::CARET_WIDTH, cell.height()));
                let caret = ui.interact(caret_rect, ui.id().with(("task-caret", &task.id)), Sense::click());
                let glyph = if slot.expanded { icons::CARET_DOWN } else { icons::CARET_RIGHT };
                painter.text(
                    caret_rect.center(),
                    Align2::CENTER_CENTER,
                    glyph,
                    theme::font_icon(),
                    theme::TEXT_SECONDARY,
                );
                if caret.clicked() {
                    action = TaskTableAction::ToggleTask(task.id.clone());
                }
            }
            cell.min.x += theme::CARET_WIDTH;
        }

        let value = column.cell_value(task).unwrap_or_default();
        match &column.render_cell {
            Some(render) => {
                let context = CellContext {
                    task,
                    column,
                    value,
                    expanded: slot.expanded,
                };
                let mut child = ui.new_child(UiBuilder::new().max_rect(cell.shrink2(Vec2::new(4.0, 2.0))));
                let cell_action = render(&mut child, &context);
                if cell_action == CellAction::ToggleTask {
                    action = TaskTableAction::ToggleTask(task.id.clone());
                }
            }
            None => {
                painter.with_clip_rect(cell.shrink2(Vec2::new(2.0, 0.0))).text(
                    aligned_anchor(cell, column.align),
                    align2(column.align),
                    value,
                    theme::font_cell(),
                    theme::TEXT_PRIMARY,
                );
            }
        }
    }

    if !matches!(action, TaskTableAction::None) {
        return action;
    }
    if response.double_clicked() {
        TaskTableAction::RowDoubleClicked(task.clone())
    } else if response.clicked() {
        TaskTableAction::RowClicked(task.clone())
    } else {
        TaskTableAction::None
    }
}

fn aligned_anchor(cell: Rect, align: CellAlign) -> Pos2 {
    let y = cell.center().y;
    match align {
        CellAlign::Left => Pos2::new(cell.left() + theme::CELL_PADDING, y),
        CellAlign::Center => Pos2::new(cell.center().x, y),
        CellAlign::Right => Pos2::new(cell.right() - theme::CELL_PADDING, y),
    }
}

fn align2(align: CellAlign) -> Align2 {
    Align2([align.to_egui(), egui::Align::Center])
}
