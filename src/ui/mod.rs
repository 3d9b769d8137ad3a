pub mod gantt_chart;
pub mod task_table;
pub mod theme;
pub mod toolbar;

pub use theme::{apply_theme, install_fonts};

use egui::{RichText, Sense, Ui, Vec2};

use crate::chart::{GanttEvent, GanttState};
use task_table::TaskTableAction;

/// Draws one complete chart instance and returns the events of this frame.
pub fn show_gantt(state: &mut GanttState, ui: &mut Ui) -> Vec<GanttEvent> {
    let today = chrono::Local::now().naive_local();

    toolbar::show_toolbar(state, today, ui);
    ui.separator();

    if state.is_loading() {
        ui.centered_and_justified(|ui| {
            ui.spinner();
        });
        return state.drain_events();
    }
    if state.is_error() {
        ui.label(RichText::new("Failed to load tasks").color(theme::TEXT_ERROR));
        return state.drain_events();
    }

    let chart_width = ui.available_width() - state.grid_width() - theme::SPLITTER_WIDTH;
    state.set_viewport_width(chart_width);
    state.initialize_if_ready(today);
    state.refresh_window(today);

    let frame = state.frame_layout(today);
    let mut table_action = TaskTableAction::None;

    egui::ScrollArea::vertical()
        .id_salt("gantt-vertical-scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal_top(|ui| {
                ui.spacing_mut().item_spacing.x = 0.0;
                table_action = task_table::show_task_table(
                    state.columns(),
                    state.grouping(),
                    &frame,
                    state.grid_width(),
                    ui,
                );
                show_splitter(state, theme::HEADER_HEIGHT + frame.total_height, ui);
                gantt_chart::show_gantt_chart(state, &frame, ui);
            });
        });

    match table_action {
        TaskTableAction::None => {}
        TaskTableAction::ToggleTask(id) => state.toggle_task(&id),
        TaskTableAction::ToggleGroup(group_id) => state.toggle_group(&group_id),
        TaskTableAction::RowClicked(task) => state.emit(GanttEvent::TaskRowClick(task)),
        TaskTableAction::RowDoubleClicked(task) => state.emit(GanttEvent::TaskRowDoubleClick(task)),
        TaskTableAction::GroupClicked { group_id, group_value } => {
            state.emit(GanttEvent::GroupClick { group_id, group_value });
        }
        TaskTableAction::GroupDoubleClicked { group_id, group_value } => {
            state.emit(GanttEvent::GroupDoubleClick { group_id, group_value });
        }
    }

    state.drain_events()
}

/// Draggable divider between the grid and the timeline.
fn show_splitter(state: &mut GanttState, height: f32, ui: &mut Ui) {
    let (rect, response) = ui.allocate_exact_size(Vec2::new(theme::SPLITTER_WIDTH, height), Sense::drag());
    let color = if response.hovered() || state.is_panel_resizing() {
        theme::ACCENT
    } else {
        theme::BORDER_SUBTLE
    };
    ui.painter().vline(rect.center().x, rect.y_range(), egui::Stroke::new(1.0, color));
    if response.hovered() || response.dragged() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeColumn);
    }

    if response.drag_started() {
        if let Some(pos) = response.interact_pointer_pos() {
            state.begin_panel_resize(pos.x);
        }
    }
    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            state.panel_resize_to(pos.x);
        }
    }
    if response.drag_stopped() {
        state.end_panel_resize();
    }
}
