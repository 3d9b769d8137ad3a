use egui::{Align2, Color32, Id, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use egui_phosphor::regular as icons;

use crate::chart::{DragState, FrameLayout, GanttEvent, GanttState, ResizeEdge, TaskBarLayout, TaskVisibility};
use crate::model::task::date_serde;
use crate::model::Row;
use crate::ui::theme;

const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;

/// Render the timeline section (right of the grid).
pub fn show_gantt_chart(state: &mut GanttState, frame: &FrameLayout, ui: &mut Ui) {
    let viewport_width = ui.available_width();
    let request = state.take_scroll_request();

    let mut area = egui::ScrollArea::horizontal()
        .id_salt("gantt-chart-scroll")
        .auto_shrink([false, true]);
    if let Some(request) = request.filter(|r| !r.smooth) {
        area = area.horizontal_scroll_offset(request.offset);
    }

    let output = area.show(ui, |ui| {
        let chart_width = frame.total_width.max(viewport_width);
        let chart_height = HEADER_HEIGHT + frame.total_height;
        let (response, painter) = ui.allocate_painter(Vec2::new(chart_width, chart_height), Sense::hover());
        let origin = response.rect.min;

        if let Some(request) = request.filter(|r| r.smooth) {
            let clip = ui.clip_rect();
            let target = Rect::from_min_size(
                Pos2::new(origin.x + request.offset, clip.top()),
                Vec2::new(viewport_width, 1.0),
            );
            ui.scroll_to_rect(target, Some(egui::Align::Min));
        }

        painter.rect_filled(response.rect, 0.0, theme::BG_CANVAS);
        draw_rows(&painter, origin, frame, chart_width);
        draw_header(&painter, origin, frame, chart_height);
        draw_today_line(&painter, origin, frame, chart_height, state.locale().resources().today);

        for bar in &frame.bars {
            show_task_bar(state, bar, origin, &painter, ui);
        }

        for nav in &frame.navigators {
            let center = Pos2::new(origin.x + nav.x, origin.y + HEADER_HEIGHT + nav.y);
            let rect = Rect::from_center_size(center, Vec2::splat(theme::NAVIGATOR_RADIUS * 2.0));
            let nav_response = ui.interact(rect, Id::new(("gantt-navigator", &nav.task_id)), Sense::click());
            let stroke = if nav_response.hovered() { theme::ACCENT } else { theme::BORDER_SUBTLE };
            painter.circle(center, theme::NAVIGATOR_RADIUS, theme::NAVIGATOR_FILL, Stroke::new(1.0, stroke));
            let glyph = match nav.direction {
                TaskVisibility::Before => icons::CARET_LEFT,
                _ => icons::CARET_RIGHT,
            };
            painter.text(center, Align2::CENTER_CENTER, glyph, theme::font_icon(), theme::TEXT_SECONDARY);
            if nav_response.on_hover_cursor(egui::CursorIcon::PointingHand).clicked() {
                state.jump_to(nav.target);
            }
        }
    });

    // Pointer is tracked globally while a session runs so the drag survives
    // leaving the bar.
    if state.is_dragging() {
        let cursor = match state.drag_state() {
            DragState::Resizing(_) => egui::CursorIcon::ResizeHorizontal,
            _ => egui::CursorIcon::Grabbing,
        };
        ui.ctx().set_cursor_icon(cursor);
        let (pointer, released) = ui.input(|i| (i.pointer.latest_pos(), i.pointer.any_released()));
        if let Some(pointer) = pointer {
            state.pointer_moved(pointer.x);
        }
        if released {
            state.pointer_released();
        }
        ui.ctx().request_repaint();
    }

    state.on_scroll(output.state.offset.x);
}

fn show_task_bar(state: &mut GanttState, bar: &TaskBarLayout, origin: Pos2, painter: &egui::Painter, ui: &mut Ui) {
    let task = &bar.task;
    let bar_rect = Rect::from_min_size(
        Pos2::new(origin.x + bar.x, origin.y + HEADER_HEIGHT + bar.y),
        Vec2::new(bar.width.max(2.0), bar.height),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let fill = bar.color.unwrap_or(theme::BAR_DEFAULT);

    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(25));
    painter.rect_filled(bar_rect, rounding, fill);

    let bar_response = ui.interact(bar_rect, Id::new(("gantt-bar", &task.id)), Sense::click_and_drag());
    let left_handle = Rect::from_min_max(
        Pos2::new(bar_rect.left() - HANDLE_WIDTH * 0.5, bar_rect.top()),
        Pos2::new(bar_rect.left() + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
    );
    let right_handle = Rect::from_min_max(
        Pos2::new(bar_rect.right() - HANDLE_WIDTH * 0.5, bar_rect.top()),
        Pos2::new(bar_rect.right() + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
    );
    let left_response = ui.interact(left_handle, Id::new(("gantt-resize-start", &task.id)), Sense::drag());
    let right_response = ui.interact(right_handle, Id::new(("gantt-resize-end", &task.id)), Sense::drag());

    let mut text_left = bar_rect.left() + 6.0;
    let caret_response = if task.has_children() {
        let caret_rect = Rect::from_min_size(
            Pos2::new(bar_rect.left() + HANDLE_WIDTH * 0.5, bar_rect.top()),
            Vec2::new(theme::CARET_WIDTH, bar_rect.height()),
        );
        text_left = caret_rect.right();
        let glyph = if bar.expanded { icons::CARET_DOWN } else { icons::CARET_RIGHT };
        painter
            .with_clip_rect(bar_rect)
            .text(caret_rect.center(), Align2::CENTER_CENTER, glyph, theme::font_icon(), theme::TEXT_ON_BAR);
        Some(ui.interact(caret_rect, Id::new(("gantt-bar-caret", &task.id)), Sense::click()))
    } else {
        None
    };

    if bar_rect.width() > 30.0 {
        let clip = Rect::from_min_max(Pos2::new(text_left, bar_rect.top()), bar_rect.max);
        painter.with_clip_rect(clip).text(
            Pos2::new(text_left, bar_rect.center().y),
            Align2::LEFT_CENTER,
            &task.title,
            theme::font_bar(),
            theme::TEXT_ON_BAR,
        );
    }

    let hovered = bar_response.hovered() || left_response.hovered() || right_response.hovered();
    if hovered || state.dragging_task() == Some(&task.id) {
        let handle_h = bar_rect.height() * 0.55;
        let handle_y = bar_rect.center().y - handle_h / 2.0;
        for x in [bar_rect.left() + 1.5, bar_rect.right() - 5.5] {
            let pill = Rect::from_min_size(Pos2::new(x, handle_y), Vec2::new(4.0, handle_h));
            painter.rect_filled(pill, Rounding::same(2.0), theme::HANDLE_COLOR);
        }
    }
    if left_response.hovered() || right_response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
    } else if bar_response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
    }

    if left_response.drag_started() {
        let ptr_x = left_response.interact_pointer_pos().map_or(bar_rect.left(), |p| p.x);
        state.begin_resize(task, ResizeEdge::Start, ptr_x);
    } else if right_response.drag_started() {
        let ptr_x = right_response.interact_pointer_pos().map_or(bar_rect.right(), |p| p.x);
        state.begin_resize(task, ResizeEdge::End, ptr_x);
    } else if bar_response.drag_started() {
        let ptr_x = bar_response.interact_pointer_pos().map_or(bar_rect.center().x, |p| p.x);
        state.begin_move(task, ptr_x);
    }

    if caret_response.is_some_and(|caret| caret.clicked()) {
        state.toggle_task(&task.id);
    } else if bar_response.double_clicked() {
        state.emit(GanttEvent::TaskDoubleClick(task.clone()));
    } else if bar_response.clicked() {
        state.emit(GanttEvent::TaskClick(task.clone()));
    }

    if hovered && !state.is_dragging() {
        egui::show_tooltip_at_pointer(ui.ctx(), ui.layer_id(), Id::new(("gantt-bar-tip", &task.id)), |ui| {
            ui.strong(&task.title);
            ui.label(format!(
                "{} → {}",
                date_serde::format(task.start_date),
                date_serde::format(task.end_date),
            ));
        });
    }
}

fn draw_rows(painter: &egui::Painter, origin: Pos2, frame: &FrameLayout, width: f32) {
    for (index, slot) in frame.rows.iter().enumerate() {
        let y = origin.y + HEADER_HEIGHT + slot.y;
        let rect = Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(width, slot.height));
        let fill = match slot.row {
            Row::Group { .. } => theme::BG_GROUP,
            _ if index % 2 == 1 => theme::BG_ROW_ODD,
            _ => theme::BG_CANVAS,
        };
        painter.rect_filled(rect, 0.0, fill);
        painter.line_segment(
            [rect.left_bottom(), rect.right_bottom()],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }
}

fn draw_header(painter: &egui::Painter, origin: Pos2, frame: &FrameLayout, height: f32) {
    let width = frame.total_width.max(painter.clip_rect().width());
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    for tick in &frame.ticks {
        let x = origin.x + tick.x;
        if tick.is_today {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(x, origin.y), Vec2::new(frame.tick_width, height)),
                0.0,
                theme::BG_TODAY_COLUMN,
            );
        }
        painter.line_segment(
            [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, origin.y + height)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        painter.line_segment(
            [Pos2::new(x, origin.y + 4.0), Pos2::new(x, origin.y + HEADER_HEIGHT)],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );

        let cell = Rect::from_min_size(Pos2::new(x, origin.y), Vec2::new(frame.tick_width, HEADER_HEIGHT));
        let clipped = painter.with_clip_rect(cell);
        let center_x = x + frame.tick_width / 2.0;
        clipped.text(
            Pos2::new(center_x, origin.y + 13.0),
            Align2::CENTER_CENTER,
            &tick.label,
            theme::font_header(),
            theme::TEXT_PRIMARY,
        );
        if !tick.sub_label.is_empty() {
            clipped.text(
                Pos2::new(center_x, origin.y + 29.0),
                Align2::CENTER_CENTER,
                &tick.sub_label,
                theme::font_sub(),
                theme::TEXT_SECONDARY,
            );
        }
    }
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, frame: &FrameLayout, height: f32, label: &str) {
    let Some(today_x) = frame.today_x else {
        return;
    };
    let x = origin.x + today_x;
    painter.line_segment(
        [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, origin.y + height)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let galley = painter.layout_no_wrap(label.to_string(), theme::font_sub(), Color32::WHITE);
    let badge_rect = Rect::from_center_size(
        Pos2::new(x, origin.y + HEADER_HEIGHT + 6.0),
        Vec2::new(galley.size().x + 10.0, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.galley(
        badge_rect.center() - galley.size() / 2.0,
        galley,
        Color32::WHITE,
    );
}
