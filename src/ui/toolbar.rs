use chrono::{Datelike, NaiveDateTime};
use egui::{RichText, Ui};
use egui_phosphor::regular as icons;

use crate::chart::GanttState;
use crate::model::ViewMode;
use crate::ui::theme;

/// Search, view-mode and year controls above the chart.
pub fn show_toolbar(state: &mut GanttState, today: NaiveDateTime, ui: &mut Ui) {
    let strings = state.locale().resources();

    ui.horizontal(|ui| {
        // Search field picker
        let current_field = state.search_field().to_string();
        let current_label = state
            .columns()
            .iter()
            .find(|c| c.field == current_field)
            .map_or(current_field.clone(), |c| c.header_name.clone());
        let mut picked: Option<String> = None;
        ui.label(RichText::new(strings.search_field).color(theme::TEXT_SECONDARY));
        egui::ComboBox::from_id_salt("gantt-search-field")
            .selected_text(current_label)
            .show_ui(ui, |ui| {
                for column in state.columns() {
                    if ui
                        .selectable_label(column.field == current_field, &column.header_name)
                        .clicked()
                    {
                        picked = Some(column.field.clone());
                    }
                }
            });
        if let Some(field) = picked {
            state.set_search_field(field);
        }

        let mut search = state.search_text().to_string();
        let edit = egui::TextEdit::singleline(&mut search)
            .hint_text(format!("{} {}", icons::MAGNIFYING_GLASS, strings.search_placeholder))
            .desired_width(200.0);
        if ui.add(edit).changed() {
            state.set_search_text(search);
        }

        ui.separator();

        // View mode picker
        let mut mode = state.view_mode();
        egui::ComboBox::from_id_salt("gantt-view-mode")
            .selected_text(strings.view_mode.get(mode))
            .show_ui(ui, |ui| {
                for candidate in ViewMode::ALL {
                    ui.selectable_value(&mut mode, candidate, strings.view_mode.get(candidate));
                }
            });
        if mode != state.view_mode() {
            state.set_view_mode(mode);
        }

        ui.separator();

        // Year navigation
        if ui.button(icons::CARET_LEFT).clicked() {
            state.previous_year();
        }
        ui.label(
            RichText::new(format!("{} {}", state.year(), strings.year))
                .strong()
                .color(theme::TEXT_PRIMARY),
        );
        if ui.button(icons::CARET_RIGHT).clicked() {
            state.next_year();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button(strings.today).clicked() {
                state.set_year(today.year());
                state.jump_to(today);
            }
        });
    });
}
