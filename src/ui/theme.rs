use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_CANVAS: Color32 = Color32::from_rgb(255, 255, 255);
pub const BG_PANEL: Color32 = Color32::from_rgb(249, 250, 251);
pub const BG_HEADER: Color32 = Color32::from_rgb(243, 244, 246);
pub const BG_ROW_ODD: Color32 = Color32::from_rgb(250, 250, 252);
pub const BG_ROW_HOVER: Color32 = Color32::from_rgb(238, 242, 255);
pub const BG_GROUP: Color32 = Color32::from_rgb(229, 231, 235);
pub const BG_TODAY_COLUMN: Color32 = Color32::from_rgba_premultiplied(79, 70, 229, 18);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(229, 231, 235);
pub const GRID_LINE: Color32 = Color32::from_rgb(237, 238, 241);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(17, 24, 39);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(75, 85, 99);
pub const TEXT_DIM: Color32 = Color32::from_rgb(156, 163, 175);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(255, 255, 255);
pub const TEXT_ERROR: Color32 = Color32::from_rgb(220, 38, 38);

pub const ACCENT: Color32 = Color32::from_rgb(79, 70, 229);
pub const BAR_DEFAULT: Color32 = Color32::from_rgb(79, 70, 229);
pub const TODAY_LINE: Color32 = Color32::from_rgb(239, 68, 68);
pub const HANDLE_COLOR: Color32 = Color32::from_rgb(255, 255, 255);
pub const NAVIGATOR_FILL: Color32 = Color32::from_rgb(255, 255, 255);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const HEADER_HEIGHT: f32 = 40.0;
pub const HANDLE_WIDTH: f32 = 8.0;
pub const BAR_ROUNDING: f32 = 4.0;
pub const INDENT_PER_LEVEL: f32 = 16.0;
pub const CARET_WIDTH: f32 = 18.0;
pub const CELL_PADDING: f32 = 8.0;
pub const SPLITTER_WIDTH: f32 = 6.0;
pub const NAVIGATOR_RADIUS: f32 = 11.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_cell() -> FontId {
    FontId::proportional(12.5)
}

pub fn font_icon() -> FontId {
    FontId::proportional(14.0)
}

/// Registers the Phosphor icon font as a fallback so icons render inline.
pub fn install_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::light();

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_CANVAS;
    visuals.extreme_bg_color = BG_CANVAS;

    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.noninteractive.rounding = Rounding::same(4.0);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(243, 244, 246);
    visuals.widgets.inactive.weak_bg_fill = Color32::from_rgb(243, 244, 246);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.widgets.inactive.rounding = Rounding::same(4.0);

    visuals.widgets.hovered.bg_fill = BG_ROW_HOVER;
    visuals.widgets.hovered.weak_bg_fill = BG_ROW_HOVER;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.hovered.rounding = Rounding::same(4.0);

    visuals.widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals.selection.bg_fill = Color32::from_rgb(199, 210, 254);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    ctx.set_style(style);
}
