use chrono::{Datelike, NaiveDateTime};
use tracing::{debug, info};

use super::drag::{DragController, DragState, ResizeEdge};
use super::layout::{layout_frame, FrameLayout};
use super::memo::{Memo, MemoStats};
use super::navigator::jump_target;
use super::window::{ScrollRequest, VisibleRange, WindowController};
use super::GanttEvent;
use crate::model::task::{collect_ids, set_task_dates};
use crate::model::{
    apply_filters, build_rows, flatten, ColumnDef, FlatTask, GanttConfig, GroupingColumn, Locale, Row, Task,
    TaskId, TimeAxis, ToggleSet, ViewMode,
};

type AxisKey = (ViewMode, i32, Locale);

#[derive(Debug, Clone, PartialEq)]
struct VisibleKey {
    data_version: u64,
    search_text: String,
    search_field: String,
    year: i32,
    expanded_version: u64,
}

#[derive(Debug, Clone, PartialEq)]
struct RowsKey {
    visible: VisibleKey,
    grouping_version: u64,
    collapsed_version: u64,
    row_height: f32,
}

/// Grid section resize in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PanelResize {
    start_width: f32,
    pointer_x: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateMemoStats {
    pub axis: MemoStats,
    pub flat: MemoStats,
    pub visible: MemoStats,
    pub rows: MemoStats,
}

/// Borrowed views of the memoized derived data.
struct Derived<'a> {
    axis: &'a TimeAxis,
    visible: &'a [FlatTask],
    rows: &'a [Row],
}

/// One chart instance. The host owns the canonical tree; this keeps a
/// working copy for live drag previews plus all UI-only state.
pub struct GanttState {
    config: GanttConfig,
    columns: Vec<ColumnDef>,
    grouping: Option<GroupingColumn>,
    grouping_version: u64,

    tasks: Vec<Task>,
    data_version: u64,
    is_loading: bool,
    is_error: bool,
    initialized: bool,

    year: i32,
    view_mode: ViewMode,
    search_text: String,
    search_field: String,
    grid_width: f32,
    expanded: ToggleSet<TaskId>,
    collapsed_groups: ToggleSet<String>,

    window: WindowController,
    drag: DragController,
    panel_resize: Option<PanelResize>,
    viewport_width: f32,
    centered_on: Option<(ViewMode, i32)>,

    axis_memo: Memo<AxisKey, TimeAxis>,
    flat_memo: Memo<u64, Vec<FlatTask>>,
    visible_memo: Memo<VisibleKey, Vec<FlatTask>>,
    rows_memo: Memo<RowsKey, Vec<Row>>,

    events: Vec<GanttEvent>,
}

fn axis_for(memo: &mut Memo<AxisKey, TimeAxis>, key: AxisKey) -> &TimeAxis {
    memo.get_or_compute(key, || TimeAxis::compute(key.0, key.1, key.2))
}

impl GanttState {
    pub fn new(config: GanttConfig, columns: Vec<ColumnDef>) -> Self {
        let search_field = default_search_field(&columns);
        Self {
            year: chrono::Local::now().year(),
            view_mode: config.view_mode,
            grid_width: config.default_grid_section_width,
            search_text: String::new(),
            search_field,
            config,
            columns,
            grouping: None,
            grouping_version: 0,
            tasks: Vec::new(),
            data_version: 0,
            is_loading: false,
            is_error: false,
            initialized: false,
            expanded: ToggleSet::new(),
            collapsed_groups: ToggleSet::new(),
            window: WindowController::new(),
            drag: DragController::new(),
            panel_resize: None,
            viewport_width: 0.0,
            centered_on: None,
            axis_memo: Memo::new(),
            flat_memo: Memo::new(),
            visible_memo: Memo::new(),
            rows_memo: Memo::new(),
            events: Vec::new(),
        }
    }

    // ── Inbound data ────────────────────────────────────────────

    /// Replaces the working copy with the host's tree.
    pub fn set_data(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.data_version += 1;
    }

    /// Entering the loading state arms a fresh initialisation for when the
    /// data arrives.
    pub fn set_loading(&mut self, is_loading: bool) {
        if is_loading && !self.is_loading {
            self.initialized = false;
        }
        self.is_loading = is_loading;
    }

    pub fn set_error(&mut self, is_error: bool) {
        self.is_error = is_error;
    }

    pub fn set_columns(&mut self, columns: Vec<ColumnDef>) {
        if !columns.iter().any(|c| c.field == self.search_field) {
            self.search_field = default_search_field(&columns);
        }
        self.columns = columns;
        self.visible_memo.invalidate();
        self.rows_memo.invalidate();
    }

    pub fn set_grouping(&mut self, grouping: Option<GroupingColumn>) {
        self.grouping = grouping;
        self.grouping_version += 1;
    }

    /// Resets UI state once data is ready. Returns `true` when it ran.
    pub fn initialize_if_ready(&mut self, today: NaiveDateTime) -> bool {
        if self.initialized || self.is_loading || self.tasks.is_empty() {
            return false;
        }
        self.expanded = if self.config.default_expanded {
            self.expanded.replaced_with(collect_ids(&self.tasks))
        } else {
            self.expanded.replaced_with(std::iter::empty())
        };
        self.collapsed_groups = self.collapsed_groups.replaced_with(std::iter::empty());
        self.view_mode = self.config.view_mode;
        self.search_text.clear();
        self.search_field = default_search_field(&self.columns);
        self.grid_width = self.config.default_grid_section_width;
        self.year = today.year();
        self.window.reset();
        self.centered_on = None;
        self.initialized = true;
        info!(tasks = self.tasks.len(), year = self.year, "chart initialised");
        self.refresh_window(today);
        true
    }

    /// Recenters on today after initialisation or a mode/year change, or on
    /// the axis start when today lies outside the selected year.
    pub fn refresh_window(&mut self, today: NaiveDateTime) {
        let key = (self.view_mode, self.year);
        if !self.initialized || self.viewport_width <= 0.0 || self.centered_on == Some(key) {
            return;
        }
        let axis = axis_for(&mut self.axis_memo, (self.view_mode, self.year, self.config.locale));
        let target = match axis.index_of(today) {
            Some(_) => Some(today),
            None => axis.ticks.first().copied(),
        };
        match target {
            Some(target) => {
                self.window.reset();
                self.window.center_on(target, self.viewport_width, axis);
            }
            None => self.window.reset(),
        }
        self.centered_on = Some(key);
    }

    // ── Controls ────────────────────────────────────────────────

    pub fn set_year(&mut self, year: i32) {
        self.year = year;
    }

    pub fn previous_year(&mut self) {
        self.year -= 1;
    }

    pub fn next_year(&mut self) {
        self.year += 1;
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn set_search_field(&mut self, field: impl Into<String>) {
        self.search_field = field.into();
    }

    pub fn toggle_task(&mut self, id: &TaskId) {
        self.expanded = self.expanded.toggled(id);
    }

    pub fn toggle_group(&mut self, group_id: &str) {
        self.collapsed_groups = self.collapsed_groups.toggled(&group_id.to_string());
    }

    pub fn set_grid_width(&mut self, width: f32) {
        self.grid_width = width.max(self.config.min_grid_section_width);
    }

    pub fn begin_panel_resize(&mut self, pointer_x: f32) {
        self.panel_resize = Some(PanelResize {
            start_width: self.grid_width,
            pointer_x,
        });
    }

    pub fn panel_resize_to(&mut self, pointer_x: f32) {
        if let Some(resize) = self.panel_resize {
            self.set_grid_width(resize.start_width + pointer_x - resize.pointer_x);
        }
    }

    pub fn end_panel_resize(&mut self) {
        self.panel_resize = None;
    }

    pub fn is_panel_resizing(&self) -> bool {
        self.panel_resize.is_some()
    }

    // ── Derived data ────────────────────────────────────────────

    fn derive(&mut self) -> Derived<'_> {
        let Self {
            config,
            columns,
            grouping,
            grouping_version,
            tasks,
            data_version,
            year,
            view_mode,
            search_text,
            search_field,
            expanded,
            collapsed_groups,
            axis_memo,
            flat_memo,
            visible_memo,
            rows_memo,
            ..
        } = self;

        let axis = axis_for(axis_memo, (*view_mode, *year, config.locale));
        let flat = flat_memo.get_or_compute(*data_version, || flatten(tasks));
        let visible_key = VisibleKey {
            data_version: *data_version,
            search_text: search_text.clone(),
            search_field: search_field.clone(),
            year: *year,
            expanded_version: expanded.version(),
        };
        let rows_key = RowsKey {
            visible: visible_key.clone(),
            grouping_version: *grouping_version,
            collapsed_version: collapsed_groups.version(),
            row_height: config.row_height,
        };
        let visible = visible_memo.get_or_compute(visible_key, || {
            apply_filters(flat, search_text, search_field, columns, *year, expanded)
        });
        let rows = rows_memo.get_or_compute(rows_key, || {
            build_rows(visible, grouping.as_ref(), collapsed_groups, config.row_height)
        });
        Derived { axis, visible, rows }
    }

    pub fn axis(&mut self) -> &TimeAxis {
        self.derive().axis
    }

    pub fn visible_tasks(&mut self) -> &[FlatTask] {
        self.derive().visible
    }

    pub fn rows(&mut self) -> &[Row] {
        self.derive().rows
    }

    pub fn frame_layout(&mut self, today: NaiveDateTime) -> FrameLayout {
        let range = self.window.range();
        let expanded = self.expanded.clone();
        let collapsed_groups = self.collapsed_groups.clone();
        let bar_height = self.config.task_bar_height;
        let derived = self.derive();
        layout_frame(
            derived.axis,
            range,
            derived.rows,
            &expanded,
            &collapsed_groups,
            bar_height,
            today,
        )
    }

    pub fn memo_stats(&self) -> StateMemoStats {
        StateMemoStats {
            axis: self.axis_memo.stats(),
            flat: self.flat_memo.stats(),
            visible: self.visible_memo.stats(),
            rows: self.rows_memo.stats(),
        }
    }

    // ── Scrolling ───────────────────────────────────────────────

    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width.max(0.0);
    }

    pub fn on_scroll(&mut self, offset: f32) -> bool {
        let axis = axis_for(&mut self.axis_memo, (self.view_mode, self.year, self.config.locale));
        self.window.on_scroll(offset, self.viewport_width, axis)
    }

    /// Recenters the window on `date`. Off-axis dates are ignored.
    pub fn jump_to(&mut self, date: NaiveDateTime) -> Option<ScrollRequest> {
        let axis = axis_for(&mut self.axis_memo, (self.view_mode, self.year, self.config.locale));
        self.window.center_on(date, self.viewport_width, axis)
    }

    pub fn jump_to_task(&mut self, task: &FlatTask) -> Option<ScrollRequest> {
        let target = {
            let axis = axis_for(&mut self.axis_memo, (self.view_mode, self.year, self.config.locale));
            jump_target(task, axis)?
        };
        self.jump_to(target)
    }

    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.window.take_scroll_request()
    }

    pub fn visible_range(&self) -> Option<VisibleRange> {
        self.window.range()
    }

    // ── Direct manipulation ─────────────────────────────────────

    pub fn begin_move(&mut self, task: &FlatTask, pointer_x: f32) -> bool {
        self.drag.begin_move(task, pointer_x)
    }

    pub fn begin_resize(&mut self, task: &FlatTask, edge: ResizeEdge, pointer_x: f32) -> bool {
        self.drag.begin_resize(task, edge, pointer_x)
    }

    /// Feeds a pointer position into the active session and applies the
    /// proposal to the working copy.
    pub fn pointer_moved(&mut self, pointer_x: f32) {
        let axis = axis_for(&mut self.axis_memo, (self.view_mode, self.year, self.config.locale));
        let Some(update) = self.drag.pointer_move(pointer_x, axis) else {
            return;
        };
        if set_task_dates(&mut self.tasks, &update.id, update.start, update.end) {
            self.data_version += 1;
        }
        self.events.push(GanttEvent::TaskUpdate(update));
    }

    pub fn pointer_released(&mut self) {
        if let Some(commit) = self.drag.release() {
            debug!(task = %commit.new.id, "emitting data update");
            self.events.push(GanttEvent::DataUpdate {
                new: commit.new,
                old: commit.old,
            });
        }
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    pub fn dragging_task(&self) -> Option<&TaskId> {
        self.drag.active_task()
    }

    // ── Events ──────────────────────────────────────────────────

    pub fn emit(&mut self, event: GanttEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GanttEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Getters ─────────────────────────────────────────────────

    pub fn config(&self) -> &GanttConfig {
        &self.config
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn grouping(&self) -> Option<&GroupingColumn> {
        self.grouping.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn locale(&self) -> Locale {
        self.config.locale
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn search_field(&self) -> &str {
        &self.search_field
    }

    pub fn grid_width(&self) -> f32 {
        self.grid_width
    }

    pub fn is_expanded(&self, id: &TaskId) -> bool {
        self.expanded.contains(id)
    }

    pub fn is_group_collapsed(&self, group_id: &str) -> bool {
        self.collapsed_groups.contains(&group_id.to_string())
    }
}

fn default_search_field(columns: &[ColumnDef]) -> String {
    columns
        .first()
        .map(|c| c.field.clone())
        .unwrap_or_else(|| "title".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, m, d)
            .and_then(|date| date.and_hms_opt(h, 0, 0))
            .expect("valid date")
    }

    fn sample() -> Vec<Task> {
        vec![
            Task::new("1", "Planning", at(4, 1, 0), at(4, 5, 0))
                .with_children(vec![Task::new("1-1", "Sub Task 1", at(4, 1, 0), at(4, 2, 0))]),
            Task::new("2", "Build", at(4, 6, 0), at(4, 20, 0)),
        ]
    }

    fn ready_state(config: GanttConfig) -> GanttState {
        let mut state = GanttState::new(config, vec![ColumnDef::new("title", "Title")]);
        state.set_viewport_width(800.0);
        state.set_data(sample());
        assert!(state.initialize_if_ready(at(4, 3, 9)));
        state
    }

    #[test]
    fn initialisation_waits_for_data() {
        let mut state = GanttState::new(GanttConfig::default(), Vec::new());
        state.set_loading(true);
        state.set_data(sample());
        assert!(!state.initialize_if_ready(at(4, 3, 9)));
        state.set_loading(false);
        assert!(state.initialize_if_ready(at(4, 3, 9)));
        assert!(!state.initialize_if_ready(at(4, 3, 9)));
        assert_eq!(state.year(), 2025);
        assert_eq!(state.search_field(), "title");
    }

    #[test]
    fn initialisation_centers_on_today() {
        let mut state = ready_state(GanttConfig::default());
        // April 3rd is index 92; 20 ticks fit in 800 px.
        assert_eq!(state.visible_range(), Some(VisibleRange { start: 82, end: 101 }));
        assert_eq!(state.take_scroll_request().map(|r| r.offset), Some(82.0 * 40.0));
    }

    #[test]
    fn default_expanded_opens_every_task() {
        let mut state = ready_state(GanttConfig {
            default_expanded: true,
            ..GanttConfig::default()
        });
        assert_eq!(state.visible_tasks().len(), 3);

        let mut collapsed = ready_state(GanttConfig::default());
        assert_eq!(collapsed.visible_tasks().len(), 2);
        collapsed.toggle_task(&TaskId::from("1"));
        assert_eq!(collapsed.visible_tasks().len(), 3);
    }

    #[test]
    fn changing_mode_recenters() {
        let mut state = ready_state(GanttConfig::default());
        state.set_view_mode(ViewMode::Month);
        state.refresh_window(at(4, 3, 9));
        // April is month index 3; 800 / 120 rounds up to 7 ticks.
        assert_eq!(state.visible_range(), Some(VisibleRange { start: 0, end: 6 }));
        assert_eq!(state.axis().len(), 12);
    }

    #[test]
    fn other_year_recenters_on_axis_start() {
        let mut state = ready_state(GanttConfig::default());
        state.next_year();
        state.refresh_window(at(4, 3, 9));
        assert_eq!(state.visible_range(), Some(VisibleRange { start: 0, end: 19 }));
        assert!(state.visible_tasks().is_empty());
    }

    #[test]
    fn drag_updates_working_copy_and_commits_once() {
        let mut state = ready_state(GanttConfig::default());
        let task = state.visible_tasks()[1].clone();
        assert_eq!(task.id, TaskId::from("2"));

        assert!(state.begin_move(&task, 0.0));
        state.pointer_moved(40.0);
        state.pointer_moved(80.0);
        assert_eq!(state.visible_tasks()[1].start_date, at(4, 8, 0));
        state.pointer_released();

        let events = state.drain_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], GanttEvent::TaskUpdate(update) if update.start == at(4, 7, 0)));
        match &events[2] {
            GanttEvent::DataUpdate { new, old } => {
                assert_eq!(new.start_date, at(4, 8, 0));
                assert_eq!(new.end_date, at(4, 22, 0));
                assert_eq!(old.start_date, at(4, 6, 0));
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn grid_width_has_a_floor() {
        let mut state = ready_state(GanttConfig::default());
        state.begin_panel_resize(500.0);
        state.panel_resize_to(100.0);
        assert_eq!(state.grid_width(), 200.0);
        state.panel_resize_to(650.0);
        assert_eq!(state.grid_width(), 650.0);
        state.end_panel_resize();
        state.panel_resize_to(900.0);
        assert_eq!(state.grid_width(), 650.0);
    }

    #[test]
    fn unchanged_inputs_hit_the_caches() {
        let mut state = ready_state(GanttConfig::default());
        state.rows();
        let before = state.memo_stats();
        state.rows();
        state.frame_layout(at(4, 3, 9));
        let after = state.memo_stats();
        assert_eq!(after.rows.misses, before.rows.misses);
        assert_eq!(after.visible.misses, before.visible.misses);
        assert!(after.rows.hits > before.rows.hits);

        state.set_search_text("build");
        assert_eq!(state.rows().len(), 1);
        assert_eq!(state.memo_stats().visible.misses, after.visible.misses + 1);
    }
}
