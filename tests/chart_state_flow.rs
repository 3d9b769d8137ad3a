use chrono::{NaiveDate, NaiveDateTime};
use gantt_timeline::chart::{TaskVisibility, VisibleRange};
use gantt_timeline::model::{ColumnDef, GroupingColumn, Locale, Row, TimeAxis};
use gantt_timeline::{GanttConfig, GanttEvent, GanttState, Task, TaskId, ViewMode};

fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, m, d)
        .and_then(|date| date.and_hms_opt(h, 0, 0))
        .expect("valid date")
}

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("title", "Title").flex(1.0),
        ColumnDef::new("projectId", "Project"),
    ]
}

fn chart(tasks: Vec<Task>, config: GanttConfig) -> GanttState {
    let mut state = GanttState::new(config, columns());
    state.set_viewport_width(800.0);
    state.set_data(tasks);
    assert!(state.initialize_if_ready(at(4, 3, 9)));
    state
}

fn project_tasks() -> Vec<Task> {
    vec![
        Task::new(1u64, "Alpha", at(4, 1, 0), at(4, 5, 0)).with_field("projectId", "A"),
        Task::new(2u64, "Bravo", at(4, 2, 0), at(4, 6, 0)).with_field("projectId", "B"),
        Task::new(3u64, "Charlie", at(4, 3, 0), at(4, 7, 0)).with_field("projectId", "A"),
    ]
}

fn row_labels(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .map(|row| match row {
            Row::Group { group_value, .. } => format!("group:{group_value}"),
            Row::Task { id, .. } => format!("task:{id}"),
        })
        .collect()
}

#[test]
fn day_axis_spans_the_whole_year() {
    let axis = TimeAxis::compute(ViewMode::Day, 2025, Locale::En);
    assert_eq!(axis.len(), 365);
    assert_eq!(axis.ticks[0], at(1, 1, 0));
    assert_eq!(axis.ticks[364], at(12, 31, 0));
}

#[test]
fn bar_geometry_follows_the_day_grid() {
    let mut state = chart(
        vec![Task::new(1u64, "Alpha", at(4, 1, 0), at(4, 5, 0))],
        GanttConfig::default(),
    );
    let frame = state.frame_layout(at(4, 3, 9));
    let bar = frame.bars.first().expect("bar in view");
    assert_eq!(bar.x, 90.0 * 40.0);
    assert_eq!(bar.width, 160.0);
    assert_eq!(bar.y, 10.0);
    assert_eq!(bar.height, 30.0);
    assert_eq!(frame.today_x, Some(92.0 * 40.0 + 20.0));
}

#[test]
fn grouping_orders_rows_by_group_value() {
    let mut state = chart(project_tasks(), GanttConfig::default());
    state.set_grouping(Some(GroupingColumn::new("projectId")));
    assert_eq!(
        row_labels(state.rows()),
        ["group:A", "task:1", "task:3", "group:B", "task:2"]
    );
}

#[test]
fn collapsing_a_group_keeps_its_header() {
    let mut state = chart(project_tasks(), GanttConfig::default());
    state.set_grouping(Some(GroupingColumn::new("projectId")));
    state.toggle_group("group-A");
    assert!(state.is_group_collapsed("group-A"));
    assert_eq!(row_labels(state.rows()), ["group:A", "group:B", "task:2"]);

    let frame = state.frame_layout(at(4, 3, 9));
    assert!(!frame.rows[0].expanded);
    assert!(frame.rows[1].expanded);

    state.toggle_group("group-A");
    assert_eq!(row_labels(state.rows()).len(), 5);
}

#[test]
fn search_does_not_expand_ancestors() {
    let tree = vec![Task::new(1u64, "Planning", at(4, 1, 0), at(4, 5, 0)).with_children(vec![
        Task::new(2u64, "Sub Task 1", at(4, 1, 0), at(4, 2, 0)),
        Task::new(3u64, "Sub Task 2", at(4, 2, 0), at(4, 3, 0)),
    ])];
    let mut state = chart(tree, GanttConfig::default());
    state.set_search_text("Sub Task 1");
    assert!(state.visible_tasks().is_empty());

    state.toggle_task(&TaskId::from(1u64));
    let visible: Vec<_> = state.visible_tasks().iter().map(|t| t.title.clone()).collect();
    assert_eq!(visible, ["Sub Task 1"]);
}

#[test]
fn navigator_jumps_to_an_offscreen_task() {
    let mut state = chart(
        vec![
            Task::new(1u64, "Near", at(4, 2, 0), at(4, 4, 0)),
            Task::new(2u64, "Far", at(9, 1, 0), at(9, 10, 0)),
        ],
        GanttConfig::default(),
    );
    let frame = state.frame_layout(at(4, 3, 9));
    assert_eq!(frame.bars.len(), 1);
    let nav = frame.navigators.first().expect("navigator for the far task");
    assert_eq!(nav.direction, TaskVisibility::After);
    assert_eq!(nav.target, at(9, 1, 0));
    state.take_scroll_request();

    let request = state.jump_to(nav.target).expect("target on axis");
    assert!(request.smooth);
    // September 1st is day index 243.
    let range = state.visible_range().expect("window");
    assert!(range.contains(243));
    assert_eq!(state.take_scroll_request(), Some(request));

    let frame = state.frame_layout(at(4, 3, 9));
    assert!(frame.bars.iter().any(|bar| bar.task.id == TaskId::from(2u64)));
}

#[test]
fn scrolling_moves_the_window() {
    let mut state = chart(project_tasks(), GanttConfig::default());
    assert!(state.on_scroll(0.0));
    assert_eq!(state.visible_range(), Some(VisibleRange { start: 0, end: 25 }));
    assert!(!state.on_scroll(0.0));
    assert!(state.on_scroll(4000.0));
    assert_eq!(state.visible_range(), Some(VisibleRange { start: 95, end: 125 }));
}

#[test]
fn resize_commits_a_data_update_for_the_host() {
    let mut state = chart(project_tasks(), GanttConfig::default());
    let task = state.visible_tasks()[0].clone();
    assert!(state.begin_resize(&task, gantt_timeline::chart::ResizeEdge::End, 100.0));
    state.pointer_moved(180.0);
    state.pointer_released();

    let events = state.drain_events();
    let mut host_tree = project_tasks();
    for event in events {
        if let GanttEvent::DataUpdate { new, old } = event {
            assert_eq!(old.end_date, at(4, 5, 0));
            assert_eq!(new.end_date, at(4, 7, 0));
            assert!(gantt_timeline::model::task::set_task_dates(
                &mut host_tree,
                &new.id,
                new.start_date,
                new.end_date
            ));
        }
    }
    assert_eq!(host_tree[0].end_date, at(4, 7, 0));
    assert_eq!(state.tasks()[0].end_date, at(4, 7, 0));
}

#[test]
fn loading_again_rearms_initialisation() {
    let mut state = chart(project_tasks(), GanttConfig::default());
    state.set_search_text("Alpha");
    state.set_loading(true);
    state.set_data(project_tasks());
    state.set_loading(false);
    assert!(state.initialize_if_ready(at(4, 3, 9)));
    assert_eq!(state.search_text(), "");
}
