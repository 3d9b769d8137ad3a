use chrono::{Duration, NaiveDate, NaiveDateTime};
use gantt_timeline::chart::{DragController, ResizeEdge};
use gantt_timeline::model::{apply_filters, flatten, FlatTask, Locale, Task, TaskId, TimeAxis, ToggleSet, ViewMode};
use proptest::prelude::*;

fn mode_strategy() -> impl Strategy<Value = ViewMode> {
    prop::sample::select(ViewMode::ALL.to_vec())
}

fn locale_strategy() -> impl Strategy<Value = Locale> {
    prop::sample::select(vec![Locale::En, Locale::Ko, Locale::Ja, Locale::Zh, Locale::Es])
}

/// Minute-aligned instants inside 2025.
fn instant_2025() -> impl Strategy<Value = NaiveDateTime> {
    (0i64..365, 0i64..1440).prop_map(|(day, minute)| {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date")
            + Duration::days(day)
            + Duration::minutes(minute)
    })
}

fn single_task(start: NaiveDateTime, end: NaiveDateTime) -> FlatTask {
    flatten(&[Task::new("t", "Task", start, end)]).remove(0)
}

/// Builds a forest from a parent table: `parents[i]` picks a parent among
/// the earlier nodes, or none.
fn forest(parents: &[Option<usize>]) -> Vec<Task> {
    fn build(node: usize, parents: &[Option<usize>], day: NaiveDateTime) -> Task {
        let children = (0..parents.len())
            .filter(|&i| parents[i] == Some(node))
            .map(|i| build(i, parents, day))
            .collect();
        Task::new(node as u64, format!("Task {node}"), day, day + Duration::days(1)).with_children(children)
    }
    let day = NaiveDate::from_ymd_opt(2025, 6, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid date");
    (0..parents.len())
        .filter(|&i| parents[i].is_none())
        .map(|i| build(i, parents, day))
        .collect()
}

fn parent_table() -> impl Strategy<Value = Vec<Option<usize>>> {
    prop::collection::vec((any::<bool>(), any::<prop::sample::Index>()), 1..24).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (root, pick))| if i == 0 || root { None } else { Some(pick.index(i)) })
            .collect()
    })
}

proptest! {
    #[test]
    fn axis_covers_the_year_without_gaps(mode in mode_strategy(), locale in locale_strategy(), year in 1990i32..2100) {
        let axis = TimeAxis::compute(mode, year, locale);
        let jan_1 = NaiveDate::from_ymd_opt(year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)).expect("valid date");
        let dec_31 = NaiveDate::from_ymd_opt(year, 12, 31).and_then(|d| d.and_hms_opt(23, 59, 59)).expect("valid date");

        prop_assert_eq!(axis.index_of(jan_1), Some(0));
        prop_assert_eq!(axis.index_of(dec_31), axis.last_index());
        for pair in axis.ticks.windows(2) {
            prop_assert_eq!(axis.scale.advance(pair[0], 1), Some(pair[1]));
        }
    }

    #[test]
    fn ratio_round_trips_to_the_same_instant(mode in mode_strategy(), date in instant_2025()) {
        let axis = TimeAxis::compute(mode, 2025, Locale::En);
        let ratio = axis.ratio_within_tick(date);
        prop_assert!((0.0..1.0).contains(&ratio));
        prop_assert_eq!(axis.date_from_ratio(ratio, date), date);
    }

    #[test]
    fn moving_preserves_duration(
        mode in mode_strategy(),
        start in instant_2025(),
        days in 0i64..40,
        deltas in prop::collection::vec(-3000.0f32..3000.0, 1..8),
    ) {
        let axis = TimeAxis::compute(mode, 2025, Locale::En);
        let end = start + Duration::days(days);
        let task = single_task(start, end);

        let mut drag = DragController::new();
        prop_assert!(drag.begin_move(&task, 0.0));
        for dx in deltas {
            if let Some(update) = drag.pointer_move(dx, &axis) {
                prop_assert_eq!(update.end - update.start, end - start);
            }
        }
    }

    #[test]
    fn resizing_never_inverts_the_task(
        mode in mode_strategy(),
        start in instant_2025(),
        days in 1i64..40,
        from_start in any::<bool>(),
        deltas in prop::collection::vec(-4000.0f32..4000.0, 1..12),
    ) {
        let axis = TimeAxis::compute(mode, 2025, Locale::En);
        let task = single_task(start, start + Duration::days(days));
        let edge = if from_start { ResizeEdge::Start } else { ResizeEdge::End };

        let mut drag = DragController::new();
        prop_assert!(drag.begin_resize(&task, edge, 0.0));
        for dx in deltas {
            drag.pointer_move(dx, &axis);
            let (current_start, current_end) = drag.current().expect("session active");
            prop_assert!(current_start < current_end);
        }
    }

    #[test]
    fn flatten_is_a_preorder(parents in parent_table()) {
        let flat = flatten(&forest(&parents));
        prop_assert_eq!(flat.len(), parents.len());

        for (position, task) in flat.iter().enumerate() {
            prop_assert_eq!(task.row_index, position);
            let Some(parent_id) = &task.parent_id else {
                prop_assert_eq!(task.level, 0);
                continue;
            };
            let parent_pos = flat.iter().position(|t| &t.id == parent_id).expect("parent present");
            prop_assert!(parent_pos < position);
            prop_assert_eq!(task.level, flat[parent_pos].level + 1);
            // Everything between a parent and its child belongs to the parent's subtree.
            for between in &flat[parent_pos + 1..position] {
                prop_assert!(between.level > flat[parent_pos].level);
            }
        }
    }

    #[test]
    fn collapsing_hides_descendants_and_reexpanding_restores(parents in parent_table(), pick in any::<prop::sample::Index>()) {
        let flat = flatten(&forest(&parents));
        let all: ToggleSet<TaskId> = flat.iter().map(|t| t.id.clone()).collect();
        let before = apply_filters(&flat, "", "title", &[], 2025, &all);
        prop_assert_eq!(before.len(), flat.len());

        let target = flat[pick.index(flat.len())].id.clone();
        let collapsed = all.toggled(&target);
        let after = apply_filters(&flat, "", "title", &[], 2025, &collapsed);

        let descendant_of_target = |task: &FlatTask| {
            let mut parent = task.parent_id.clone();
            while let Some(id) = parent {
                if id == target {
                    return true;
                }
                parent = flat.iter().find(|t| t.id == id).and_then(|t| t.parent_id.clone());
            }
            false
        };
        for task in &flat {
            let shown = after.iter().any(|t| t.id == task.id);
            prop_assert_eq!(shown, !descendant_of_target(task));
        }

        let restored = apply_filters(&flat, "", "title", &[], 2025, &collapsed.toggled(&target));
        prop_assert_eq!(restored, before);
    }
}
