use std::path::PathBuf;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use egui::Color32;
use gantt_timeline::model::task::set_task_dates;
use gantt_timeline::model::{CellAction, CellAlign, ColumnDef, GroupingColumn};
use gantt_timeline::{io, ui, GanttConfig, GanttEvent, GanttState, Task};
use tracing::{info, warn};

/// Host application: owns the canonical task tree and one chart instance.
pub struct GanttApp {
    pub tasks: Vec<Task>,
    pub tasks_path: Option<PathBuf>,
    pub chart: GanttState,
    pub group_by_project: bool,
    pub status_message: String,
}

impl GanttApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: GanttConfig, tasks_path: Option<PathBuf>) -> Self {
        ui::install_fonts(&cc.egui_ctx);

        let tasks = match tasks_path.as_deref().map(io::load_tasks) {
            Some(Ok(tasks)) => tasks,
            Some(Err(err)) => {
                warn!(%err, "falling back to sample tasks");
                Self::sample_tasks()
            }
            None => Self::sample_tasks(),
        };

        let mut chart = GanttState::new(config, Self::columns());
        chart.set_data(tasks.clone());

        Self {
            tasks,
            tasks_path,
            chart,
            group_by_project: false,
            status_message: "Ready".to_string(),
        }
    }

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("title", "Task").flex(1.0).min_width(140.0),
            ColumnDef::new("startDate", "Start")
                .width(96.0)
                .value_getter(|task| task.start_date.format("%Y-%m-%d").to_string()),
            ColumnDef::new("endDate", "End")
                .width(96.0)
                .value_getter(|task| task.end_date.format("%Y-%m-%d").to_string()),
            ColumnDef::new("projectId", "Project")
                .width(72.0)
                .align(CellAlign::Center)
                .render_cell(|ui, cell| {
                    ui.centered_and_justified(|ui| {
                        ui.label(egui::RichText::new(&cell.value).strong().color(ui::theme::ACCENT));
                    });
                    CellAction::None
                }),
        ]
    }

    /// Generate a sample tree around today for demonstration.
    fn sample_tasks() -> Vec<Task> {
        let today = chrono::Local::now().date_naive().and_time(NaiveTime::MIN);
        let span = |from: i64, to: i64| -> (NaiveDateTime, NaiveDateTime) {
            (today + Duration::days(from), today + Duration::days(to))
        };

        // ── Phase 1: Planning ───────────────────────────────────────
        let (s, e) = span(-5, 8);
        let planning = Task::new(1u64, "Planning", s, e)
            .with_color(Color32::from_rgb(70, 120, 180))
            .with_field("projectId", "A")
            .with_children(vec![
                {
                    let (s, e) = span(-5, -2);
                    Task::new(2u64, "Project Kickoff", s, e).with_field("projectId", "A")
                },
                {
                    let (s, e) = span(-2, 5);
                    Task::new(3u64, "Requirements Gathering", s, e)
                        .with_color(Color32::from_rgb(60, 179, 113))
                        .with_field("projectId", "A")
                },
            ]);

        // ── Phase 2: Build ──────────────────────────────────────────
        let (s, e) = span(6, 40);
        let build = Task::new(4u64, "Build", s, e)
            .with_color(Color32::from_rgb(147, 112, 219))
            .with_field("projectId", "B")
            .with_children(vec![
                {
                    let (s, e) = span(6, 20);
                    Task::new(5u64, "Backend", s, e).with_field("projectId", "B")
                },
                {
                    let (s, e) = span(12, 34);
                    Task::new(6u64, "Frontend", s, e)
                        .with_field("projectId", "B")
                        .with_children(vec![{
                            let (s, e) = span(12, 18);
                            Task::new(7u64, "Design System", s, e).with_field("projectId", "B")
                        }])
                },
            ]);

        let (s, e) = span(42, 49);
        let launch = Task::new(8u64, "Launch", s, e)
            .with_color(Color32::from_rgb(220, 90, 60))
            .with_field("projectId", "A");

        vec![planning, build, launch]
    }

    fn set_grouping(&mut self, enabled: bool) {
        self.group_by_project = enabled;
        let grouping = enabled.then(|| {
            GroupingColumn::new("projectId").header_getter(|value| format!("Project {value}"))
        });
        self.chart.set_grouping(grouping);
    }

    pub fn save_tasks(&mut self) {
        let Some(path) = self.tasks_path.clone() else {
            self.status_message = "No task file to save to".to_string();
            return;
        };
        match io::save_tasks(&self.tasks, &path) {
            Ok(()) => self.status_message = format!("Saved {}", path.display()),
            Err(e) => self.status_message = format!("Error saving: {}", e),
        }
    }

    fn handle_event(&mut self, event: GanttEvent) {
        match event {
            GanttEvent::DataUpdate { new, old } => {
                if set_task_dates(&mut self.tasks, &new.id, new.start_date, new.end_date) {
                    info!(task = %new.id, "applied committed update");
                    self.chart.set_data(self.tasks.clone());
                    self.status_message = format!(
                        "'{}' moved from {} to {}",
                        new.title,
                        old.start_date.format("%Y-%m-%d %H:%M"),
                        new.start_date.format("%Y-%m-%d %H:%M"),
                    );
                }
            }
            GanttEvent::TaskUpdate(_) => {}
            GanttEvent::TaskClick(task) | GanttEvent::TaskRowClick(task) => {
                self.status_message = format!("Selected '{}'", task.title);
            }
            GanttEvent::TaskDoubleClick(task) | GanttEvent::TaskRowDoubleClick(task) => {
                if let Some(request) = self.chart.jump_to_task(&task) {
                    info!(offset = request.offset, "jumped to task");
                }
            }
            GanttEvent::GroupClick { group_value, .. } | GanttEvent::GroupDoubleClick { group_value, .. } => {
                self.status_message = format!("Project {group_value}");
            }
        }
    }
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::apply_theme(ctx);

        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            self.save_tasks();
        }

        // Top panel: host controls
        egui::TopBottomPanel::top("host_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut grouped = self.group_by_project;
                if ui.checkbox(&mut grouped, "Group by project").changed() {
                    self.set_grouping(grouped);
                }
            });
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_sub())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("Rows: {}", self.chart.rows().len()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        let mut events = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            events = ui::show_gantt(&mut self.chart, ui);
        });
        for event in events {
            self.handle_event(event);
        }
    }
}
