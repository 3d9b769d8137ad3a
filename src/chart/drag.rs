//! Move/resize state machine for task bars.
//!
//! One session at a time: `Idle -> Dragging -> Idle` or
//! `Idle -> Resizing(edge) -> Idle`. A resize grabbed while a move is in
//! flight takes over the session. Pointer positions are absolute x values;
//! every candidate date is computed from the pre-drag snapshot, never
//! incrementally.

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, trace};

use crate::model::{FlatTask, TaskId, TimeAxis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging,
    Resizing(ResizeEdge),
}

/// Task as it was when the pointer went down.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSnapshot {
    pub task: FlatTask,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub pointer_x: f32,
}

/// Live preview emitted while the pointer moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedUpdate {
    pub id: TaskId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Final value emitted once on release.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedUpdate {
    pub new: FlatTask,
    pub old: FlatTask,
}

#[derive(Debug, Clone)]
struct Session {
    snapshot: DragSnapshot,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    session: Option<Session>,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
            session: None,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != DragState::Idle
    }

    pub fn active_task(&self) -> Option<&TaskId> {
        self.session.as_ref().map(|s| &s.snapshot.task.id)
    }

    pub fn snapshot(&self) -> Option<&DragSnapshot> {
        self.session.as_ref().map(|s| &s.snapshot)
    }

    /// Dates the active session currently proposes.
    pub fn current(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.session.as_ref().map(|s| (s.start, s.end))
    }

    /// Starts moving `task`. Ignored while another session is active.
    pub fn begin_move(&mut self, task: &FlatTask, pointer_x: f32) -> bool {
        if self.is_active() {
            return false;
        }
        self.start_session(DragState::Dragging, task, pointer_x);
        true
    }

    /// Starts resizing one edge of `task`. Replaces a move in progress.
    pub fn begin_resize(&mut self, task: &FlatTask, edge: ResizeEdge, pointer_x: f32) -> bool {
        if matches!(self.state, DragState::Resizing(_)) {
            return false;
        }
        self.start_session(DragState::Resizing(edge), task, pointer_x);
        true
    }

    fn start_session(&mut self, state: DragState, task: &FlatTask, pointer_x: f32) {
        debug!(task = %task.id, ?state, "drag session started");
        self.state = state;
        self.session = Some(Session {
            snapshot: DragSnapshot {
                task: task.clone(),
                start: task.start_date,
                end: task.end_date,
                pointer_x,
            },
            start: task.start_date,
            end: task.end_date,
        });
    }

    /// Converts the pointer position into new dates. Returns the proposal
    /// when the dates changed; rejected or stale moves return `None`.
    pub fn pointer_move(&mut self, pointer_x: f32, axis: &TimeAxis) -> Option<ProposedUpdate> {
        let state = self.state;
        let session = self.session.as_mut()?;
        let snapshot = &session.snapshot;
        let delta = f64::from(pointer_x - snapshot.pointer_x) / f64::from(axis.tick_width);
        let shifted = |date: NaiveDateTime| axis.date_from_ratio(axis.ratio_within_tick(date) + delta, date);

        let (start, end) = match state {
            DragState::Idle => return None,
            DragState::Dragging => {
                let duration = (snapshot.end - snapshot.start).max(Duration::zero());
                let start = shifted(snapshot.start);
                (start, start.checked_add_signed(duration).unwrap_or(start))
            }
            DragState::Resizing(ResizeEdge::Start) => {
                let start = shifted(snapshot.start);
                if start >= session.end {
                    trace!(%start, "resize start rejected");
                    return None;
                }
                (start, session.end)
            }
            DragState::Resizing(ResizeEdge::End) => {
                let end = shifted(snapshot.end);
                if end <= session.start {
                    trace!(%end, "resize end rejected");
                    return None;
                }
                (session.start, end)
            }
        };

        if (start, end) == (session.start, session.end) {
            return None;
        }
        session.start = start;
        session.end = end;
        Some(ProposedUpdate {
            id: session.snapshot.task.id.clone(),
            start,
            end,
        })
    }

    /// Ends the session. Commits only when the dates differ from the snapshot.
    pub fn release(&mut self) -> Option<CommittedUpdate> {
        self.state = DragState::Idle;
        let session = self.session.take()?;
        let snapshot = session.snapshot;
        if (session.start, session.end) == (snapshot.start, snapshot.end) {
            return None;
        }
        debug!(task = %snapshot.task.id, start = %session.start, end = %session.end, "drag committed");
        Some(CommittedUpdate {
            new: snapshot.task.with_dates(session.start, session.end),
            old: snapshot.task,
        })
    }
}
