//! Virtualization window: which ticks are materialized this frame.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::model::TimeAxis;

/// Ticks kept alive on each side of the viewport.
pub const BUFFER_TICKS: usize = 5;

/// Inclusive tick index range, always inside the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Window for a scroll position, buffer included.
    pub fn for_scroll(offset: f32, viewport_width: f32, tick_width: f32, last_index: usize) -> Self {
        let first_visible = (offset.max(0.0) / tick_width).floor() as usize;
        let last_visible = ((offset.max(0.0) + viewport_width.max(0.0)) / tick_width).ceil() as usize;
        let end = last_visible.saturating_add(BUFFER_TICKS).min(last_index);
        let start = first_visible.saturating_sub(BUFFER_TICKS).min(end);
        Self { start, end }
    }
}

/// A programmatic horizontal scroll the presentation layer should perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub offset: f32,
    pub smooth: bool,
}

#[derive(Debug, Default)]
pub struct WindowController {
    range: Option<VisibleRange>,
    last_scroll: Option<(f32, f32)>,
    pending_scroll: Option<ScrollRequest>,
}

impl WindowController {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first scroll or centering, and for empty axes.
    pub fn range(&self) -> Option<VisibleRange> {
        self.range
    }

    /// Recomputes the window from the scroll offset. Returns `true` when the
    /// window moved; identical offsets are ignored.
    pub fn on_scroll(&mut self, offset: f32, viewport_width: f32, axis: &TimeAxis) -> bool {
        if self.range.is_some() && self.last_scroll == Some((offset, viewport_width)) {
            return false;
        }
        self.last_scroll = Some((offset, viewport_width));
        let next = axis
            .last_index()
            .map(|last| VisibleRange::for_scroll(offset, viewport_width, axis.tick_width, last));
        let changed = next != self.range;
        self.range = next;
        changed
    }

    /// Centers a viewport-sized window on the tick holding `date` and queues
    /// a smooth scroll to it. Off-axis dates leave the window unchanged.
    pub fn center_on(
        &mut self,
        date: NaiveDateTime,
        viewport_width: f32,
        axis: &TimeAxis,
    ) -> Option<ScrollRequest> {
        let (Some(index), Some(last)) = (axis.index_of(date), axis.last_index()) else {
            debug!(%date, "centering target is off-axis");
            return None;
        };
        let count = ((viewport_width / axis.tick_width).ceil() as usize).max(1);
        let start = index.saturating_sub(count / 2);
        let end = (start + count - 1).min(last);
        let start = start.min(end);

        self.range = Some(VisibleRange { start, end });
        // The next scroll event rebuilds the buffered window.
        self.last_scroll = None;
        let request = ScrollRequest {
            offset: axis.tick_x(start),
            smooth: true,
        };
        self.pending_scroll = Some(request);
        Some(request)
    }

    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.pending_scroll.take()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Materialized ticks with their axis index.
    pub fn visible_ticks<'a>(
        &self,
        axis: &'a TimeAxis,
    ) -> impl Iterator<Item = (usize, NaiveDateTime)> + 'a {
        let (start, end) = match self.range {
            Some(range) if range.end < axis.len() => (range.start, range.end + 1),
            _ => (0, 0),
        };
        axis.ticks[start..end]
            .iter()
            .enumerate()
            .map(move |(offset, tick)| (start + offset, *tick))
    }
}
