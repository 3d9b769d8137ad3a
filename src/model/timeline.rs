use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::locale::Locale;
use crate::error::GanttError;

/// Keeps `floor` stable when a ratio lands a hair below a snap boundary.
const SNAP_EPSILON: f64 = 1e-6;

/// Controls the time granularity of one axis tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

impl ViewMode {
    /// Picker order.
    pub const ALL: [ViewMode; 4] = [ViewMode::Month, ViewMode::Week, ViewMode::Day, ViewMode::Hour];

    /// Pixel width of one tick. The mode alone decides it.
    pub fn tick_width(self) -> f32 {
        match self {
            ViewMode::Hour => 80.0,
            ViewMode::Day => 40.0,
            ViewMode::Week => 100.0,
            ViewMode::Month => 120.0,
        }
    }

    /// Seconds a dragged date snaps to.
    fn snap_seconds(self) -> i64 {
        match self {
            ViewMode::Hour | ViewMode::Day => 60,
            ViewMode::Week => 3_600,
            ViewMode::Month => 86_400,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Hour => "hour",
            ViewMode::Day => "day",
            ViewMode::Week => "week",
            ViewMode::Month => "month",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = GanttError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hour" => Ok(ViewMode::Hour),
            "day" => Ok(ViewMode::Day),
            "week" => Ok(ViewMode::Week),
            "month" => Ok(ViewMode::Month),
            other => Err(GanttError::UnknownViewMode(other.to_string())),
        }
    }
}

/// Calendar bucketing rules for one view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeScale {
    pub mode: ViewMode,
    pub week_start: Weekday,
}

impl TimeScale {
    pub fn new(mode: ViewMode, week_start: Weekday) -> Self {
        Self { mode, week_start }
    }

    /// Start of the period (hour, day, week or month) containing `date`.
    pub fn period_start(&self, date: NaiveDateTime) -> NaiveDateTime {
        let day = date.date();
        match self.mode {
            ViewMode::Hour => {
                day.and_time(NaiveTime::from_hms_opt(date.hour(), 0, 0).unwrap_or(NaiveTime::MIN))
            }
            ViewMode::Day => day.and_time(NaiveTime::MIN),
            ViewMode::Week => {
                let offset = (day.weekday().num_days_from_sunday() + 7
                    - self.week_start.num_days_from_sunday())
                    % 7;
                (day - Duration::days(offset as i64)).and_time(NaiveTime::MIN)
            }
            ViewMode::Month => day.with_day(1).unwrap_or(day).and_time(NaiveTime::MIN),
        }
    }

    /// Moves a period start by `periods` whole periods.
    pub fn advance(&self, period_start: NaiveDateTime, periods: i64) -> Option<NaiveDateTime> {
        match self.mode {
            ViewMode::Hour => period_start.checked_add_signed(Duration::hours(periods)),
            ViewMode::Day => period_start.checked_add_signed(Duration::days(periods)),
            ViewMode::Week => period_start.checked_add_signed(Duration::days(periods * 7)),
            ViewMode::Month => {
                let months = Months::new(u32::try_from(periods.unsigned_abs()).ok()?);
                if periods >= 0 {
                    period_start.checked_add_months(months)
                } else {
                    period_start.checked_sub_months(months)
                }
            }
        }
    }

    /// Length in seconds of the period starting at `period_start`.
    pub fn period_seconds(&self, period_start: NaiveDateTime) -> i64 {
        match self.advance(period_start, 1) {
            Some(next) => (next - period_start).num_seconds(),
            None => match self.mode {
                ViewMode::Hour => 3_600,
                ViewMode::Day => 86_400,
                ViewMode::Week => 7 * 86_400,
                ViewMode::Month => 30 * 86_400,
            },
        }
    }

    /// True when `date` falls inside the period that starts at `period_start`.
    pub fn contains(&self, period_start: NaiveDateTime, date: NaiveDateTime) -> bool {
        date >= period_start && self.advance(period_start, 1).map_or(true, |next| date < next)
    }

    /// Fractional position of `date` inside its own period, in `[0, 1)`.
    pub fn ratio_within_tick(&self, date: NaiveDateTime) -> f64 {
        let start = self.period_start(date);
        let elapsed = (date - start).num_milliseconds() as f64;
        let length = (self.period_seconds(start) * 1_000) as f64;
        elapsed / length
    }

    /// Inverse of [`ratio_within_tick`](Self::ratio_within_tick), anchored at
    /// the period containing `base`.
    ///
    /// The integer part of `ratio` advances whole calendar periods; the
    /// fraction is scaled by the length of the period it lands in, so a
    /// month-mode drag never spills into the following month. The result
    /// snaps to the mode's grain (minute, minute, hour, day) and keeps the
    /// sub-grain components of `base`.
    pub fn date_from_ratio(&self, ratio: f64, base: NaiveDateTime) -> NaiveDateTime {
        let anchor = self.period_start(base);
        let whole = ratio.floor();
        let fraction = ratio - whole;
        let Some(target) = self.advance(anchor, whole as i64) else {
            return base;
        };

        let grain = self.mode.snap_seconds();
        let offset = fraction * self.period_seconds(target) as f64;
        let snapped = ((offset / grain as f64) + SNAP_EPSILON).floor() as i64 * grain;
        let remainder = i64::from(base.num_seconds_from_midnight()) % grain;

        target
            .checked_add_signed(
                Duration::seconds(snapped + remainder)
                    + Duration::nanoseconds(i64::from(base.nanosecond())),
            )
            .unwrap_or(target)
    }
}

/// Where a date sits relative to an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPosition {
    Before,
    At(usize),
    After,
}

/// Ticks and header formats for one view mode over one calendar year.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    pub scale: TimeScale,
    pub year: i32,
    pub locale: Locale,
    pub tick_width: f32,
    pub header_format: &'static str,
    pub header_sub_format: &'static str,
    pub ticks: Vec<NaiveDateTime>,
}

impl TimeAxis {
    /// Builds the axis for `year`: one tick per hour, day, week or month
    /// covering January 1st 00:00 through December 31st 23:59:59.
    pub fn compute(mode: ViewMode, year: i32, locale: Locale) -> Self {
        let scale = TimeScale::new(mode, locale.week_start());
        let resources = locale.resources();
        let mut axis = Self {
            scale,
            year,
            locale,
            tick_width: mode.tick_width(),
            header_format: resources.header_format.get(mode),
            header_sub_format: resources.header_sub_format.get(mode),
            ticks: Vec::new(),
        };

        let (Some(first_day), Some(last_day)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) else {
            warn!(year, "year outside the supported calendar range");
            return axis;
        };
        let last_instant = last_day.and_time(NaiveTime::MIN) + Duration::seconds(86_399);

        let mut tick = scale.period_start(first_day.and_time(NaiveTime::MIN));
        while tick <= last_instant {
            axis.ticks.push(tick);
            match scale.advance(tick, 1) {
                Some(next) => tick = next,
                None => break,
            }
        }
        axis
    }

    /// Builds an axis from a view-mode name. Unknown names fall back to the
    /// day-mode width and formats with no ticks.
    pub fn from_mode_name(name: &str, year: i32, locale: Locale) -> Self {
        match name.parse::<ViewMode>() {
            Ok(mode) => Self::compute(mode, year, locale),
            Err(err) => {
                warn!(%err, "rendering an empty timeline");
                let day = locale.resources();
                Self {
                    scale: TimeScale::new(ViewMode::Day, locale.week_start()),
                    year,
                    locale,
                    tick_width: ViewMode::Day.tick_width(),
                    header_format: day.header_format.day,
                    header_sub_format: day.header_sub_format.day,
                    ticks: Vec::new(),
                }
            }
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.scale.mode
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.ticks.len().checked_sub(1)
    }

    pub fn total_width(&self) -> f32 {
        self.ticks.len() as f32 * self.tick_width
    }

    pub fn tick_x(&self, index: usize) -> f32 {
        index as f32 * self.tick_width
    }

    /// Index of the tick holding `date`, or `None` when it is off-axis.
    ///
    /// Hour and day ticks match on the period start; week and month ticks
    /// match when the date lies inside the tick's period.
    pub fn index_of(&self, date: NaiveDateTime) -> Option<usize> {
        let candidate = self.ticks.partition_point(|tick| *tick <= date).checked_sub(1)?;
        let tick = self.ticks[candidate];
        let matched = match self.scale.mode {
            ViewMode::Hour | ViewMode::Day => self.scale.period_start(date) == tick,
            ViewMode::Week | ViewMode::Month => self.scale.contains(tick, date),
        };
        matched.then_some(candidate)
    }

    pub fn locate(&self, date: NaiveDateTime) -> AxisPosition {
        if let Some(index) = self.index_of(date) {
            return AxisPosition::At(index);
        }
        match self.ticks.first() {
            Some(first) if date >= *first => AxisPosition::After,
            _ => AxisPosition::Before,
        }
    }

    pub fn ratio_within_tick(&self, date: NaiveDateTime) -> f64 {
        self.scale.ratio_within_tick(date)
    }

    pub fn date_from_ratio(&self, ratio: f64, base: NaiveDateTime) -> NaiveDateTime {
        self.scale.date_from_ratio(ratio, base)
    }

    /// Pixel x of `date` when it lies on the axis.
    pub fn x_of(&self, date: NaiveDateTime) -> Option<f32> {
        let index = self.index_of(date)?;
        Some((index as f64 + self.ratio_within_tick(date)) as f32 * self.tick_width)
    }

    /// Top and bottom header labels for a tick.
    pub fn labels(&self, tick: NaiveDateTime) -> (String, String) {
        (
            self.locale.format(tick, self.header_format),
            self.locale.format(tick, self.header_sub_format),
        )
    }
}
