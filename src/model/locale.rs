//! Locale tables: labels and header date patterns for the five supported
//! locales.
//!
//! Patterns are chrono `strftime` strings with two extra placeholders
//! expanded before formatting: `{weekday}` (the locale's short weekday name)
//! and `{week}` (the week-of-year number under the locale's week start).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use super::timeline::ViewMode;
use crate::error::GanttError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ko,
    Ja,
    Zh,
    Es,
}

/// One string per view mode.
#[derive(Debug, Clone, Copy)]
pub struct ModeStrings {
    pub month: &'static str,
    pub week: &'static str,
    pub day: &'static str,
    pub hour: &'static str,
}

impl ModeStrings {
    pub fn get(&self, mode: ViewMode) -> &'static str {
        match mode {
            ViewMode::Month => self.month,
            ViewMode::Week => self.week,
            ViewMode::Day => self.day,
            ViewMode::Hour => self.hour,
        }
    }
}

#[derive(Debug)]
pub struct LocaleResources {
    pub search_placeholder: &'static str,
    pub search_field: &'static str,
    pub view_mode: ModeStrings,
    pub year: &'static str,
    pub today: &'static str,
    pub header_format: ModeStrings,
    pub header_sub_format: ModeStrings,
    /// Short weekday names, Sunday first.
    pub weekdays: [&'static str; 7],
    pub week_start: Weekday,
}

static EN: LocaleResources = LocaleResources {
    search_placeholder: "Enter search term",
    search_field: "Search field",
    view_mode: ModeStrings {
        month: "Month",
        week: "Week",
        day: "Day",
        hour: "Hour",
    },
    year: "Year",
    today: "Today",
    header_format: ModeStrings {
        month: "%Y",
        week: "{week} week",
        day: "%-m/%-d",
        hour: "%-m/%-d",
    },
    header_sub_format: ModeStrings {
        month: "%-m month",
        week: "%-m/%-d",
        day: "{weekday}",
        hour: "%H:%M",
    },
    weekdays: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
    week_start: Weekday::Sun,
};

static KO: LocaleResources = LocaleResources {
    search_placeholder: "검색어를 입력하세요",
    search_field: "검색 필드",
    view_mode: ModeStrings {
        month: "월",
        week: "주",
        day: "일",
        hour: "시간",
    },
    year: "년",
    today: "오늘",
    header_format: ModeStrings {
        month: "%Y",
        week: "{week} 주",
        day: "%-m/%-d",
        hour: "%-m/%-d",
    },
    header_sub_format: ModeStrings {
        month: "%-m 월",
        week: "%-m/%-d",
        day: "{weekday}",
        hour: "%H:%M",
    },
    weekdays: ["일", "월", "화", "수", "목", "금", "토"],
    week_start: Weekday::Sun,
};

static JA: LocaleResources = LocaleResources {
    search_placeholder: "検索語を入力してください",
    search_field: "検索フィールド",
    view_mode: ModeStrings {
        month: "月",
        week: "週",
        day: "日",
        hour: "時間",
    },
    year: "年",
    today: "今日",
    header_format: ModeStrings {
        month: "%Y",
        week: "{week} 週",
        day: "%-m/%-d",
        hour: "%-m/%-d",
    },
    header_sub_format: ModeStrings {
        month: "%-m 月",
        week: "%-m/%-d",
        day: "{weekday}",
        hour: "%H:%M",
    },
    weekdays: ["日", "月", "火", "水", "木", "金", "土"],
    week_start: Weekday::Sun,
};

static ZH: LocaleResources = LocaleResources {
    search_placeholder: "请输入搜索词",
    search_field: "搜索字段",
    view_mode: ModeStrings {
        month: "月",
        week: "周",
        day: "日",
        hour: "小时",
    },
    year: "年",
    today: "今天",
    header_format: ModeStrings {
        month: "%Y",
        week: "{week} 周",
        day: "%-m/%-d",
        hour: "%-m/%-d",
    },
    header_sub_format: ModeStrings {
        month: "%-m 月",
        week: "%-m/%-d",
        day: "{weekday}",
        hour: "%H:%M",
    },
    weekdays: ["周日", "周一", "周二", "周三", "周四", "周五", "周六"],
    week_start: Weekday::Mon,
};

static ES: LocaleResources = LocaleResources {
    search_placeholder: "Ingrese término de búsqueda",
    search_field: "Campo de búsqueda",
    view_mode: ModeStrings {
        month: "Mes",
        week: "Semana",
        day: "Día",
        hour: "Hora",
    },
    year: "Año",
    today: "Hoy",
    header_format: ModeStrings {
        month: "%Y",
        week: "{week} semana",
        day: "%-m/%-d",
        hour: "%H:%M",
    },
    header_sub_format: ModeStrings {
        month: "%-m mes",
        week: "%-m/%-d",
        day: "{weekday}",
        hour: "%H:%M",
    },
    weekdays: ["dom", "lun", "mar", "mié", "jue", "vie", "sáb"],
    week_start: Weekday::Mon,
};

impl Locale {
    pub const ALL: [Locale; 5] = [Locale::En, Locale::Ko, Locale::Ja, Locale::Zh, Locale::Es];

    pub fn resources(self) -> &'static LocaleResources {
        match self {
            Locale::En => &EN,
            Locale::Ko => &KO,
            Locale::Ja => &JA,
            Locale::Zh => &ZH,
            Locale::Es => &ES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ko => "ko",
            Locale::Ja => "ja",
            Locale::Zh => "zh",
            Locale::Es => "es",
        }
    }

    pub fn week_start(self) -> Weekday {
        self.resources().week_start
    }

    pub fn weekday_name(self, day: Weekday) -> &'static str {
        self.resources().weekdays[day.num_days_from_sunday() as usize]
    }

    /// Week-of-year of `date`: the week containing January 1st is week 1,
    /// and a week belongs to the year its last day falls in.
    pub fn week_of_year(self, date: NaiveDate) -> u32 {
        let week_start = week_start_of(date, self.week_start());
        let owning_year = (week_start + Duration::days(6)).year();
        let Some(jan_first) = NaiveDate::from_ymd_opt(owning_year, 1, 1) else {
            return 1;
        };
        let first_week = week_start_of(jan_first, self.week_start());
        ((week_start - first_week).num_days() / 7 + 1) as u32
    }

    /// Formats `date` with a locale pattern.
    pub fn format(self, date: NaiveDateTime, pattern: &str) -> String {
        let mut expanded = pattern.to_string();
        if expanded.contains("{weekday}") {
            expanded = expanded.replace("{weekday}", self.weekday_name(date.weekday()));
        }
        if expanded.contains("{week}") {
            expanded = expanded.replace("{week}", &self.week_of_year(date.date()).to_string());
        }
        date.format(&expanded).to_string()
    }
}

fn week_start_of(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (date.weekday().num_days_from_sunday() + 7 - week_start.num_days_from_sunday()) % 7;
    date - Duration::days(offset as i64)
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = GanttError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ko" => Ok(Locale::Ko),
            "ja" => Ok(Locale::Ja),
            "zh" => Ok(Locale::Zh),
            "es" => Ok(Locale::Es),
            other => Err(GanttError::UnknownLocale(other.to_string())),
        }
    }
}
