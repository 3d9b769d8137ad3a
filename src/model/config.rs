use serde::{Deserialize, Serialize};

use super::locale::Locale;
use super::timeline::ViewMode;
use crate::error::GanttResult;

/// Host-supplied defaults for one chart instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GanttConfig {
    #[serde(deserialize_with = "lenient::view_mode")]
    pub view_mode: ViewMode,
    #[serde(deserialize_with = "lenient::locale")]
    pub locale: Locale,
    pub row_height: f32,
    pub task_bar_height: f32,
    pub default_grid_section_width: f32,
    /// Start with every task expanded.
    pub default_expanded: bool,
    pub min_grid_section_width: f32,
}

impl Default for GanttConfig {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Day,
            locale: Locale::En,
            row_height: 50.0,
            task_bar_height: 30.0,
            default_grid_section_width: 500.0,
            default_expanded: false,
            min_grid_section_width: 200.0,
        }
    }
}

impl GanttConfig {
    pub fn from_json_str(json: &str) -> GanttResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Unknown names fall back to the default with a warning instead of failing
/// the whole config.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use tracing::warn;

    use super::{Locale, ViewMode};

    pub fn view_mode<'de, D>(deserializer: D) -> Result<ViewMode, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(name.parse().unwrap_or_else(|err| {
            warn!(%err, "falling back to day view");
            ViewMode::Day
        }))
    }

    pub fn locale<'de, D>(deserializer: D) -> Result<Locale, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Ok(code.parse().unwrap_or_else(|err| {
            warn!(%err, "falling back to en");
            Locale::En
        }))
    }
}
