use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{GanttError, GanttResult};
use crate::model::{GanttConfig, Task};

fn read(path: &Path) -> GanttResult<String> {
    std::fs::read_to_string(path).map_err(|source| GanttError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Location of `config.json` in the OS config directory.
pub fn default_config_path() -> PathBuf {
    match directories::ProjectDirs::from("", "", "GanttTimeline") {
        Some(dirs) => dirs.config_dir().join("config.json"),
        None => PathBuf::from("config.json"),
    }
}

/// Load chart defaults from a JSON file.
pub fn load_config(path: &Path) -> GanttResult<GanttConfig> {
    GanttConfig::from_json_str(&read(path)?)
}

/// Load `path` (or the default location). A missing file gives defaults;
/// a malformed one is logged and also gives defaults.
pub fn load_config_or_default(path: Option<&Path>) -> GanttConfig {
    let path = path.map_or_else(default_config_path, Path::to_path_buf);
    if !path.exists() {
        info!(path = %path.display(), "no config file, using defaults");
        return GanttConfig::default();
    }
    load_config(&path).unwrap_or_else(|err| {
        warn!(%err, "ignoring config file");
        GanttConfig::default()
    })
}

/// Load a task tree from a JSON array.
pub fn load_tasks(path: &Path) -> GanttResult<Vec<Task>> {
    Ok(serde_json::from_str(&read(path)?)?)
}

/// Save a task tree as pretty JSON.
pub fn save_tasks(tasks: &[Task], path: &Path) -> GanttResult<()> {
    let json = serde_json::to_string_pretty(tasks)?;
    std::fs::write(path, json).map_err(|source| GanttError::Io {
        path: path.to_path_buf(),
        source,
    })
}
