use std::path::PathBuf;

use thiserror::Error;

pub type GanttResult<T> = Result<T, GanttError>;

#[derive(Debug, Error)]
pub enum GanttError {
    #[error("unknown view mode '{0}'")]
    UnknownViewMode(String),

    #[error("unknown locale '{0}'")]
    UnknownLocale(String),

    #[error("invalid color '{0}': expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
