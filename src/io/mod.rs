pub mod file;

pub use file::{default_config_path, load_config, load_config_or_default, load_tasks, save_tasks};
