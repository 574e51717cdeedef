use std::path::PathBuf;
use std::sync::OnceLock;

// Where pomotracker reads config.toml and writes its logs. Counts live on
// the backend, so nothing else is kept on disk.

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();
static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Root data directory: $XDG_DATA_HOME/pomotracker
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pomotracker")
    })
}

/// Root config directory: $XDG_CONFIG_HOME/pomotracker
pub fn config_dir() -> &'static PathBuf {
    CONFIG_DIR.get_or_init(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pomotracker")
    })
}

/// Config file path: <config_dir>/config.toml
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Log directory: <data_dir>/logs
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_ends_with_app_name() {
        assert!(data_dir().ends_with("pomotracker"));
    }

    #[test]
    fn config_dir_ends_with_app_name() {
        assert!(config_dir().ends_with("pomotracker"));
    }

    #[test]
    fn config_file_structure() {
        assert!(config_file().ends_with("pomotracker/config.toml"));
    }

    #[test]
    fn logs_live_under_data_dir() {
        let logs = logs_dir();
        assert!(logs.starts_with(data_dir()));
        assert!(logs.ends_with("logs"));
    }
}
