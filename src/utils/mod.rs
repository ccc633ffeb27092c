//! JSON persistence, environment overrides and timing

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Serialize};

use crate::{HgnnError, Result};

/// Save object to a pretty-printed JSON file
pub fn save_json<T: Serialize>(obj: &T, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(obj)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load object from a JSON file
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Non-empty value of an environment variable
pub fn env_str(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, `None` when it is unset.
///
/// A set but unparsable value is a configuration error rather than being ignored.
pub fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_str(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| HgnnError::Config(format!("{}={}: {}", key, raw, e))),
    }
}

/// Boolean environment flag accepting 1/0, true/false, yes/no, on/off
pub fn env_bool(key: &str) -> Result<Option<bool>> {
    match env_str(key) {
        None => Ok(None),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(HgnnError::Config(format!("{}={}: expected a boolean", key, raw))),
        },
    }
}

/// Timing utilities
pub mod timing {
    use std::time::{Duration, Instant};
    use tracing::debug;

    /// Wall-clock timer that logs its lifetime on drop
    pub struct Timer {
        start: Instant,
        name: String,
    }

    impl Timer {
        /// Start new timer
        pub fn new(name: &str) -> Self {
            Timer {
                start: Instant::now(),
                name: name.to_string(),
            }
        }

        /// Elapsed time since start
        pub fn elapsed(&self) -> Duration {
            self.start.elapsed()
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            debug!(timer = %self.name, seconds = self.elapsed().as_secs_f32(), "Timer finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_json_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut obj = BTreeMap::new();
        obj.insert("hidden".to_string(), 64usize);

        save_json(&obj, &path).unwrap();
        let loaded: BTreeMap<String, usize> = load_json(&path).unwrap();
        assert_eq!(loaded, obj);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result: Result<Vec<u8>> = load_json(dir.path().join("absent.json"));
        assert!(matches!(result, Err(HgnnError::Io(_))));
    }

    #[test]
    fn test_env_helpers() {
        std::env::set_var("HGNN_UTILS_TEST_NUM", "12");
        std::env::set_var("HGNN_UTILS_TEST_BAD", "twelve");
        std::env::set_var("HGNN_UTILS_TEST_FLAG", "Yes");

        assert_eq!(env_parse::<usize>("HGNN_UTILS_TEST_NUM").unwrap(), Some(12));
        assert!(env_parse::<usize>("HGNN_UTILS_TEST_BAD").is_err());
        assert_eq!(env_parse::<usize>("HGNN_UTILS_TEST_UNSET").unwrap(), None);
        assert_eq!(env_bool("HGNN_UTILS_TEST_FLAG").unwrap(), Some(true));
    }

    #[test]
    fn test_timer_elapsed() {
        let timer = timing::Timer::new("noop");
        assert!(timer.elapsed().as_secs() < 5);
    }
}
