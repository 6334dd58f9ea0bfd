#![forbid(unsafe_code)]

//! List configuration with environment overrides.
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `RECYCLIST_CAPACITY` | [`ListConfig::capacity`] | 30 |
//! | `RECYCLIST_THRESHOLD_PX` | [`ListConfig::threshold`] | 3 |
//! | `RECYCLIST_PAGE_SIZE` | [`ListConfig::page_size`] | 10 |
//! | `RECYCLIST_QUIESCENCE_MS` | [`ListConfig::quiescence`] | 200 |
//!
//! Unparseable or out-of-range values are ignored and the default is kept.

use std::time::Duration;

use recyclist_core::debounce::DEFAULT_QUIESCENCE;
use recyclist_core::warn;

const ENV_CAPACITY: &str = "RECYCLIST_CAPACITY";
const ENV_THRESHOLD: &str = "RECYCLIST_THRESHOLD_PX";
const ENV_PAGE_SIZE: &str = "RECYCLIST_PAGE_SIZE";
const ENV_QUIESCENCE: &str = "RECYCLIST_QUIESCENCE_MS";

pub const DEFAULT_CAPACITY: usize = 30;
pub const DEFAULT_THRESHOLD: f64 = 3.0;
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ListConfig {
    /// Maximum number of render nodes. Always at least 1.
    pub capacity: usize,
    /// Pixel tolerance before an edge counts as reached.
    pub threshold: f64,
    /// Records requested per page.
    pub page_size: usize,
    /// Quiet period for viewport-change signals.
    pub quiescence: Duration,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            threshold: DEFAULT_THRESHOLD,
            page_size: DEFAULT_PAGE_SIZE,
            quiescence: DEFAULT_QUIESCENCE,
        }
    }
}

impl ListConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(capacity) = parse_env(&get_env, ENV_CAPACITY, |v: &usize| *v > 0) {
            config.capacity = capacity;
        }
        if let Some(threshold) =
            parse_env(&get_env, ENV_THRESHOLD, |v: &f64| v.is_finite() && *v >= 0.0)
        {
            config.threshold = threshold;
        }
        if let Some(page_size) = parse_env(&get_env, ENV_PAGE_SIZE, |v: &usize| *v > 0) {
            config.page_size = page_size;
        }
        if let Some(ms) = parse_env(&get_env, ENV_QUIESCENCE, |_: &u64| true) {
            config.quiescence = Duration::from_millis(ms);
        }
        config
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Negative or non-finite thresholds fall back to zero.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = if threshold.is_finite() {
            threshold.max(0.0)
        } else {
            0.0
        };
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub fn with_quiescence(mut self, quiescence: Duration) -> Self {
        self.quiescence = quiescence;
        self
    }
}

fn parse_env<T, F, V>(get_env: &F, key: &str, valid: V) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
    V: Fn(&T) -> bool,
{
    let raw = get_env(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => Some(value),
        _ => {
            warn!(key, value = %raw, "ignoring invalid configuration override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ListConfig::default();
        assert_eq!(config.capacity, 30);
        assert_eq!(config.threshold, 3.0);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.quiescence, Duration::from_millis(200));
    }

    #[test]
    fn env_overrides_apply() {
        let config = ListConfig::from_env_with(env(&[
            (ENV_CAPACITY, "12"),
            (ENV_THRESHOLD, " 1.5 "),
            (ENV_PAGE_SIZE, "25"),
            (ENV_QUIESCENCE, "50"),
        ]));
        assert_eq!(config.capacity, 12);
        assert_eq!(config.threshold, 1.5);
        assert_eq!(config.page_size, 25);
        assert_eq!(config.quiescence, Duration::from_millis(50));
    }

    #[test]
    fn invalid_env_values_keep_defaults() {
        let config = ListConfig::from_env_with(env(&[
            (ENV_CAPACITY, "0"),
            (ENV_THRESHOLD, "-4"),
            (ENV_PAGE_SIZE, "ten"),
            (ENV_QUIESCENCE, "soon"),
        ]));
        assert_eq!(config, ListConfig::default());
    }

    #[test]
    fn builders_clamp() {
        let config = ListConfig::new()
            .with_capacity(0)
            .with_threshold(f64::NAN)
            .with_page_size(0)
            .with_quiescence(Duration::ZERO);
        assert_eq!(config.capacity, 1);
        assert_eq!(config.threshold, 0.0);
        assert_eq!(config.page_size, 1);
        assert_eq!(config.quiescence, Duration::ZERO);
        assert_eq!(ListConfig::new().with_threshold(-2.0).threshold, 0.0);
    }
}
