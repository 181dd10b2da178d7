//! Page size configuration.
//!
//! # Environment Variables
//!
//! | Variable                 | Default | Description                              |
//! |--------------------------|---------|------------------------------------------|
//! | `MIK_PAGE_DEFAULT_LIMIT` | 20      | Page size when neither `first` nor `last` is given |
//! | `MIK_PAGE_MAX_LIMIT`     | 100     | Largest accepted `first` / `last`        |
//!
//! Values are read once, on first use of [`PageConfig::global`], and cached
//! for the lifetime of the process. Unparseable or zero values fall back to
//! the defaults.
//!
//! ## Example
//!
//! ```bash
//! # Smaller default pages, allow up to 500 rows per request
//! MIK_PAGE_DEFAULT_LIMIT=10
//! MIK_PAGE_MAX_LIMIT=500
//! ```

use std::sync::OnceLock;

/// Default page size when the request does not specify one.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Default upper bound for `first` / `last`.
pub const DEFAULT_MAX_PAGE_LIMIT: u32 = 100;

const ENV_DEFAULT_LIMIT: &str = "MIK_PAGE_DEFAULT_LIMIT";
const ENV_MAX_LIMIT: &str = "MIK_PAGE_MAX_LIMIT";

static GLOBAL: OnceLock<PageConfig> = OnceLock::new();

/// Page size limits applied by the pagination engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct PageConfig {
    /// Page size used when neither `first` nor `last` is set.
    pub default_limit: u32,
    /// Largest accepted `first` / `last`.
    pub max_limit: u32,
}

impl PageConfig {
    /// Create a config. `default_limit` is clamped to `max_limit`.
    #[must_use]
    pub const fn new(default_limit: u32, max_limit: u32) -> Self {
        let default_limit = if default_limit > max_limit {
            max_limit
        } else {
            default_limit
        };
        Self {
            default_limit,
            max_limit,
        }
    }

    /// Set the default page size (clamped to the maximum).
    #[must_use]
    pub const fn with_default_limit(self, default_limit: u32) -> Self {
        Self::new(default_limit, self.max_limit)
    }

    /// Set the maximum page size (the default is clamped to it).
    #[must_use]
    pub const fn with_max_limit(self, max_limit: u32) -> Self {
        Self::new(self.default_limit, max_limit)
    }

    /// Build a config from the process environment.
    ///
    /// Not cached; see [`global`](Self::global) for the cached instance.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str, default: u32| {
            lookup(name)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };
        Self::new(
            read(ENV_DEFAULT_LIMIT, DEFAULT_PAGE_LIMIT),
            read(ENV_MAX_LIMIT, DEFAULT_MAX_PAGE_LIMIT),
        )
    }

    /// The process-wide config, read from the environment on first call.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| {
            let config = Self::from_env();
            tracing::debug!(
                default_limit = config.default_limit,
                max_limit = config.max_limit,
                "loaded page config"
            );
            config
        })
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT, DEFAULT_MAX_PAGE_LIMIT)
    }
}
