//! Pagination request parameters.

use serde::{Deserialize, Serialize};

use crate::config::PageConfig;
use crate::error::{ValidationError, Violation};

/// Which way a request pages through the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `first` / `after`: rows following the boundary.
    Forward,
    /// `last` / `before`: rows preceding the boundary.
    Backward,
}

/// Relay-style pagination parameters.
///
/// Deserializes from the camelCase wire shape; missing fields take their
/// defaults (`includeNodes` defaults to `true`, everything else to off).
///
/// ```
/// use mik_keyset::PageParams;
///
/// let params = PageParams::from_json(r#"{"first": 10, "after": "AQAAAA|AgAAAA"}"#).unwrap();
/// assert_eq!(params.first, Some(10));
/// assert!(params.include_nodes);
/// assert!(!params.include_edges);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct PageParams {
    /// Page size when paging forward.
    pub first: Option<u32>,
    /// Forward boundary cursor.
    pub after: Option<String>,
    /// Page size when paging backward.
    pub last: Option<u32>,
    /// Backward boundary cursor.
    pub before: Option<String>,
    /// Also count the whole collection.
    pub include_total: bool,
    /// Emit bare `nodes`.
    pub include_nodes: bool,
    /// Emit `edges` (cursor + node pairs).
    pub include_edges: bool,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            first: None,
            after: None,
            last: None,
            before: None,
            include_total: false,
            include_nodes: true,
            include_edges: false,
        }
    }
}

impl PageParams {
    /// Default parameters: first page, default size, nodes only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON wire shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set `first`.
    #[must_use]
    pub fn first(mut self, n: u32) -> Self {
        self.first = Some(n);
        self
    }

    /// Set `last`.
    #[must_use]
    pub fn last(mut self, n: u32) -> Self {
        self.last = Some(n);
        self
    }

    /// Set the `after` cursor.
    #[must_use]
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Set the `before` cursor.
    #[must_use]
    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    /// Request a total count.
    #[must_use]
    pub fn with_total(mut self, include: bool) -> Self {
        self.include_total = include;
        self
    }

    /// Emit `nodes`.
    #[must_use]
    pub fn with_nodes(mut self, include: bool) -> Self {
        self.include_nodes = include;
        self
    }

    /// Emit `edges`.
    #[must_use]
    pub fn with_edges(mut self, include: bool) -> Self {
        self.include_edges = include;
        self
    }

    /// The direction implied by the parameters (forward unless `last`/`before`).
    #[must_use]
    pub const fn direction(&self) -> Direction {
        if self.last.is_some() || self.before.is_some() {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }

    /// Check every constraint and resolve the request.
    ///
    /// All violations are collected before returning.
    pub fn validate(&self, config: &PageConfig) -> Result<ResolvedParams<'_>, ValidationError> {
        let mut violations = Vec::new();

        if self.first.is_some() && self.last.is_some() {
            violations.push(Violation::FirstWithLast);
        }
        if self.after.is_some() && self.before.is_some() {
            violations.push(Violation::AfterWithBefore);
        }
        if self.first.is_some() && self.before.is_some() {
            violations.push(Violation::FirstWithBefore);
        }
        if self.last.is_some() && self.after.is_some() {
            violations.push(Violation::LastWithAfter);
        }
        if !self.include_nodes && !self.include_edges {
            violations.push(Violation::NoOutputShape);
        }
        if self.first.is_some_and(|n| n > config.max_limit) {
            violations.push(Violation::FirstTooLarge {
                max: config.max_limit,
            });
        }
        if self.last.is_some_and(|n| n > config.max_limit) {
            violations.push(Violation::LastTooLarge {
                max: config.max_limit,
            });
        }

        if !violations.is_empty() {
            return Err(ValidationError { violations });
        }

        let direction = self.direction();
        let (limit, cursor) = match direction {
            Direction::Forward => (self.first, self.after.as_deref()),
            Direction::Backward => (self.last, self.before.as_deref()),
        };

        Ok(ResolvedParams {
            direction,
            limit: limit.unwrap_or(config.default_limit),
            cursor,
            include_total: self.include_total,
            include_nodes: self.include_nodes,
            include_edges: self.include_edges,
        })
    }
}

/// Validated parameters, ready for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedParams<'a> {
    /// Paging direction.
    pub direction: Direction,
    /// Rows to return (may be 0).
    pub limit: u32,
    /// The boundary cursor for `direction`, if any.
    pub cursor: Option<&'a str>,
    /// Also count the whole collection.
    pub include_total: bool,
    /// Emit bare `nodes`.
    pub include_nodes: bool,
    /// Emit `edges`.
    pub include_edges: bool,
}
