//! Page and PageInfo response shapes.

use serde::Serialize;

/// Navigation metadata for a page.
///
/// Serializes to the camelCase wire shape; absent cursors and counts are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct PageInfo {
    /// Cursor of the first row on this page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    /// Cursor of the last row on this page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_cursor: Option<String>,
    /// Whether rows exist after this page.
    pub has_next_page: bool,
    /// Whether rows exist before this page.
    pub has_previous_page: bool,
    /// Number of rows on this page.
    pub page_count: usize,
    /// Size of the whole collection, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

impl PageInfo {
    /// Page info for a page of `page_count` rows with no cursors or flags set.
    #[must_use]
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            ..Self::default()
        }
    }

    /// Set whether there are following rows.
    #[must_use]
    pub fn with_has_next(mut self, has_next: bool) -> Self {
        self.has_next_page = has_next;
        self
    }

    /// Set whether there are preceding rows.
    #[must_use]
    pub fn with_has_previous(mut self, has_previous: bool) -> Self {
        self.has_previous_page = has_previous;
        self
    }

    /// Set the start and end cursors.
    #[must_use]
    pub fn with_cursors(mut self, start: Option<String>, end: Option<String>) -> Self {
        self.start_cursor = start;
        self.end_cursor = end;
        self
    }

    /// Set the total count.
    #[must_use]
    pub fn with_total(mut self, total: u64) -> Self {
        self.total_count = Some(total);
        self
    }
}

/// A row paired with its cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct Edge<T> {
    /// Opaque cursor for this row.
    pub cursor: String,
    /// The row.
    pub node: T,
}

impl<T> Edge<T> {
    /// Create an edge.
    #[must_use]
    pub const fn new(cursor: String, node: T) -> Self {
        Self { cursor, node }
    }
}

/// One page of results.
///
/// `nodes` and `edges` are present according to the request's include
/// flags; at least one of them always is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Page<T> {
    /// Bare rows, in display order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<T>>,
    /// Rows with cursors, in display order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<Edge<T>>>,
    /// Navigation metadata.
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    /// Build a page from `(cursor, row)` pairs in display order.
    ///
    /// Fills `start_cursor`, `end_cursor` and `page_count`; the `has_*` flags
    /// and total are taken from `info`.
    #[must_use]
    pub fn from_rows(
        rows: Vec<(String, T)>,
        info: PageInfo,
        include_nodes: bool,
        include_edges: bool,
    ) -> Self
    where
        T: Clone,
    {
        let start_cursor = rows.first().map(|(c, _)| c.clone());
        let end_cursor = rows.last().map(|(c, _)| c.clone());
        let page_info = info.with_cursors(start_cursor, end_cursor);
        let page_info = PageInfo {
            page_count: rows.len(),
            ..page_info
        };

        let (nodes, edges) = match (include_nodes, include_edges) {
            (true, true) => {
                let nodes = rows.iter().map(|(_, row)| row.clone()).collect();
                let edges = rows.into_iter().map(|(c, row)| Edge::new(c, row)).collect();
                (Some(nodes), Some(edges))
            },
            (true, false) => (Some(rows.into_iter().map(|(_, row)| row).collect()), None),
            (false, _) => (
                None,
                Some(rows.into_iter().map(|(c, row)| Edge::new(c, row)).collect()),
            ),
        };

        Self {
            nodes,
            edges,
            page_info,
        }
    }

    /// Rows on this page, from whichever shape is present.
    pub fn rows(&self) -> Vec<&T> {
        match (&self.nodes, &self.edges) {
            (Some(nodes), _) => nodes.iter().collect(),
            (None, Some(edges)) => edges.iter().map(|e| &e.node).collect(),
            (None, None) => Vec::new(),
        }
    }

    /// Number of rows on this page.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.page_info.page_count
    }

    /// Whether this page has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.page_info.page_count == 0
    }

    /// Serialize to the JSON wire shape.
    pub fn to_json(&self) -> Result<String, serde_json::Error>
    where
        T: Serialize,
    {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<(String, u32)> {
        vec![("a".to_string(), 1), ("b".to_string(), 2), ("c".to_string(), 3)]
    }

    #[test]
    fn test_page_info_builders() {
        let info = PageInfo::new(20)
            .with_has_next(true)
            .with_has_previous(true)
            .with_cursors(Some("abc".to_string()), Some("xyz".to_string()))
            .with_total(100);

        assert!(info.has_next_page);
        assert!(info.has_previous_page);
        assert_eq!(info.start_cursor.as_deref(), Some("abc"));
        assert_eq!(info.end_cursor.as_deref(), Some("xyz"));
        assert_eq!(info.total_count, Some(100));
    }

    #[test]
    fn test_from_rows_nodes_only() {
        let page = Page::from_rows(rows(), PageInfo::default(), true, false);
        assert_eq!(page.nodes, Some(vec![1, 2, 3]));
        assert!(page.edges.is_none());
        assert_eq!(page.page_info.start_cursor.as_deref(), Some("a"));
        assert_eq!(page.page_info.end_cursor.as_deref(), Some("c"));
        assert_eq!(page.len(), 3);
    }

    #[test]
    fn test_from_rows_both_shapes() {
        let page = Page::from_rows(rows(), PageInfo::default(), true, true);
        assert_eq!(page.nodes.as_ref().map(Vec::len), Some(3));
        let edges = page.edges.as_ref().unwrap();
        assert_eq!(edges[1], Edge::new("b".to_string(), 2));
        assert_eq!(page.rows(), vec![&1, &2, &3]);
    }

    #[test]
    fn test_from_rows_empty() {
        let page: Page<u32> = Page::from_rows(Vec::new(), PageInfo::default(), false, true);
        assert!(page.is_empty());
        assert_eq!(page.edges, Some(Vec::new()));
        assert!(page.page_info.start_cursor.is_none());
        assert!(page.page_info.end_cursor.is_none());
        assert_eq!(
            page.to_json().unwrap(),
            r#"{"edges":[],"pageInfo":{"hasNextPage":false,"hasPreviousPage":false,"pageCount":0}}"#
        );
    }
}
