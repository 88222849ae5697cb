//! Query filters: exact-match terms plus advisory field projection.

use serde_json::Value;

/// Default result cap for scope queries
pub const DEFAULT_QUERY_SIZE: usize = 100;

/// Criteria selecting documents from the store
///
/// Terms are exact matches against top-level string fields (the scope
/// fields — `foreman_id`, `project_id` — live at the document root).
/// `source_fields` lets read-heavy projections limit payload size; a
/// backend may ignore it or return supersets.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    terms: Vec<(String, String)>,
    source_fields: Vec<String>,
    size: Option<usize>,
}

impl DocumentFilter {
    /// Empty filter (matches everything, default size cap)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require an exact match on a top-level field
    #[must_use]
    pub fn term(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.terms.push((field.into(), value.into()));
        self
    }

    /// Require a term only when a value is present
    #[must_use]
    pub fn opt_term(self, field: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.term(field, value),
            None => self,
        }
    }

    /// Restrict returned fields (advisory, dot-paths allowed)
    #[must_use]
    pub fn source_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Cap the number of returned documents
    #[inline]
    #[must_use]
    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Configured terms
    #[inline]
    #[must_use]
    pub fn terms(&self) -> &[(String, String)] {
        &self.terms
    }

    /// Configured projection paths
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.source_fields
    }

    /// Effective result cap
    #[inline]
    #[must_use]
    pub fn effective_size(&self) -> usize {
        self.size.unwrap_or(DEFAULT_QUERY_SIZE)
    }

    /// Whether a document satisfies every term
    #[must_use]
    pub fn matches(&self, document: &Value) -> bool {
        self.terms.iter().all(|(field, expected)| {
            document
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|actual| actual == expected)
        })
    }
}
