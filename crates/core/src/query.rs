//! Query-string construction.

/// Ordered set of query parameters for a list/filter call.
///
/// Values are stored as entered; pairs whose value is `None` or the empty
/// string are dropped when the request is built, so optional filters can be
/// threaded through without the caller pruning them first.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pairs: Vec<(&'static str, Option<String>)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. `value` may be `None`; empty strings are treated
    /// as unset when the query string is rendered.
    pub fn set(mut self, key: &'static str, value: impl Into<Option<String>>) -> Self {
        self.pairs.push((key, value.into()));
        self
    }

    /// The pairs that will actually be sent: present, non-empty values, in
    /// insertion order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        self.pairs
            .iter()
            .filter_map(|(key, value)| match value.as_deref() {
                Some(v) if !v.is_empty() => Some((*key, v)),
                _ => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_absent_values_are_omitted() {
        let query = Query::new()
            .set("search", String::new())
            .set("ordering", "name".to_string())
            .set("page", None);

        assert_eq!(query.entries(), vec![("ordering", "name")]);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let query = Query::new()
            .set("b", "2".to_string())
            .set("a", "1".to_string());

        assert_eq!(query.entries(), vec![("b", "2"), ("a", "1")]);
    }

    #[test]
    fn all_filtered_query_is_empty() {
        let query = Query::new().set("search", String::new()).set("page", None);
        assert!(query.is_empty());
    }
}
