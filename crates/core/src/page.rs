//! List response normalization.

use serde::Deserialize;

/// A collection response in either of the server's two shapes.
///
/// List endpoints answer with a bare JSON array, or with a pagination
/// envelope carrying the array under `results`. Clients deserialize into
/// this and call [`ListEnvelope::into_vec`] so callers always see `Vec<T>`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Paginated {
        results: Vec<T>,
    },
    Plain(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Paginated { results } => results,
            ListEnvelope::Plain(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_array_deserializes() {
        let envelope: ListEnvelope<u32> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(envelope.into_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn paginated_envelope_deserializes() {
        let envelope: ListEnvelope<u32> =
            serde_json::from_str(r#"{"count": 3, "results": [1, 2, 3]}"#).unwrap();
        assert_eq!(envelope.into_vec(), vec![1, 2, 3]);
    }
}
