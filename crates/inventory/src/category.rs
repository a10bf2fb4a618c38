//! Medicine categories.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use pharmadesk_client::HttpClient;
use pharmadesk_core::{CategoryId, ClientResult, ListEnvelope, Query, endpoints};

use crate::Medicine;

/// A medicine category as reported by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub code: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Server-computed count of medicines filed under this category.
    pub medicine_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCreatePayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryListParams {
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<u32>,
}

impl CategoryListParams {
    fn query(&self) -> Query {
        Query::new()
            .set("search", self.search.clone())
            .set("ordering", self.ordering.clone())
            .set("is_active", self.is_active.map(|v| v.to_string()))
            .set("page", self.page.map(|v| v.to_string()))
    }
}

pub struct CategoriesClient {
    http: Arc<HttpClient>,
}

impl CategoriesClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        params: &CategoryListParams,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<Category>> {
        let envelope: ListEnvelope<Category> = self
            .http
            .get(endpoints::CATEGORIES, &params.query(), cancel)
            .await?;
        Ok(envelope.into_vec())
    }

    pub async fn get(
        &self,
        id: CategoryId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Category> {
        self.http
            .get(&endpoints::detail(endpoints::CATEGORIES, id), &Query::new(), cancel)
            .await
    }

    pub async fn create(&self, payload: &CategoryCreatePayload) -> ClientResult<Category> {
        self.http
            .post(endpoints::CATEGORIES, Some(payload), None)
            .await
    }

    pub async fn update(
        &self,
        id: CategoryId,
        payload: &CategoryUpdatePayload,
    ) -> ClientResult<Category> {
        self.http
            .patch(&endpoints::detail(endpoints::CATEGORIES, id), Some(payload), None)
            .await
    }

    pub async fn delete(&self, id: CategoryId) -> ClientResult<()> {
        self.http
            .delete(&endpoints::detail(endpoints::CATEGORIES, id), None)
            .await
    }

    /// Medicines filed under this category.
    pub async fn medicines(
        &self,
        id: CategoryId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<Medicine>> {
        let envelope: ListEnvelope<Medicine> = self
            .http
            .get(
                &endpoints::action(endpoints::CATEGORIES, id, "medicines"),
                &Query::new(),
                cancel,
            )
            .await?;
        Ok(envelope.into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_payload_skips_unset_fields() {
        let payload = CategoryCreatePayload {
            name: "Antibiotics".to_string(),
            description: None,
            code: None,
            display_order: None,
            is_active: None,
        };
        let raw = serde_json::to_string(&payload).unwrap();
        assert_eq!(raw, r#"{"name":"Antibiotics"}"#);
    }

    #[test]
    fn list_params_render_typed_filters() {
        let params = CategoryListParams {
            search: Some("anti".to_string()),
            ordering: None,
            is_active: Some(true),
            page: Some(2),
        };
        assert_eq!(
            params.query().entries(),
            vec![("search", "anti"), ("is_active", "true"), ("page", "2")]
        );
    }
}
