//! The supplier register.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use pharmadesk_client::HttpClient;
use pharmadesk_core::{ClientResult, ListEnvelope, Query, SupplierId, endpoints};
use pharmadesk_inventory::Medicine;

use crate::Purchase;

/// A supplier as reported by the API. `total_purchases` is the
/// server-computed lifetime purchase volume as a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_purchases: String,
    pub active_medicines_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupplierCreatePayload {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SupplierUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct SupplierListParams {
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub is_active: Option<bool>,
}

impl SupplierListParams {
    fn query(&self) -> Query {
        Query::new()
            .set("search", self.search.clone())
            .set("ordering", self.ordering.clone())
            .set("is_active", self.is_active.map(|v| v.to_string()))
    }
}

pub struct SuppliersClient {
    http: Arc<HttpClient>,
}

impl SuppliersClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        params: &SupplierListParams,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<Supplier>> {
        let envelope: ListEnvelope<Supplier> = self
            .http
            .get(endpoints::SUPPLIERS, &params.query(), cancel)
            .await?;
        Ok(envelope.into_vec())
    }

    pub async fn get(
        &self,
        id: SupplierId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Supplier> {
        self.http
            .get(&endpoints::detail(endpoints::SUPPLIERS, id), &Query::new(), cancel)
            .await
    }

    pub async fn create(&self, payload: &SupplierCreatePayload) -> ClientResult<Supplier> {
        self.http
            .post(endpoints::SUPPLIERS, Some(payload), None)
            .await
    }

    pub async fn update(
        &self,
        id: SupplierId,
        payload: &SupplierUpdatePayload,
    ) -> ClientResult<Supplier> {
        self.http
            .patch(&endpoints::detail(endpoints::SUPPLIERS, id), Some(payload), None)
            .await
    }

    pub async fn delete(&self, id: SupplierId) -> ClientResult<()> {
        self.http
            .delete(&endpoints::detail(endpoints::SUPPLIERS, id), None)
            .await
    }

    /// Purchase orders placed with this supplier.
    pub async fn purchases(
        &self,
        id: SupplierId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<Purchase>> {
        let envelope: ListEnvelope<Purchase> = self
            .http
            .get(
                &endpoints::action(endpoints::SUPPLIERS, id, "purchases"),
                &Query::new(),
                cancel,
            )
            .await?;
        Ok(envelope.into_vec())
    }

    /// Medicines currently sourced from this supplier.
    pub async fn medicines(
        &self,
        id: SupplierId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<Medicine>> {
        let envelope: ListEnvelope<Medicine> = self
            .http
            .get(
                &endpoints::action(endpoints::SUPPLIERS, id, "medicines"),
                &Query::new(),
                cancel,
            )
            .await?;
        Ok(envelope.into_vec())
    }

    /// Aggregated supplier figures. The payload shape is server-defined and
    /// surfaced untyped.
    pub async fn statistics(
        &self,
        id: SupplierId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Value> {
        self.http
            .get(
                &endpoints::action(endpoints::SUPPLIERS, id, "statistics"),
                &Query::new(),
                cancel,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supplier_deserializes_with_null_contact_fields() {
        let raw = r#"{
            "id": "0190b0c0-3b5a-7000-8000-000000000021",
            "name": "MedSupply Ltd",
            "contact_person": null,
            "phone": "+255700000001",
            "email": null,
            "address": null,
            "tax_id": "TIN-001",
            "is_active": true,
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-06-01T00:00:00Z",
            "total_purchases": "125000.00",
            "active_medicines_count": 42
        }"#;

        let supplier: Supplier = serde_json::from_str(raw).unwrap();
        assert!(supplier.contact_person.is_none());
        assert_eq!(supplier.total_purchases, "125000.00");
    }

    #[test]
    fn update_payload_serializes_only_set_fields() {
        let payload = SupplierUpdatePayload {
            phone: Some("+255700000002".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"phone":"+255700000002"}"#
        );
    }
}
