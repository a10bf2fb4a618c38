//! The medicine register.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use pharmadesk_client::HttpClient;
use pharmadesk_core::{
    CategoryId, ClientResult, ListEnvelope, MedicineId, Query, SupplierId, endpoints,
};

/// Dispensing unit a medicine is stocked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicineUnit {
    Pieces,
    Tablets,
    Capsules,
    Bottles,
    Boxes,
    Strips,
    Vials,
    Tubes,
    Sachets,
}

/// A medicine as reported by the API.
///
/// Monetary fields are decimal strings exactly as the server serializes
/// them; `profit_per_unit` and `days_to_expiry` are server-computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    pub id: MedicineId,
    pub name: String,
    pub generic_name: String,
    pub category: CategoryId,
    pub category_name: String,
    pub supplier: SupplierId,
    pub supplier_name: String,
    pub batch_number: String,
    pub manufacture_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub purchase_price: String,
    pub selling_price: String,
    #[serde(default)]
    pub markup_percentage: Option<String>,
    pub stock_quantity: i64,
    pub min_stock_level: i64,
    pub max_stock_level: i64,
    pub unit: MedicineUnit,
    #[serde(default)]
    pub storage_location: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    pub requires_prescription: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub profit_per_unit: String,
    pub days_to_expiry: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MedicineCreatePayload {
    pub name: String,
    pub generic_name: String,
    pub category: CategoryId,
    pub supplier: SupplierId,
    pub batch_number: String,
    pub manufacture_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub purchase_price: String,
    pub selling_price: String,
    pub stock_quantity: i64,
    pub min_stock_level: i64,
    pub max_stock_level: i64,
    pub unit: MedicineUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_prescription: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MedicineUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<SupplierId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stock_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_stock_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<MedicineUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_prescription: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Direction of a manual stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockAdjustmentKind {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockAdjustment {
    pub adjustment_type: StockAdjustmentKind,
    pub quantity: i64,
    pub reason: String,
}

/// Headline inventory figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardStats {
    pub total_medicines: i64,
    pub low_stock_count: i64,
    pub expiring_soon_count: i64,
    pub expired_count: i64,
    pub total_value: String,
}

#[derive(Debug, Clone, Default)]
pub struct MedicineListParams {
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<u32>,
    pub category: Option<CategoryId>,
    pub supplier: Option<SupplierId>,
    pub requires_prescription: Option<bool>,
    pub stock_status: Option<String>,
    pub expiry_status: Option<String>,
}

impl MedicineListParams {
    fn query(&self) -> Query {
        Query::new()
            .set("search", self.search.clone())
            .set("ordering", self.ordering.clone())
            .set("is_active", self.is_active.map(|v| v.to_string()))
            .set("page", self.page.map(|v| v.to_string()))
            .set("category", self.category.map(|v| v.to_string()))
            .set("supplier", self.supplier.map(|v| v.to_string()))
            .set(
                "requires_prescription",
                self.requires_prescription.map(|v| v.to_string()),
            )
            .set("stock_status", self.stock_status.clone())
            .set("expiry_status", self.expiry_status.clone())
    }
}

pub struct MedicinesClient {
    http: Arc<HttpClient>,
}

impl MedicinesClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        params: &MedicineListParams,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<Medicine>> {
        let envelope: ListEnvelope<Medicine> = self
            .http
            .get(endpoints::MEDICINES, &params.query(), cancel)
            .await?;
        Ok(envelope.into_vec())
    }

    pub async fn get(
        &self,
        id: MedicineId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Medicine> {
        self.http
            .get(&endpoints::detail(endpoints::MEDICINES, id), &Query::new(), cancel)
            .await
    }

    pub async fn create(&self, payload: &MedicineCreatePayload) -> ClientResult<Medicine> {
        self.http
            .post(endpoints::MEDICINES, Some(payload), None)
            .await
    }

    pub async fn update(
        &self,
        id: MedicineId,
        payload: &MedicineUpdatePayload,
    ) -> ClientResult<Medicine> {
        self.http
            .patch(&endpoints::detail(endpoints::MEDICINES, id), Some(payload), None)
            .await
    }

    pub async fn delete(&self, id: MedicineId) -> ClientResult<()> {
        self.http
            .delete(&endpoints::detail(endpoints::MEDICINES, id), None)
            .await
    }

    /// Medicines at or below their minimum stock level.
    pub async fn low_stock(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<Medicine>> {
        let envelope: ListEnvelope<Medicine> = self
            .http
            .get(endpoints::MEDICINES_LOW_STOCK, &Query::new(), cancel)
            .await?;
        Ok(envelope.into_vec())
    }

    /// Medicines expiring within `days` days.
    pub async fn expiring_soon(
        &self,
        days: u32,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<Medicine>> {
        let query = Query::new().set("days", days.to_string());
        let envelope: ListEnvelope<Medicine> = self
            .http
            .get(endpoints::MEDICINES_EXPIRING_SOON, &query, cancel)
            .await?;
        Ok(envelope.into_vec())
    }

    pub async fn expired(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<Medicine>> {
        let envelope: ListEnvelope<Medicine> = self
            .http
            .get(endpoints::MEDICINES_EXPIRED, &Query::new(), cancel)
            .await?;
        Ok(envelope.into_vec())
    }

    /// Manually adjust the stock level; the server records the matching
    /// stock transaction.
    pub async fn adjust_stock(
        &self,
        id: MedicineId,
        payload: &StockAdjustment,
    ) -> ClientResult<Medicine> {
        self.http
            .post(
                &endpoints::action(endpoints::MEDICINES, id, "adjust_stock"),
                Some(payload),
                None,
            )
            .await
    }

    pub async fn dashboard_stats(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<DashboardStats> {
        self.http
            .get(endpoints::MEDICINES_DASHBOARD_STATS, &Query::new(), cancel)
            .await
    }
}
