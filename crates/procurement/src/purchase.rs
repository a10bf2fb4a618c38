//! Purchase orders and their line items.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use pharmadesk_client::HttpClient;
use pharmadesk_core::{
    ClientResult, ListEnvelope, MedicineId, PurchaseId, PurchaseItemId, Query, SupplierId, UserId,
    endpoints,
};

/// Settlement state of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
        }
    }
}

/// One line of a purchase order. `received_quantity` tracks the receiving
/// workflow and lags `quantity` until the delivery is complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub id: PurchaseItemId,
    pub medicine: MedicineId,
    pub medicine_name: String,
    pub medicine_display_id: String,
    pub quantity: i64,
    pub unit_price: String,
    pub discount_percent: String,
    pub tax_percent: String,
    pub subtotal: String,
    pub received_quantity: i64,
}

/// A purchase order as reported by the API, line items included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub supplier: SupplierId,
    pub supplier_name: String,
    pub invoice_number: String,
    pub purchase_date: NaiveDate,
    pub total_amount: String,
    pub tax_amount: String,
    pub discount_amount: String,
    pub net_amount: String,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_by: UserId,
    pub created_by_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<PurchaseItem>,
    pub amount_paid: String,
    pub amount_due: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseItemPayload {
    pub medicine: MedicineId,
    pub quantity: i64,
    pub unit_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_percent: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseCreatePayload {
    pub supplier: SupplierId,
    pub invoice_number: String,
    pub purchase_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<PurchaseItemPayload>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PurchaseUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceivedItem {
    pub item_id: PurchaseItemId,
    pub received_quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiveItemsPayload {
    pub items: Vec<ReceivedItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePaymentStatusPayload {
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone, Default)]
pub struct PurchaseListParams {
    pub supplier: Option<SupplierId>,
    pub payment_status: Option<PaymentStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl PurchaseListParams {
    fn query(&self) -> Query {
        Query::new()
            .set("supplier", self.supplier.map(|v| v.to_string()))
            .set(
                "payment_status",
                self.payment_status.map(|v| v.as_str().to_string()),
            )
            .set("start_date", self.start_date.map(|v| v.to_string()))
            .set("end_date", self.end_date.map(|v| v.to_string()))
            .set("search", self.search.clone())
            .set("ordering", self.ordering.clone())
    }
}

pub struct PurchasesClient {
    http: Arc<HttpClient>,
}

impl PurchasesClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        params: &PurchaseListParams,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<Purchase>> {
        let envelope: ListEnvelope<Purchase> = self
            .http
            .get(endpoints::PURCHASES, &params.query(), cancel)
            .await?;
        Ok(envelope.into_vec())
    }

    pub async fn get(
        &self,
        id: PurchaseId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Purchase> {
        self.http
            .get(&endpoints::detail(endpoints::PURCHASES, id), &Query::new(), cancel)
            .await
    }

    /// Create a purchase order together with its line items in one call.
    pub async fn create(&self, payload: &PurchaseCreatePayload) -> ClientResult<Purchase> {
        self.http
            .post(endpoints::PURCHASES_CREATE_WITH_ITEMS, Some(payload), None)
            .await
    }

    pub async fn update(
        &self,
        id: PurchaseId,
        payload: &PurchaseUpdatePayload,
    ) -> ClientResult<Purchase> {
        self.http
            .patch(&endpoints::detail(endpoints::PURCHASES, id), Some(payload), None)
            .await
    }

    pub async fn delete(&self, id: PurchaseId) -> ClientResult<()> {
        self.http
            .delete(&endpoints::detail(endpoints::PURCHASES, id), None)
            .await
    }

    /// Record received quantities against the order's line items.
    pub async fn receive_items(
        &self,
        id: PurchaseId,
        payload: &ReceiveItemsPayload,
    ) -> ClientResult<Purchase> {
        self.http
            .post(
                &endpoints::action(endpoints::PURCHASES, id, "receive_items"),
                Some(payload),
                None,
            )
            .await
    }

    pub async fn update_payment_status(
        &self,
        id: PurchaseId,
        payload: &UpdatePaymentStatusPayload,
    ) -> ClientResult<Purchase> {
        self.http
            .patch(
                &endpoints::action(endpoints::PURCHASES, id, "update_payment_status"),
                Some(payload),
                None,
            )
            .await
    }

    /// Purchase orders that still owe the supplier money.
    pub async fn pending_payments(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<Purchase>> {
        let envelope: ListEnvelope<Purchase> = self
            .http
            .get(endpoints::PURCHASES_PENDING_PAYMENTS, &Query::new(), cancel)
            .await?;
        Ok(envelope.into_vec())
    }

    /// Headline procurement figures. The payload shape is server-defined
    /// and surfaced untyped.
    pub async fn dashboard_stats(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Value> {
        self.http
            .get(endpoints::PURCHASES_DASHBOARD_STATS, &Query::new(), cancel)
            .await
    }
}

#[derive(Debug, Clone, Default)]
pub struct PurchaseItemsParams {
    pub purchase: Option<PurchaseId>,
    pub medicine: Option<MedicineId>,
}

impl PurchaseItemsParams {
    fn query(&self) -> Query {
        Query::new()
            .set("purchase", self.purchase.map(|v| v.to_string()))
            .set("medicine", self.medicine.map(|v| v.to_string()))
    }
}

pub struct PurchaseItemsClient {
    http: Arc<HttpClient>,
}

impl PurchaseItemsClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        params: &PurchaseItemsParams,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<PurchaseItem>> {
        let envelope: ListEnvelope<PurchaseItem> = self
            .http
            .get(endpoints::PURCHASE_ITEMS, &params.query(), cancel)
            .await?;
        Ok(envelope.into_vec())
    }

    pub async fn get(
        &self,
        id: PurchaseItemId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<PurchaseItem> {
        self.http
            .get(&endpoints::detail(endpoints::PURCHASE_ITEMS, id), &Query::new(), cancel)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_uses_lowercase_codes() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Partial).unwrap(),
            r#""partial""#
        );
        let status: PaymentStatus = serde_json::from_str(r#""paid""#).unwrap();
        assert_eq!(status, PaymentStatus::Paid);
    }

    #[test]
    fn create_payload_nests_line_items() {
        let payload = PurchaseCreatePayload {
            supplier: SupplierId::new(),
            invoice_number: "INV-100".to_string(),
            purchase_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            tax_amount: None,
            discount_amount: None,
            notes: None,
            items: vec![PurchaseItemPayload {
                medicine: MedicineId::new(),
                quantity: 100,
                unit_price: "4.50".to_string(),
                discount_percent: None,
                tax_percent: None,
            }],
        };

        let raw = serde_json::to_value(&payload).unwrap();
        assert_eq!(raw["purchase_date"], "2025-06-15");
        assert_eq!(raw["items"][0]["quantity"], 100);
        assert!(raw.get("tax_amount").is_none());
    }

    #[test]
    fn purchase_list_params_render_status_filter() {
        let params = PurchaseListParams {
            payment_status: Some(PaymentStatus::Pending),
            ..Default::default()
        };
        assert_eq!(params.query().entries(), vec![("payment_status", "pending")]);
    }
}
