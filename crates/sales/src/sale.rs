//! Point-of-sale invoices.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use pharmadesk_client::HttpClient;
use pharmadesk_core::{
    ClientResult, CustomerId, ListEnvelope, MedicineId, Query, SaleId, SaleItemId, UserId,
    endpoints,
};

use crate::Payment;

/// How a sale was (or will be) paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Mobile,
    Insurance,
    Credit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Mobile => "mobile",
            PaymentMethod::Insurance => "insurance",
            PaymentMethod::Credit => "credit",
        }
    }
}

/// Settlement state of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Partial,
    Pending,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Pending => "pending",
        }
    }
}

/// One line of a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: SaleItemId,
    pub medicine: MedicineId,
    pub medicine_name: String,
    pub quantity: i64,
    pub unit_price: String,
    pub batch_number: String,
    pub subtotal: String,
}

/// A sale as reported by the API, with its line items and payments
/// embedded. `total_paid`, `amount_due`, and `total_profit` are
/// server-computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    #[serde(default)]
    pub customer: Option<CustomerId>,
    pub customer_name: String,
    pub invoice_number: String,
    pub sale_date: DateTime<Utc>,
    pub total_amount: String,
    pub tax_amount: String,
    pub discount_amount: String,
    pub net_amount: String,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub served_by: UserId,
    pub served_by_username: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<SaleItem>,
    pub payments: Vec<Payment>,
    pub total_paid: String,
    pub amount_due: String,
    pub total_profit: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleItemPayload {
    pub medicine: MedicineId,
    pub quantity: i64,
    pub unit_price: String,
    pub batch_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleCreatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<String>,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<SaleItemPayload>,
    /// Amount tendered at the point of sale; the server records it as the
    /// first payment against the invoice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_ref: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SaleUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessPaymentPayload {
    pub amount: String,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefundItem {
    pub sale_item_id: SaleItemId,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefundPayload {
    pub refund_amount: String,
    pub reason: String,
    /// Line-level refunds; omitted for whole-invoice refunds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_to_refund: Option<Vec<RefundItem>>,
}

/// One day's takings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_sales: i64,
    pub total_revenue: String,
    pub total_profit: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopSellingMedicine {
    pub medicine_id: MedicineId,
    pub medicine_name: String,
    pub total_quantity: i64,
    pub total_revenue: String,
}

#[derive(Debug, Clone, Default)]
pub struct SaleListParams {
    pub customer: Option<CustomerId>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
    pub served_by: Option<UserId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl SaleListParams {
    fn query(&self) -> Query {
        Query::new()
            .set("customer", self.customer.map(|v| v.to_string()))
            .set(
                "payment_method",
                self.payment_method.map(|v| v.as_str().to_string()),
            )
            .set(
                "payment_status",
                self.payment_status.map(|v| v.as_str().to_string()),
            )
            .set("served_by", self.served_by.map(|v| v.to_string()))
            .set("start_date", self.start_date.map(|v| v.to_string()))
            .set("end_date", self.end_date.map(|v| v.to_string()))
            .set("search", self.search.clone())
            .set("ordering", self.ordering.clone())
    }
}

pub struct SalesClient {
    http: Arc<HttpClient>,
}

impl SalesClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        params: &SaleListParams,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<Sale>> {
        let envelope: ListEnvelope<Sale> =
            self.http.get(endpoints::SALES, &params.query(), cancel).await?;
        Ok(envelope.into_vec())
    }

    pub async fn get(&self, id: SaleId, cancel: Option<&CancellationToken>) -> ClientResult<Sale> {
        self.http
            .get(&endpoints::detail(endpoints::SALES, id), &Query::new(), cancel)
            .await
    }

    /// Create a sale together with its line items (and an optional first
    /// payment) in one call.
    pub async fn create(&self, payload: &SaleCreatePayload) -> ClientResult<Sale> {
        self.http
            .post(endpoints::SALES_CREATE_WITH_ITEMS, Some(payload), None)
            .await
    }

    pub async fn update(&self, id: SaleId, payload: &SaleUpdatePayload) -> ClientResult<Sale> {
        self.http
            .patch(&endpoints::detail(endpoints::SALES, id), Some(payload), None)
            .await
    }

    pub async fn delete(&self, id: SaleId) -> ClientResult<()> {
        self.http
            .delete(&endpoints::detail(endpoints::SALES, id), None)
            .await
    }

    /// Record a payment against an open invoice.
    pub async fn process_payment(
        &self,
        id: SaleId,
        payload: &ProcessPaymentPayload,
    ) -> ClientResult<Sale> {
        self.http
            .post(
                &endpoints::action(endpoints::SALES, id, "process_payment"),
                Some(payload),
                None,
            )
            .await
    }

    pub async fn refund(&self, id: SaleId, payload: &RefundPayload) -> ClientResult<Sale> {
        self.http
            .post(
                &endpoints::action(endpoints::SALES, id, "refund"),
                Some(payload),
                None,
            )
            .await
    }

    /// Takings for `date`, defaulting to today on the server when omitted.
    pub async fn daily_summary(
        &self,
        date: Option<NaiveDate>,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<DailySummary> {
        let query = Query::new().set("date", date.map(|v| v.to_string()));
        self.http
            .get(endpoints::SALES_DAILY_SUMMARY, &query, cancel)
            .await
    }

    /// Best sellers over the trailing `days`, capped at `limit` entries.
    pub async fn top_selling(
        &self,
        days: u32,
        limit: u32,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<TopSellingMedicine>> {
        let query = Query::new()
            .set("days", days.to_string())
            .set("limit", limit.to_string());
        let envelope: ListEnvelope<TopSellingMedicine> = self
            .http
            .get(endpoints::SALES_TOP_SELLING, &query, cancel)
            .await?;
        Ok(envelope.into_vec())
    }
}
