//! The payment ledger.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use pharmadesk_client::HttpClient;
use pharmadesk_core::{ClientResult, ListEnvelope, PaymentId, Query, SaleId, UserId, endpoints};

use crate::PaymentMethod;

/// A recorded payment against a sale. `payment_id` is the human-facing
/// receipt number, distinct from the row id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub payment_id: String,
    pub sale: SaleId,
    pub amount: String,
    pub payment_method: PaymentMethod,
    pub payment_method_display: String,
    pub payment_date: DateTime<Utc>,
    #[serde(default)]
    pub transaction_ref: Option<String>,
    pub received_by: UserId,
    pub received_by_username: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentListParams {
    pub sale: Option<SaleId>,
    pub payment_method: Option<PaymentMethod>,
    pub received_by: Option<UserId>,
    pub ordering: Option<String>,
}

impl PaymentListParams {
    fn query(&self) -> Query {
        Query::new()
            .set("sale", self.sale.map(|v| v.to_string()))
            .set(
                "payment_method",
                self.payment_method.map(|v| v.as_str().to_string()),
            )
            .set("received_by", self.received_by.map(|v| v.to_string()))
            .set("ordering", self.ordering.clone())
    }
}

pub struct PaymentsClient {
    http: Arc<HttpClient>,
}

impl PaymentsClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        params: &PaymentListParams,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<Payment>> {
        let envelope: ListEnvelope<Payment> = self
            .http
            .get(endpoints::PAYMENTS, &params.query(), cancel)
            .await?;
        Ok(envelope.into_vec())
    }

    pub async fn get(
        &self,
        id: PaymentId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Payment> {
        self.http
            .get(&endpoints::detail(endpoints::PAYMENTS, id), &Query::new(), cancel)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_deserializes_from_server_payload() {
        let raw = r#"{
            "id": "0190b0c0-3b5a-7000-8000-000000000051",
            "payment_id": "PAY-2025-0090",
            "sale": "0190b0c0-3b5a-7000-8000-000000000041",
            "amount": "21.75",
            "payment_method": "mobile",
            "payment_method_display": "Mobile Money",
            "payment_date": "2025-06-02T12:01:00Z",
            "transaction_ref": "MP-778812",
            "received_by": "0190b0c0-3b5a-7000-8000-000000000001",
            "received_by_username": "amina",
            "notes": null,
            "created_at": "2025-06-02T12:01:00Z"
        }"#;

        let payment: Payment = serde_json::from_str(raw).unwrap();
        assert_eq!(payment.payment_method, PaymentMethod::Mobile);
        assert_eq!(payment.transaction_ref.as_deref(), Some("MP-778812"));
    }

    #[test]
    fn payment_list_params_render_filters() {
        let params = PaymentListParams {
            payment_method: Some(PaymentMethod::Card),
            ordering: Some("-payment_date".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.query().entries(),
            vec![("payment_method", "card"), ("ordering", "-payment_date")]
        );
    }
}
