//! The stock transaction log.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use pharmadesk_client::HttpClient;
use pharmadesk_core::{
    ClientResult, ListEnvelope, MedicineId, Query, StockTransactionId, UserId, endpoints,
};

/// One entry in the append-only stock movement log.
///
/// Transaction types are server-defined codes (purchase, sale, adjustment,
/// refund) surfaced together with their display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockTransaction {
    pub id: StockTransactionId,
    pub medicine: MedicineId,
    pub medicine_name: String,
    pub transaction_type: String,
    pub transaction_type_display: String,
    pub quantity: i64,
    pub previous_quantity: i64,
    pub new_quantity: i64,
    #[serde(default)]
    pub reference_type: Option<String>,
    #[serde(default)]
    pub reference_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_by: UserId,
    pub created_by_username: String,
    pub transaction_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct StockTransactionParams {
    pub medicine: Option<MedicineId>,
    pub transaction_type: Option<String>,
    pub created_by: Option<UserId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl StockTransactionParams {
    fn query(&self) -> Query {
        Query::new()
            .set("medicine", self.medicine.map(|v| v.to_string()))
            .set("transaction_type", self.transaction_type.clone())
            .set("created_by", self.created_by.map(|v| v.to_string()))
            .set("start_date", self.start_date.map(|v| v.to_string()))
            .set("end_date", self.end_date.map(|v| v.to_string()))
    }
}

pub struct StockTransactionsClient {
    http: Arc<HttpClient>,
}

impl StockTransactionsClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        params: &StockTransactionParams,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<StockTransaction>> {
        let envelope: ListEnvelope<StockTransaction> = self
            .http
            .get(endpoints::STOCK_TRANSACTIONS, &params.query(), cancel)
            .await?;
        Ok(envelope.into_vec())
    }

    pub async fn get(
        &self,
        id: StockTransactionId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<StockTransaction> {
        self.http
            .get(
                &endpoints::detail(endpoints::STOCK_TRANSACTIONS, id),
                &Query::new(),
                cancel,
            )
            .await
    }

    /// Aggregated movement figures for a date window. The payload shape is
    /// server-defined and surfaced untyped.
    pub async fn summary(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Value> {
        let query = Query::new()
            .set("start_date", start_date.map(|v| v.to_string()))
            .set("end_date", end_date.map(|v| v.to_string()));
        self.http
            .get(endpoints::STOCK_TRANSACTIONS_SUMMARY, &query, cancel)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_filters_render_as_iso_dates() {
        let params = StockTransactionParams {
            start_date: Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
            end_date: Some(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()),
            ..Default::default()
        };
        assert_eq!(
            params.query().entries(),
            vec![("start_date", "2025-06-01"), ("end_date", "2025-06-30")]
        );
    }

    #[test]
    fn transaction_deserializes_with_null_reference() {
        let raw = r#"{
            "id": "0190b0c0-3b5a-7000-8000-000000000011",
            "medicine": "0190b0c0-3b5a-7000-8000-00000000000a",
            "medicine_name": "Amoxicillin 500mg",
            "transaction_type": "adjustment",
            "transaction_type_display": "Stock Adjustment",
            "quantity": -10,
            "previous_quantity": 250,
            "new_quantity": 240,
            "reference_type": null,
            "reference_id": null,
            "notes": "damaged stock",
            "created_by": "0190b0c0-3b5a-7000-8000-000000000001",
            "created_by_username": "amina",
            "transaction_date": "2025-06-02T10:15:00Z"
        }"#;

        let tx: StockTransaction = serde_json::from_str(raw).unwrap();
        assert_eq!(tx.new_quantity, 240);
        assert!(tx.reference_type.is_none());
    }
}
