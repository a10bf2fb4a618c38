//! The customer register.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use pharmadesk_client::HttpClient;
use pharmadesk_core::{ClientResult, CustomerId, ListEnvelope, Query, endpoints};

use crate::Sale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
            Gender::Other => "Other",
        }
    }
}

/// A customer as reported by the API. `total_purchases`, `total_spent`, and
/// `full_name` are server-computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Gender,
    pub loyalty_points: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_purchases: i64,
    pub total_spent: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerCreatePayload {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddLoyaltyPointsPayload {
    pub points: i64,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerListParams {
    pub gender: Option<Gender>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl CustomerListParams {
    fn query(&self) -> Query {
        Query::new()
            .set("gender", self.gender.map(|v| v.as_str().to_string()))
            .set("search", self.search.clone())
            .set("ordering", self.ordering.clone())
    }
}

pub struct CustomersClient {
    http: Arc<HttpClient>,
}

impl CustomersClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        params: &CustomerListParams,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<Customer>> {
        let envelope: ListEnvelope<Customer> = self
            .http
            .get(endpoints::CUSTOMERS, &params.query(), cancel)
            .await?;
        Ok(envelope.into_vec())
    }

    pub async fn get(
        &self,
        id: CustomerId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Customer> {
        self.http
            .get(&endpoints::detail(endpoints::CUSTOMERS, id), &Query::new(), cancel)
            .await
    }

    pub async fn create(&self, payload: &CustomerCreatePayload) -> ClientResult<Customer> {
        self.http
            .post(endpoints::CUSTOMERS, Some(payload), None)
            .await
    }

    pub async fn update(
        &self,
        id: CustomerId,
        payload: &CustomerUpdatePayload,
    ) -> ClientResult<Customer> {
        self.http
            .patch(&endpoints::detail(endpoints::CUSTOMERS, id), Some(payload), None)
            .await
    }

    pub async fn delete(&self, id: CustomerId) -> ClientResult<()> {
        self.http
            .delete(&endpoints::detail(endpoints::CUSTOMERS, id), None)
            .await
    }

    /// Past sales for this customer, newest first.
    pub async fn purchase_history(
        &self,
        id: CustomerId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<Sale>> {
        let envelope: ListEnvelope<Sale> = self
            .http
            .get(
                &endpoints::action(endpoints::CUSTOMERS, id, "purchase_history"),
                &Query::new(),
                cancel,
            )
            .await?;
        Ok(envelope.into_vec())
    }

    /// Loyalty balance and accrual history. The payload shape is
    /// server-defined and surfaced untyped.
    pub async fn loyalty_summary(
        &self,
        id: CustomerId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Value> {
        self.http
            .get(
                &endpoints::action(endpoints::CUSTOMERS, id, "loyalty_summary"),
                &Query::new(),
                cancel,
            )
            .await
    }

    pub async fn add_loyalty_points(
        &self,
        id: CustomerId,
        payload: &AddLoyaltyPointsPayload,
    ) -> ClientResult<Customer> {
        self.http
            .post(
                &endpoints::action(endpoints::CUSTOMERS, id, "add_loyalty_points"),
                Some(payload),
                None,
            )
            .await
    }
}
