//! `pharmadesk-core` — shared foundation for the PharmaDesk client SDK.
//!
//! This crate contains the pieces every other crate leans on: the client
//! error model, the endpoint catalog, configuration, query-string
//! construction, the paginated-list envelope, and strongly-typed resource
//! identifiers. No I/O happens here.

pub mod config;
pub mod endpoints;
pub mod error;
pub mod id;
pub mod page;
pub mod query;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use id::{
    CategoryId, CustomerId, MedicineId, PaymentId, PermissionId, PurchaseId, PurchaseItemId,
    RoleId, SaleId, SaleItemId, StockTransactionId, SupplierId, UserId,
};
pub use page::ListEnvelope;
pub use query::Query;
