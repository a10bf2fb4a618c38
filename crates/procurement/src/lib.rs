//! `pharmadesk-procurement` — suppliers, purchases, and purchase items.
//!
//! Wire models and typed clients for the buying side: the supplier
//! register, purchase orders with their line items and receiving workflow,
//! and supplier payment tracking.

pub mod purchase;
pub mod supplier;

pub use purchase::{
    PaymentStatus, Purchase, PurchaseCreatePayload, PurchaseItem, PurchaseItemPayload,
    PurchaseItemsClient, PurchaseItemsParams, PurchaseListParams, PurchaseUpdatePayload,
    PurchasesClient, ReceiveItemsPayload, ReceivedItem, UpdatePaymentStatusPayload,
};
pub use supplier::{
    Supplier, SupplierCreatePayload, SupplierListParams, SupplierUpdatePayload, SuppliersClient,
};
