//! `pharmadesk-sales` — customers, sales, and payments.
//!
//! Wire models and typed clients for the retail side: the customer register
//! with loyalty tracking, point-of-sale invoices with their line items and
//! payment/refund workflow, and the payment ledger.

pub mod customer;
pub mod payment;
pub mod sale;

pub use customer::{
    AddLoyaltyPointsPayload, Customer, CustomerCreatePayload, CustomerListParams,
    CustomerUpdatePayload, CustomersClient, Gender,
};
pub use payment::{Payment, PaymentListParams, PaymentsClient};
pub use sale::{
    DailySummary, PaymentMethod, PaymentStatus, ProcessPaymentPayload, RefundItem, RefundPayload,
    Sale, SaleCreatePayload, SaleItem, SaleItemPayload, SaleListParams, SaleUpdatePayload,
    SalesClient, TopSellingMedicine,
};
