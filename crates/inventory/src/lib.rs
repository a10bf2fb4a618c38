//! `pharmadesk-inventory` — categories, medicines, and stock transactions.
//!
//! Wire models and typed clients for the inventory side of the pharmacy:
//! the category tree, the medicine register with its stock thresholds and
//! expiry tracking, and the append-only stock transaction log.

pub mod category;
pub mod medicine;
pub mod stock;

pub use category::{
    CategoriesClient, Category, CategoryCreatePayload, CategoryListParams, CategoryUpdatePayload,
};
pub use medicine::{
    DashboardStats, Medicine, MedicineCreatePayload, MedicineListParams, MedicineUnit,
    MedicineUpdatePayload, MedicinesClient, StockAdjustment, StockAdjustmentKind,
};
pub use stock::{StockTransaction, StockTransactionParams, StockTransactionsClient};
