//! Catalog of API endpoint paths.
//!
//! All paths are relative to the configured base URL. Detail paths follow
//! the server convention of `<collection><id>/` with a trailing slash.

use core::fmt::Display;

// Auth
pub const AUTH_LOGIN: &str = "/api/auth/login/";
pub const AUTH_REGISTER: &str = "/api/auth/register/";
pub const AUTH_REFRESH: &str = "/api/auth/jwt/refresh/";
pub const AUTH_VERIFY: &str = "/api/auth/jwt/verify/";
pub const AUTH_LOGOUT: &str = "/api/auth/logout/";
pub const AUTH_ME: &str = "/api/auth/users/me/";
pub const AUTH_SET_PASSWORD: &str = "/api/auth/users/set_password/";

// Directory
pub const USERS: &str = "/api/users/";
pub const USERS_AUTH_INFO: &str = "/api/users/auth_info/";
pub const ROLES: &str = "/api/auth/roles/";
pub const PERMISSIONS: &str = "/api/auth/permissions/";

// Inventory
pub const CATEGORIES: &str = "/api/categories/";
pub const MEDICINES: &str = "/api/medicines/";
pub const MEDICINES_LOW_STOCK: &str = "/api/medicines/low_stock/";
pub const MEDICINES_EXPIRING_SOON: &str = "/api/medicines/expiring_soon/";
pub const MEDICINES_EXPIRED: &str = "/api/medicines/expired/";
pub const MEDICINES_DASHBOARD_STATS: &str = "/api/medicines/dashboard_stats/";
pub const STOCK_TRANSACTIONS: &str = "/api/stock-transactions/";
pub const STOCK_TRANSACTIONS_SUMMARY: &str = "/api/stock-transactions/summary/";

// Procurement
pub const SUPPLIERS: &str = "/api/suppliers/";
pub const PURCHASES: &str = "/api/purchases/";
pub const PURCHASES_CREATE_WITH_ITEMS: &str = "/api/purchases/create_with_items/";
pub const PURCHASES_PENDING_PAYMENTS: &str = "/api/purchases/pending_payments/";
pub const PURCHASES_DASHBOARD_STATS: &str = "/api/purchases/dashboard_stats/";
pub const PURCHASE_ITEMS: &str = "/api/purchase-items/";

// Retail
pub const CUSTOMERS: &str = "/api/customers/";
pub const SALES: &str = "/api/sales/";
pub const SALES_CREATE_WITH_ITEMS: &str = "/api/sales/create_with_items/";
pub const SALES_DAILY_SUMMARY: &str = "/api/sales/daily_summary/";
pub const SALES_TOP_SELLING: &str = "/api/sales/top_selling/";
pub const PAYMENTS: &str = "/api/payments/";

/// Detail path for a collection member: `<collection><id>/`.
pub fn detail(collection: &str, id: impl Display) -> String {
    format!("{collection}{id}/")
}

/// Sub-action path under a collection member: `<collection><id>/<action>/`.
pub fn action(collection: &str, id: impl Display, action: &str) -> String {
    format!("{collection}{id}/{action}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_and_action_paths_keep_trailing_slash() {
        assert_eq!(detail(MEDICINES, "abc"), "/api/medicines/abc/");
        assert_eq!(
            action(SALES, "abc", "process_payment"),
            "/api/sales/abc/process_payment/"
        );
    }
}
