//! crates/inventory_core/src/ports.rs
//!
//! Defines the service contracts (traits) the application relies on.
//! The hosted backend's tables, its authentication endpoints, and the
//! messaging API all sit behind these traits so the web layer never talks
//! to a concrete driver.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    AuthSession, AuthUser, Bill, BillItem, BillLine, Category, NewBill, NewBillItem, NewCategory,
    NewProduct, NewProfile, NewStockTransaction, Product, ProductListing, Profile, SalesRecord,
    StockListing, StockTransaction,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    /// The backend refused the write (constraint violation, duplicate account, ...).
    #[error("Rejected by backend: {0}")]
    Rejected(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The remote tables. Every call is scoped to the signed-in user.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    // --- Profiles ---
    async fn create_profile(&self, profile: NewProfile) -> PortResult<Profile>;

    async fn get_profile(&self, user_id: Uuid) -> PortResult<Profile>;

    // --- Categories ---
    async fn list_categories(&self, user_id: Uuid) -> PortResult<Vec<Category>>;

    async fn create_category(&self, user_id: Uuid, category: NewCategory) -> PortResult<Category>;

    async fn update_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        category: NewCategory,
    ) -> PortResult<Category>;

    async fn delete_category(&self, user_id: Uuid, category_id: Uuid) -> PortResult<()>;

    // --- Products ---
    async fn list_products(&self, user_id: Uuid) -> PortResult<Vec<ProductListing>>;

    /// Case-insensitive name search, one page at a time.
    async fn search_products(
        &self,
        user_id: Uuid,
        query: &str,
        offset: i64,
        limit: i64,
    ) -> PortResult<Vec<Product>>;

    async fn get_product(&self, user_id: Uuid, product_id: Uuid) -> PortResult<Product>;

    async fn create_product(&self, user_id: Uuid, product: NewProduct) -> PortResult<Product>;

    async fn update_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        product: NewProduct,
    ) -> PortResult<Product>;

    async fn delete_product(&self, user_id: Uuid, product_id: Uuid) -> PortResult<()>;

    async fn count_products(&self, user_id: Uuid) -> PortResult<i64>;

    /// Products whose current stock is at or below their minimum.
    async fn low_stock_products(&self, user_id: Uuid) -> PortResult<Vec<Product>>;

    // --- Stock ---
    async fn list_stock_transactions(&self, user_id: Uuid) -> PortResult<Vec<StockListing>>;

    async fn create_stock_transaction(
        &self,
        user_id: Uuid,
        transaction: NewStockTransaction,
    ) -> PortResult<StockTransaction>;

    // --- Bills ---
    async fn list_bills(&self, user_id: Uuid) -> PortResult<Vec<Bill>>;

    async fn get_bill(&self, user_id: Uuid, bill_id: Uuid) -> PortResult<Bill>;

    async fn list_bill_items(&self, bill_id: Uuid) -> PortResult<Vec<BillLine>>;

    async fn create_bill(&self, user_id: Uuid, bill: NewBill) -> PortResult<Bill>;

    async fn create_bill_items(
        &self,
        user_id: Uuid,
        bill_id: Uuid,
        items: Vec<NewBillItem>,
    ) -> PortResult<Vec<BillItem>>;

    // --- Sales ---
    async fn list_sales_records(&self, user_id: Uuid) -> PortResult<Vec<SalesRecord>>;
}

/// Session-based authentication delegated to the hosted backend.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> PortResult<AuthUser>;

    async fn sign_in(&self, email: &str, password: &str) -> PortResult<AuthSession>;

    async fn sign_out(&self, access_token: &str) -> PortResult<()>;

    /// Resolves the user behind a session token; `Unauthorized` when it is stale.
    async fn get_user(&self, access_token: &str) -> PortResult<AuthUser>;
}

#[async_trait]
pub trait ReceiptNotifier: Send + Sync {
    /// Delivers a plain-text receipt to a phone number.
    async fn send_receipt(&self, to_phone: &str, message: &str) -> PortResult<()>;
}
