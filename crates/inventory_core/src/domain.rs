//! crates/inventory_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs mirror the rows of the hosted backend's tables but are
//! independent of any database driver or serialization format.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Shown wherever a bill item's product row has since been deleted.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

//=========================================================================================
// Users & Profiles
//=========================================================================================

/// The user as known to the hosted auth provider.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// A signed-in session issued by the auth provider.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub expires_in: i64,
    pub user: AuthUser,
}

/// One profile per authenticated user, created at registration.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub company_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: Uuid,
    pub full_name: String,
    pub company_name: String,
}

//=========================================================================================
// Catalogue
//=========================================================================================

#[derive(Debug, Clone)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The writable fields of a category, used for both insert and update.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub current_stock: i32,
    pub minimum_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// A product is low on stock once it is at or below its configured minimum.
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.minimum_stock
    }
}

/// A product row joined with the name of its category.
#[derive(Debug, Clone)]
pub struct ProductListing {
    pub product: Product,
    pub category_name: Option<String>,
}

/// The writable fields of a product, used for both insert and update.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub current_stock: i32,
    pub minimum_stock: i32,
}

//=========================================================================================
// Stock Movements
//=========================================================================================

/// Direction of a stock transaction. Stored as `in` / `out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockMovement {
    In,
    Out,
}

impl StockMovement {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockMovement::In => "in",
            StockMovement::Out => "out",
        }
    }
}

impl fmt::Display for StockMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stock movement type '{0}'")]
pub struct UnknownMovement(pub String);

impl FromStr for StockMovement {
    type Err = UnknownMovement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(StockMovement::In),
            "out" => Ok(StockMovement::Out),
            other => Err(UnknownMovement(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StockTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub sheet_number: String,
    pub quantity: i32,
    pub movement: StockMovement,
    pub notes: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A stock transaction joined with the name of its product.
#[derive(Debug, Clone)]
pub struct StockListing {
    pub transaction: StockTransaction,
    pub product_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewStockTransaction {
    pub product_id: Uuid,
    pub sheet_number: String,
    pub quantity: i32,
    pub movement: StockMovement,
    pub notes: Option<String>,
    pub transaction_date: DateTime<Utc>,
}

//=========================================================================================
// Bills
//=========================================================================================

/// A customer invoice. Its line items live in `bill_items`.
#[derive(Debug, Clone)]
pub struct Bill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub sub_total: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BillItem {
    pub id: Uuid,
    pub bill_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub total_price: Decimal,
}

/// A bill item joined with the name of its product, if the product still exists.
#[derive(Debug, Clone)]
pub struct BillLine {
    pub item: BillItem,
    pub product_name: Option<String>,
}

impl BillLine {
    pub fn display_name(&self) -> &str {
        self.product_name.as_deref().unwrap_or(UNKNOWN_PRODUCT)
    }
}

#[derive(Debug, Clone)]
pub struct BillWithItems {
    pub bill: Bill,
    pub items: Vec<BillLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub sub_total: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBillItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub total_price: Decimal,
}

//=========================================================================================
// Sales
//=========================================================================================

#[derive(Debug, Clone)]
pub struct SalesRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
