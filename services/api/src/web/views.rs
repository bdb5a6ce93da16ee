//! services/api/src/web/views.rs
//!
//! Serializable views of the domain rows returned by the REST API.

use chrono::{DateTime, NaiveDate, Utc};
use inventory_core::format::{format_currency, format_date_time};
use inventory_core::{
    AuthUser, BillLine, BillWithItems, Category, DailySales, DashboardStats, Product,
    ProductListing, Profile, StockListing,
};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserView {
    pub id: Uuid,
    pub email: Option<String>,
}

impl From<AuthUser> for UserView {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileView {
    pub id: Uuid,
    pub full_name: String,
    pub company_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            full_name: profile.full_name,
            company_name: profile.company_name,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductView {
    pub id: Uuid,
    pub category_id: Uuid,
    pub category_name: Option<String>,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    /// Compact price label, e.g. `RS 1.5K`.
    pub unit_price_display: String,
    pub current_stock: i32,
    pub minimum_stock: i32,
    pub low_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductView {
    fn build(product: Product, category_name: Option<String>) -> Self {
        Self {
            low_stock: product.is_low_stock(),
            unit_price_display: format_currency(product.unit_price),
            id: product.id,
            category_id: product.category_id,
            category_name,
            sku: product.sku,
            name: product.name,
            description: product.description,
            unit_price: product.unit_price,
            current_stock: product.current_stock,
            minimum_stock: product.minimum_stock,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self::build(product, None)
    }
}

impl From<ProductListing> for ProductView {
    fn from(listing: ProductListing) -> Self {
        Self::build(listing.product, listing.category_name)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockTransactionView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: Option<String>,
    pub sheet_number: String,
    pub quantity: i32,
    #[serde(rename = "type")]
    pub movement: String,
    pub notes: Option<String>,
    pub transaction_date: DateTime<Utc>,
    /// `3/7/2024, 4:05 PM`
    pub transaction_date_display: String,
}

impl From<StockListing> for StockTransactionView {
    fn from(listing: StockListing) -> Self {
        let t = listing.transaction;
        Self {
            id: t.id,
            product_id: t.product_id,
            product_name: listing.product_name,
            sheet_number: t.sheet_number,
            quantity: t.quantity,
            movement: t.movement.to_string(),
            notes: t.notes,
            transaction_date_display: format_date_time(t.transaction_date),
            transaction_date: t.transaction_date,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BillItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub total_price: Decimal,
}

impl From<BillLine> for BillItemView {
    fn from(line: BillLine) -> Self {
        Self {
            product_name: line.display_name().to_string(),
            id: line.item.id,
            product_id: line.item.product_id,
            quantity: line.item.quantity,
            total_price: line.item.total_price,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BillView {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub sub_total: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub items: Vec<BillItemView>,
}

impl From<BillWithItems> for BillView {
    fn from(receipt: BillWithItems) -> Self {
        let bill = receipt.bill;
        Self {
            id: bill.id,
            customer_name: bill.customer_name,
            customer_phone: bill.customer_phone,
            customer_address: bill.customer_address,
            sub_total: bill.sub_total,
            discount: bill.discount,
            total: bill.total,
            created_at: bill.created_at,
            items: receipt.items.into_iter().map(BillItemView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailySalesView {
    pub date: NaiveDate,
    pub label: String,
    pub amount: Decimal,
}

impl From<DailySales> for DailySalesView {
    fn from(day: DailySales) -> Self {
        Self {
            date: day.date,
            label: day.label,
            amount: day.amount,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardView {
    pub today_sales: Decimal,
    pub today_sales_display: String,
    pub total_revenue: Decimal,
    pub total_revenue_display: String,
    pub total_products: i64,
    pub low_stock: usize,
    pub sales_trend: Vec<DailySalesView>,
}

impl From<DashboardStats> for DashboardView {
    fn from(stats: DashboardStats) -> Self {
        Self {
            today_sales_display: format_currency(stats.today_sales),
            total_revenue_display: format_currency(stats.total_revenue),
            today_sales: stats.today_sales,
            total_revenue: stats.total_revenue,
            total_products: stats.total_products,
            low_stock: stats.low_stock,
            sales_trend: stats
                .sales_trend
                .into_iter()
                .map(DailySalesView::from)
                .collect(),
        }
    }
}
