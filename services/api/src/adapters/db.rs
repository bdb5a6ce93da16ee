//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, the concrete implementation of
//! the `InventoryStore` port. It talks to the hosted backend's Postgres tables
//! with `sqlx`. The schema itself is owned by the backend; this adapter only
//! reads and writes rows, always scoped to the signed-in user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use inventory_core::domain::{
    Bill, BillItem, BillLine, Category, NewBill, NewBillItem, NewCategory, NewProduct,
    NewProfile, NewStockTransaction, Product, ProductListing, Profile, SalesRecord, StockListing,
    StockTransaction,
};
use inventory_core::ports::{InventoryStore, PortError, PortResult};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `InventoryStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cheap round-trip used at startup to fail fast on a bad connection string.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Maps a driver error onto the port's error vocabulary.
fn port_error(e: sqlx::Error, what: impl std::fmt::Display) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what.to_string()),
        sqlx::Error::Database(db) if db.constraint().is_some() => {
            PortError::Rejected(db.message().to_string())
        }
        other => PortError::Unexpected(other.to_string()),
    }
}

const PRODUCT_COLUMNS: &str = "id, user_id, category_id, sku, name, description, unit_price, \
     current_stock, minimum_stock, created_at, updated_at";

const BILL_COLUMNS: &str = "id, user_id, customer_name, customer_phone, customer_address, \
     sub_total, discount, total, created_at";

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ProfileRecord {
    id: Uuid,
    full_name: String,
    company_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl ProfileRecord {
    fn to_domain(self) -> Profile {
        Profile {
            id: self.id,
            full_name: self.full_name,
            company_name: self.company_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct CategoryRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl CategoryRecord {
    fn to_domain(self) -> Category {
        Category {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ProductRecord {
    id: Uuid,
    user_id: Uuid,
    category_id: Uuid,
    sku: String,
    name: String,
    description: Option<String>,
    unit_price: Decimal,
    current_stock: i32,
    minimum_stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl ProductRecord {
    fn to_domain(self) -> Product {
        Product {
            id: self.id,
            user_id: self.user_id,
            category_id: self.category_id,
            sku: self.sku,
            name: self.name,
            description: self.description,
            unit_price: self.unit_price,
            current_stock: self.current_stock,
            minimum_stock: self.minimum_stock,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ProductListingRecord {
    #[sqlx(flatten)]
    product: ProductRecord,
    category_name: Option<String>,
}

#[derive(FromRow)]
struct StockTransactionRecord {
    id: Uuid,
    user_id: Uuid,
    product_id: Uuid,
    sheet_number: String,
    quantity: i32,
    movement: String,
    notes: Option<String>,
    transaction_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}
impl StockTransactionRecord {
    fn to_domain(self) -> PortResult<StockTransaction> {
        let movement = self
            .movement
            .parse()
            .map_err(|e: inventory_core::domain::UnknownMovement| {
                PortError::Unexpected(e.to_string())
            })?;
        Ok(StockTransaction {
            id: self.id,
            user_id: self.user_id,
            product_id: self.product_id,
            sheet_number: self.sheet_number,
            quantity: self.quantity,
            movement,
            notes: self.notes,
            transaction_date: self.transaction_date,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct StockListingRecord {
    #[sqlx(flatten)]
    transaction: StockTransactionRecord,
    product_name: Option<String>,
}

#[derive(FromRow)]
struct BillRecord {
    id: Uuid,
    user_id: Uuid,
    customer_name: String,
    customer_phone: String,
    customer_address: String,
    sub_total: Decimal,
    discount: Decimal,
    total: Decimal,
    created_at: DateTime<Utc>,
}
impl BillRecord {
    fn to_domain(self) -> Bill {
        Bill {
            id: self.id,
            user_id: self.user_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            customer_address: self.customer_address,
            sub_total: self.sub_total,
            discount: self.discount,
            total: self.total,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct BillItemRecord {
    id: Uuid,
    bill_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    total_price: Decimal,
}
impl BillItemRecord {
    fn to_domain(self) -> BillItem {
        BillItem {
            id: self.id,
            bill_id: self.bill_id,
            product_id: self.product_id,
            quantity: self.quantity,
            total_price: self.total_price,
        }
    }
}

#[derive(FromRow)]
struct BillLineRecord {
    #[sqlx(flatten)]
    item: BillItemRecord,
    product_name: Option<String>,
}

#[derive(FromRow)]
struct SalesRecordRow {
    id: Uuid,
    user_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    unit_price: Decimal,
    total_amount: Decimal,
    transaction_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}
impl SalesRecordRow {
    fn to_domain(self) -> SalesRecord {
        SalesRecord {
            id: self.id,
            user_id: self.user_id,
            product_id: self.product_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_amount: self.total_amount,
            transaction_date: self.transaction_date,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `InventoryStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl InventoryStore for DbAdapter {
    // --- Profiles ---

    async fn create_profile(&self, profile: NewProfile) -> PortResult<Profile> {
        let record = sqlx::query_as::<_, ProfileRecord>(
            "INSERT INTO profiles (id, full_name, company_name) VALUES ($1, $2, $3) \
             RETURNING id, full_name, company_name, created_at, updated_at",
        )
        .bind(profile.id)
        .bind(&profile.full_name)
        .bind(&profile.company_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, format!("Profile {}", profile.id)))?;
        Ok(record.to_domain())
    }

    async fn get_profile(&self, user_id: Uuid) -> PortResult<Profile> {
        let record = sqlx::query_as::<_, ProfileRecord>(
            "SELECT id, full_name, company_name, created_at, updated_at FROM profiles WHERE id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, format!("Profile {} not found", user_id)))?;
        Ok(record.to_domain())
    }

    // --- Categories ---

    async fn list_categories(&self, user_id: Uuid) -> PortResult<Vec<Category>> {
        let records = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, user_id, name, description, created_at, updated_at \
             FROM categories WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| port_error(e, "categories"))?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn create_category(&self, user_id: Uuid, category: NewCategory) -> PortResult<Category> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            "INSERT INTO categories (user_id, name, description) VALUES ($1, $2, $3) \
             RETURNING id, user_id, name, description, created_at, updated_at",
        )
        .bind(user_id)
        .bind(&category.name)
        .bind(&category.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, "category"))?;
        Ok(record.to_domain())
    }

    async fn update_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        category: NewCategory,
    ) -> PortResult<Category> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            "UPDATE categories SET name = $1, description = $2, updated_at = now() \
             WHERE id = $3 AND user_id = $4 \
             RETURNING id, user_id, name, description, created_at, updated_at",
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(category_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, format!("Category {} not found", category_id)))?;
        Ok(record.to_domain())
    }

    async fn delete_category(&self, user_id: Uuid, category_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(category_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| port_error(e, format!("Category {}", category_id)))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Category {} not found", category_id)));
        }
        Ok(())
    }

    // --- Products ---

    async fn list_products(&self, user_id: Uuid) -> PortResult<Vec<ProductListing>> {
        let records = sqlx::query_as::<_, ProductListingRecord>(
            "SELECT p.id, p.user_id, p.category_id, p.sku, p.name, p.description, p.unit_price, \
                    p.current_stock, p.minimum_stock, p.created_at, p.updated_at, \
                    c.name AS category_name \
             FROM products p LEFT JOIN categories c ON c.id = p.category_id \
             WHERE p.user_id = $1 ORDER BY p.name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| port_error(e, "products"))?;

        Ok(records
            .into_iter()
            .map(|r| ProductListing {
                product: r.product.to_domain(),
                category_name: r.category_name,
            })
            .collect())
    }

    async fn search_products(
        &self,
        user_id: Uuid,
        query: &str,
        offset: i64,
        limit: i64,
    ) -> PortResult<Vec<Product>> {
        let pattern = format!("%{}%", escape_like(query));
        let records = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE user_id = $1 AND name ILIKE $2 \
             ORDER BY name ASC OFFSET $3 LIMIT $4"
        ))
        .bind(user_id)
        .bind(pattern)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| port_error(e, "products"))?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_product(&self, user_id: Uuid, product_id: Uuid) -> PortResult<Product> {
        let record = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND user_id = $2"
        ))
        .bind(product_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, format!("Product {} not found", product_id)))?;
        Ok(record.to_domain())
    }

    async fn create_product(&self, user_id: Uuid, product: NewProduct) -> PortResult<Product> {
        let record = sqlx::query_as::<_, ProductRecord>(&format!(
            "INSERT INTO products \
             (user_id, category_id, sku, name, description, unit_price, current_stock, minimum_stock) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(user_id)
        .bind(product.category_id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.unit_price)
        .bind(product.current_stock)
        .bind(product.minimum_stock)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, "product"))?;
        Ok(record.to_domain())
    }

    async fn update_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        product: NewProduct,
    ) -> PortResult<Product> {
        let record = sqlx::query_as::<_, ProductRecord>(&format!(
            "UPDATE products SET category_id = $1, sku = $2, name = $3, description = $4, \
             unit_price = $5, current_stock = $6, minimum_stock = $7, updated_at = now() \
             WHERE id = $8 AND user_id = $9 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(product.category_id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.unit_price)
        .bind(product.current_stock)
        .bind(product.minimum_stock)
        .bind(product_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, format!("Product {} not found", product_id)))?;
        Ok(record.to_domain())
    }

    async fn delete_product(&self, user_id: Uuid, product_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND user_id = $2")
            .bind(product_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| port_error(e, format!("Product {}", product_id)))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Product {} not found", product_id)));
        }
        Ok(())
    }

    async fn count_products(&self, user_id: Uuid) -> PortResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| port_error(e, "product count"))
    }

    async fn low_stock_products(&self, user_id: Uuid) -> PortResult<Vec<Product>> {
        let records = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE user_id = $1 AND current_stock <= minimum_stock \
             ORDER BY current_stock ASC, name ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| port_error(e, "low stock products"))?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    // --- Stock ---

    async fn list_stock_transactions(&self, user_id: Uuid) -> PortResult<Vec<StockListing>> {
        let records = sqlx::query_as::<_, StockListingRecord>(
            "SELECT t.id, t.user_id, t.product_id, t.sheet_number, t.quantity, t.type AS movement, \
                    t.notes, t.transaction_date, t.created_at, p.name AS product_name \
             FROM stock_transactions t LEFT JOIN products p ON p.id = t.product_id \
             WHERE t.user_id = $1 ORDER BY t.transaction_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| port_error(e, "stock transactions"))?;

        records
            .into_iter()
            .map(|r| {
                Ok(StockListing {
                    transaction: r.transaction.to_domain()?,
                    product_name: r.product_name,
                })
            })
            .collect()
    }

    async fn create_stock_transaction(
        &self,
        user_id: Uuid,
        transaction: NewStockTransaction,
    ) -> PortResult<StockTransaction> {
        let record = sqlx::query_as::<_, StockTransactionRecord>(
            "INSERT INTO stock_transactions \
             (user_id, product_id, sheet_number, quantity, type, notes, transaction_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, user_id, product_id, sheet_number, quantity, type AS movement, \
                       notes, transaction_date, created_at",
        )
        .bind(user_id)
        .bind(transaction.product_id)
        .bind(&transaction.sheet_number)
        .bind(transaction.quantity)
        .bind(transaction.movement.as_str())
        .bind(&transaction.notes)
        .bind(transaction.transaction_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, "stock transaction"))?;
        record.to_domain()
    }

    // --- Bills ---

    async fn list_bills(&self, user_id: Uuid) -> PortResult<Vec<Bill>> {
        let records = sqlx::query_as::<_, BillRecord>(&format!(
            "SELECT {BILL_COLUMNS} FROM bills WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| port_error(e, "bills"))?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_bill(&self, user_id: Uuid, bill_id: Uuid) -> PortResult<Bill> {
        let record = sqlx::query_as::<_, BillRecord>(&format!(
            "SELECT {BILL_COLUMNS} FROM bills WHERE id = $1 AND user_id = $2"
        ))
        .bind(bill_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, format!("Bill {} not found", bill_id)))?;
        Ok(record.to_domain())
    }

    async fn list_bill_items(&self, bill_id: Uuid) -> PortResult<Vec<BillLine>> {
        let records = sqlx::query_as::<_, BillLineRecord>(
            "SELECT i.id, i.bill_id, i.product_id, i.quantity, i.total_price, \
                    p.name AS product_name \
             FROM bill_items i LEFT JOIN products p ON p.id = i.product_id \
             WHERE i.bill_id = $1",
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| port_error(e, format!("items of bill {}", bill_id)))?;

        Ok(records
            .into_iter()
            .map(|r| BillLine {
                item: r.item.to_domain(),
                product_name: r.product_name,
            })
            .collect())
    }

    async fn create_bill(&self, user_id: Uuid, bill: NewBill) -> PortResult<Bill> {
        let record = sqlx::query_as::<_, BillRecord>(&format!(
            "INSERT INTO bills \
             (user_id, customer_name, customer_phone, customer_address, sub_total, discount, total) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {BILL_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&bill.customer_name)
        .bind(&bill.customer_phone)
        .bind(&bill.customer_address)
        .bind(bill.sub_total)
        .bind(bill.discount)
        .bind(bill.total)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, "bill"))?;
        Ok(record.to_domain())
    }

    async fn create_bill_items(
        &self,
        user_id: Uuid,
        bill_id: Uuid,
        items: Vec<NewBillItem>,
    ) -> PortResult<Vec<BillItem>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        // One multi-row insert, like a single batch request against the table.
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO bill_items (bill_id, product_id, quantity, total_price, user_id) ",
        );
        builder.push_values(&items, |mut row, item| {
            row.push_bind(bill_id)
                .push_bind(item.product_id)
                .push_bind(item.quantity)
                .push_bind(item.total_price)
                .push_bind(user_id);
        });
        builder.push(" RETURNING id, bill_id, product_id, quantity, total_price");

        let records = builder
            .build_query_as::<BillItemRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| port_error(e, format!("items of bill {}", bill_id)))?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    // --- Sales ---

    async fn list_sales_records(&self, user_id: Uuid) -> PortResult<Vec<SalesRecord>> {
        let records = sqlx::query_as::<_, SalesRecordRow>(
            "SELECT id, user_id, product_id, quantity, unit_price, total_amount, \
                    transaction_date, created_at \
             FROM sales_records WHERE user_id = $1 ORDER BY transaction_date ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| port_error(e, "sales records"))?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}

/// Escapes `LIKE` wildcards so a search term matches literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
