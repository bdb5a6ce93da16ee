//! In-memory fakes for every port, plus a harness that drives the real router.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use api_lib::config::Config;
use api_lib::web::{app_router, state::AppState};
use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use inventory_core::{
    AuthProvider, AuthSession, AuthUser, Bill, BillItem, BillLine, Category, InventoryStore,
    NewBill, NewBillItem, NewCategory, NewProduct, NewProfile, NewStockTransaction, PortError,
    PortResult, Product, ProductListing, Profile, ReceiptNotifier, SalesRecord, StockListing,
    StockTransaction,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;
use tracing::Level;
use uuid::Uuid;

pub const VALID_TOKEN: &str = "valid-token";
pub const PASSWORD: &str = "secret1";

pub fn user_id() -> Uuid {
    Uuid::from_u128(0x5eed)
}

//=========================================================================================
// Fake Store
//=========================================================================================

#[derive(Default)]
pub struct Tables {
    pub profiles: Vec<Profile>,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub transactions: Vec<StockTransaction>,
    pub bills: Vec<Bill>,
    pub bill_items: Vec<BillItem>,
    pub sales: Vec<SalesRecord>,
}

/// Keeps rows in memory and counts every call by operation name.
#[derive(Default)]
pub struct FakeStore {
    pub tables: Mutex<Tables>,
    calls: Mutex<HashMap<&'static str, usize>>,
    pub fail_bill_items: Mutex<bool>,
}

impl FakeStore {
    fn hit(&self, operation: &'static str) {
        *self.calls.lock().unwrap().entry(operation).or_default() += 1;
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub fn add_category(&self, name: &str) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            user_id: user_id(),
            name: name.to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.tables.lock().unwrap().categories.push(category.clone());
        category
    }

    pub fn add_product(
        &self,
        category_id: Uuid,
        name: &str,
        unit_price: Decimal,
        current_stock: i32,
        minimum_stock: i32,
    ) -> Product {
        let product = Product {
            id: Uuid::new_v4(),
            user_id: user_id(),
            category_id,
            sku: format!("SKU-{}", name.to_uppercase()),
            name: name.to_string(),
            description: None,
            unit_price,
            current_stock,
            minimum_stock,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.tables.lock().unwrap().products.push(product.clone());
        product
    }

    pub fn add_sale(&self, product_id: Uuid, total_amount: Decimal, days_ago: i64) {
        let at = Utc::now() - chrono::Duration::days(days_ago);
        self.tables.lock().unwrap().sales.push(SalesRecord {
            id: Uuid::new_v4(),
            user_id: user_id(),
            product_id,
            quantity: 1,
            unit_price: total_amount,
            total_amount,
            transaction_date: at,
            created_at: at,
        });
    }

    fn not_found(what: &str, id: Uuid) -> PortError {
        PortError::NotFound(format!("{} {}", what, id))
    }
}

#[async_trait]
impl InventoryStore for FakeStore {
    async fn create_profile(&self, profile: NewProfile) -> PortResult<Profile> {
        self.hit("create_profile");
        let row = Profile {
            id: profile.id,
            full_name: profile.full_name,
            company_name: profile.company_name,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.tables.lock().unwrap().profiles.push(row.clone());
        Ok(row)
    }

    async fn get_profile(&self, user_id: Uuid) -> PortResult<Profile> {
        self.hit("get_profile");
        self.tables
            .lock()
            .unwrap()
            .profiles
            .iter()
            .find(|p| p.id == user_id)
            .cloned()
            .ok_or_else(|| Self::not_found("profile", user_id))
    }

    async fn list_categories(&self, user_id: Uuid) -> PortResult<Vec<Category>> {
        self.hit("list_categories");
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .categories
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn create_category(&self, user_id: Uuid, category: NewCategory) -> PortResult<Category> {
        self.hit("create_category");
        let row = Category {
            id: Uuid::new_v4(),
            user_id,
            name: category.name,
            description: category.description,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.tables.lock().unwrap().categories.push(row.clone());
        Ok(row)
    }

    async fn update_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        category: NewCategory,
    ) -> PortResult<Category> {
        self.hit("update_category");
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .categories
            .iter_mut()
            .find(|c| c.id == category_id && c.user_id == user_id)
            .ok_or_else(|| Self::not_found("category", category_id))?;
        row.name = category.name;
        row.description = category.description;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_category(&self, user_id: Uuid, category_id: Uuid) -> PortResult<()> {
        self.hit("delete_category");
        let mut tables = self.tables.lock().unwrap();
        if tables.products.iter().any(|p| p.category_id == category_id) {
            return Err(PortError::Rejected(
                "Category is still used by products".to_string(),
            ));
        }
        tables
            .categories
            .retain(|c| !(c.id == category_id && c.user_id == user_id));
        Ok(())
    }

    async fn list_products(&self, user_id: Uuid) -> PortResult<Vec<ProductListing>> {
        self.hit("list_products");
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .products
            .iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| ProductListing {
                category_name: tables
                    .categories
                    .iter()
                    .find(|c| c.id == p.category_id)
                    .map(|c| c.name.clone()),
                product: p.clone(),
            })
            .collect();
        rows.sort_by(|a, b| a.product.name.cmp(&b.product.name));
        Ok(rows)
    }

    async fn search_products(
        &self,
        user_id: Uuid,
        query: &str,
        offset: i64,
        limit: i64,
    ) -> PortResult<Vec<Product>> {
        self.hit("search_products");
        let needle = query.to_lowercase();
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .products
            .iter()
            .filter(|p| p.user_id == user_id && p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn get_product(&self, user_id: Uuid, product_id: Uuid) -> PortResult<Product> {
        self.hit("get_product");
        self.tables
            .lock()
            .unwrap()
            .products
            .iter()
            .find(|p| p.id == product_id && p.user_id == user_id)
            .cloned()
            .ok_or_else(|| Self::not_found("product", product_id))
    }

    async fn create_product(&self, user_id: Uuid, product: NewProduct) -> PortResult<Product> {
        self.hit("create_product");
        let row = Product {
            id: Uuid::new_v4(),
            user_id,
            category_id: product.category_id,
            sku: product.sku,
            name: product.name,
            description: product.description,
            unit_price: product.unit_price,
            current_stock: product.current_stock,
            minimum_stock: product.minimum_stock,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.tables.lock().unwrap().products.push(row.clone());
        Ok(row)
    }

    async fn update_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        product: NewProduct,
    ) -> PortResult<Product> {
        self.hit("update_product");
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .products
            .iter_mut()
            .find(|p| p.id == product_id && p.user_id == user_id)
            .ok_or_else(|| Self::not_found("product", product_id))?;
        row.category_id = product.category_id;
        row.sku = product.sku;
        row.name = product.name;
        row.description = product.description;
        row.unit_price = product.unit_price;
        row.current_stock = product.current_stock;
        row.minimum_stock = product.minimum_stock;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_product(&self, user_id: Uuid, product_id: Uuid) -> PortResult<()> {
        self.hit("delete_product");
        self.tables
            .lock()
            .unwrap()
            .products
            .retain(|p| !(p.id == product_id && p.user_id == user_id));
        Ok(())
    }

    async fn count_products(&self, user_id: Uuid) -> PortResult<i64> {
        self.hit("count_products");
        let tables = self.tables.lock().unwrap();
        Ok(tables.products.iter().filter(|p| p.user_id == user_id).count() as i64)
    }

    async fn low_stock_products(&self, user_id: Uuid) -> PortResult<Vec<Product>> {
        self.hit("low_stock_products");
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .products
            .iter()
            .filter(|p| p.user_id == user_id && p.is_low_stock())
            .cloned()
            .collect())
    }

    async fn list_stock_transactions(&self, user_id: Uuid) -> PortResult<Vec<StockListing>> {
        self.hit("list_stock_transactions");
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .map(|t| StockListing {
                product_name: tables
                    .products
                    .iter()
                    .find(|p| p.id == t.product_id)
                    .map(|p| p.name.clone()),
                transaction: t.clone(),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.transaction
                .transaction_date
                .cmp(&a.transaction.transaction_date)
        });
        Ok(rows)
    }

    async fn create_stock_transaction(
        &self,
        user_id: Uuid,
        transaction: NewStockTransaction,
    ) -> PortResult<StockTransaction> {
        self.hit("create_stock_transaction");
        let row = StockTransaction {
            id: Uuid::new_v4(),
            user_id,
            product_id: transaction.product_id,
            sheet_number: transaction.sheet_number,
            quantity: transaction.quantity,
            movement: transaction.movement,
            notes: transaction.notes,
            transaction_date: transaction.transaction_date,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().transactions.push(row.clone());
        Ok(row)
    }

    async fn list_bills(&self, user_id: Uuid) -> PortResult<Vec<Bill>> {
        self.hit("list_bills");
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .bills
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get_bill(&self, user_id: Uuid, bill_id: Uuid) -> PortResult<Bill> {
        self.hit("get_bill");
        self.tables
            .lock()
            .unwrap()
            .bills
            .iter()
            .find(|b| b.id == bill_id && b.user_id == user_id)
            .cloned()
            .ok_or_else(|| Self::not_found("bill", bill_id))
    }

    async fn list_bill_items(&self, bill_id: Uuid) -> PortResult<Vec<BillLine>> {
        self.hit("list_bill_items");
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .bill_items
            .iter()
            .filter(|i| i.bill_id == bill_id)
            .map(|i| BillLine {
                product_name: tables
                    .products
                    .iter()
                    .find(|p| p.id == i.product_id)
                    .map(|p| p.name.clone()),
                item: i.clone(),
            })
            .collect())
    }

    async fn create_bill(&self, user_id: Uuid, bill: NewBill) -> PortResult<Bill> {
        self.hit("create_bill");
        let row = Bill {
            id: Uuid::new_v4(),
            user_id,
            customer_name: bill.customer_name,
            customer_phone: bill.customer_phone,
            customer_address: bill.customer_address,
            sub_total: bill.sub_total,
            discount: bill.discount,
            total: bill.total,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().bills.push(row.clone());
        Ok(row)
    }

    async fn create_bill_items(
        &self,
        _user_id: Uuid,
        bill_id: Uuid,
        items: Vec<NewBillItem>,
    ) -> PortResult<Vec<BillItem>> {
        self.hit("create_bill_items");
        if *self.fail_bill_items.lock().unwrap() {
            return Err(PortError::Unexpected("connection reset".to_string()));
        }
        let rows: Vec<_> = items
            .into_iter()
            .map(|item| BillItem {
                id: Uuid::new_v4(),
                bill_id,
                product_id: item.product_id,
                quantity: item.quantity,
                total_price: item.total_price,
            })
            .collect();
        self.tables
            .lock()
            .unwrap()
            .bill_items
            .extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn list_sales_records(&self, user_id: Uuid) -> PortResult<Vec<SalesRecord>> {
        self.hit("list_sales_records");
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .sales
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }
}

//=========================================================================================
// Fake Auth & Notifier
//=========================================================================================

/// Accepts `VALID_TOKEN` and the password `PASSWORD` for any e-mail.
pub struct FakeAuth;

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn sign_up(&self, email: &str, _password: &str) -> PortResult<AuthUser> {
        if email == "taken@shop.pk" {
            return Err(PortError::Rejected("User already registered".to_string()));
        }
        Ok(AuthUser {
            id: user_id(),
            email: Some(email.to_string()),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> PortResult<AuthSession> {
        if password != PASSWORD {
            return Err(PortError::Unauthorized);
        }
        Ok(AuthSession {
            access_token: VALID_TOKEN.to_string(),
            expires_in: 3600,
            user: AuthUser {
                id: user_id(),
                email: Some(email.to_string()),
            },
        })
    }

    async fn sign_out(&self, _access_token: &str) -> PortResult<()> {
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> PortResult<AuthUser> {
        if access_token != VALID_TOKEN {
            return Err(PortError::Unauthorized);
        }
        Ok(AuthUser {
            id: user_id(),
            email: Some("owner@shop.pk".to_string()),
        })
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ReceiptNotifier for FakeNotifier {
    async fn send_receipt(&self, to_phone: &str, message: &str) -> PortResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to_phone.to_string(), message.to_string()));
        Ok(())
    }
}

//=========================================================================================
// Harness
//=========================================================================================

pub fn test_config() -> Config {
    Config {
        bind_address: SocketAddr::from(([127, 0, 0, 1], 0)),
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        log_level: Level::DEBUG,
        supabase_url: "http://localhost:54321".to_string(),
        supabase_anon_key: "anon".to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        shop_name: "Corner Store".to_string(),
        twilio: None,
    }
}

pub struct TestApp {
    router: Router,
    pub store: Arc<FakeStore>,
    pub notifier: Arc<FakeNotifier>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(FakeStore::default());
        let notifier = Arc::new(FakeNotifier::default());
        let state = Arc::new(AppState {
            store: store.clone(),
            auth: Arc::new(FakeAuth),
            notifier: Some(notifier.clone()),
            config: Arc::new(test_config()),
        });
        Self {
            router: app_router(state),
            store,
            notifier,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("session={}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    pub async fn request_authenticated(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response {
        self.request(method, uri, body, Some(VALID_TOKEN)).await
    }
}

pub async fn response_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    (status, serde_json::from_slice(&bytes).expect("json response"))
}

pub async fn response_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Reads a decimal the API serialized as a JSON string.
pub fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("not a decimal string: {}", value))
}
