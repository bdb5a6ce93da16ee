//! services/api/src/web/rest.rs
//!
//! The master definition of the OpenAPI specification for the REST API.

use utoipa::OpenApi;

use crate::web::{auth, bills, categories, dashboard, forms, notice, products, stock, views};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::session_handler,
        dashboard::dashboard_handler,
        categories::list_categories_handler,
        categories::create_category_handler,
        categories::update_category_handler,
        categories::delete_category_handler,
        products::list_products_handler,
        products::search_products_handler,
        products::low_stock_handler,
        products::create_product_handler,
        products::update_product_handler,
        products::delete_product_handler,
        stock::list_stock_handler,
        stock::create_stock_handler,
        bills::list_bills_handler,
        bills::create_bill_handler,
        bills::receipt_handler,
    ),
    components(
        schemas(
            notice::Notice,
            notice::NoticeLevel,
            notice::NoticeBody,
            notice::FieldMessage,
            forms::LoginForm,
            forms::RegisterForm,
            forms::CategoryForm,
            forms::ProductForm,
            forms::MovementInput,
            forms::StockForm,
            forms::BillLineInput,
            forms::BillForm,
            auth::AuthResponse,
            auth::SessionResponse,
            products::ProductPage,
            products::SearchPage,
            stock::StockPage,
            views::UserView,
            views::ProfileView,
            views::CategoryView,
            views::ProductView,
            views::StockTransactionView,
            views::BillItemView,
            views::BillView,
            views::DailySalesView,
            views::DashboardView,
        )
    ),
    tags(
        (name = "Inventory API", description = "Categories, products, stock movements, bills and the sales dashboard.")
    )
)]
pub struct ApiDoc;
