pub mod billing;
pub mod dashboard;
pub mod domain;
pub mod format;
pub mod ports;
pub mod receipt;
pub mod stock;

pub use billing::{BillDraft, BillSummary, BillingError, CustomerDetails};
pub use dashboard::{summarize, DailySales, DashboardStats};
pub use domain::{
    AuthSession, AuthUser, Bill, BillItem, BillLine, BillWithItems, Category, NewBill,
    NewBillItem, NewCategory, NewProduct, NewProfile, NewStockTransaction, Product,
    ProductListing, Profile, SalesRecord, StockListing, StockMovement, StockTransaction,
};
pub use ports::{AuthProvider, InventoryStore, PortError, PortResult, ReceiptNotifier};
pub use stock::StockError;
