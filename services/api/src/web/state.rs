//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-request identity
//! inserted by the auth middleware.

use crate::config::Config;
use inventory_core::ports::{AuthProvider, InventoryStore, ReceiptNotifier};
use std::sync::Arc;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InventoryStore>,
    pub auth: Arc<dyn AuthProvider>,
    /// `None` when no messaging credentials are configured.
    pub notifier: Option<Arc<dyn ReceiptNotifier>>,
    pub config: Arc<Config>,
}

//=========================================================================================
// CurrentUser (Specific to One Request)
//=========================================================================================

/// The signed-in user behind the request's session token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub access_token: String,
}
