//! services/api/src/web/forms.rs
//!
//! Request bodies for every write, each bound to a fixed validation schema.

use inventory_core::{CustomerDetails, NewCategory, NewProduct, StockMovement};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Highest unit price a product may carry.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("non_negative");
        err.message = Some(Cow::from("Must not be negative"));
        return Err(err);
    }
    Ok(())
}

fn unit_price(value: &Decimal) -> Result<(), ValidationError> {
    non_negative(value)?;
    if *value > MAX_UNIT_PRICE {
        let mut err = ValidationError::new("max_unit_price");
        err.message = Some(Cow::from("Unit price is too large"));
        return Err(err);
    }
    Ok(())
}

/// Blank optional text is stored as `NULL`.
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//=========================================================================================
// Auth
//=========================================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterForm {
    #[validate(length(min = 2, message = "Full name must be at least 2 characters"))]
    pub full_name: String,
    #[validate(length(min = 2, message = "Company name must be at least 2 characters"))]
    pub company_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

//=========================================================================================
// Catalogue
//=========================================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryForm {
    pub fn into_new(self) -> NewCategory {
        NewCategory {
            name: self.name.trim().to_string(),
            description: optional_text(self.description),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductForm {
    #[validate(required)]
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, message = "SKU is required"))]
    pub sku: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(custom = "unit_price")]
    pub unit_price: Decimal,
    #[validate(range(min = 0, message = "Current stock cannot be negative"))]
    pub current_stock: i32,
    #[validate(range(min = 0, message = "Minimum stock cannot be negative"))]
    pub minimum_stock: i32,
}

impl ProductForm {
    /// `None` only when called on a form that has not been validated.
    pub fn into_new(self) -> Option<NewProduct> {
        Some(NewProduct {
            category_id: self.category_id?,
            sku: self.sku.trim().to_string(),
            name: self.name.trim().to_string(),
            description: optional_text(self.description),
            unit_price: self.unit_price,
            current_stock: self.current_stock,
            minimum_stock: self.minimum_stock,
        })
    }
}

//=========================================================================================
// Stock
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MovementInput {
    In,
    Out,
}

impl From<MovementInput> for StockMovement {
    fn from(input: MovementInput) -> Self {
        match input {
            MovementInput::In => StockMovement::In,
            MovementInput::Out => StockMovement::Out,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StockForm {
    #[validate(required)]
    pub product_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Sheet number is required"))]
    pub sheet_number: String,
    #[validate(range(min = 1, message = "Quantity must be greater than 0"))]
    pub quantity: i32,
    #[serde(rename = "type")]
    pub movement: MovementInput,
    #[serde(default)]
    pub notes: Option<String>,
}

impl StockForm {
    pub fn notes(&self) -> Option<String> {
        optional_text(self.notes.clone())
    }
}

//=========================================================================================
// Bills
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BillLineInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BillForm {
    #[validate(length(min = 1, message = "Please fill out all fields and select products."))]
    pub customer_name: String,
    #[validate(length(min = 1, message = "Please fill out all fields and select products."))]
    pub customer_phone: String,
    #[validate(length(min = 1, message = "Please fill out all fields and select products."))]
    pub customer_address: String,
    #[serde(default)]
    #[validate(custom = "non_negative")]
    pub discount: Decimal,
    #[validate(length(min = 1, message = "Please fill out all fields and select products."))]
    pub items: Vec<BillLineInput>,
}

impl BillForm {
    pub fn customer(&self) -> CustomerDetails {
        CustomerDetails {
            name: self.customer_name.clone(),
            phone: self.customer_phone.clone(),
            address: self.customer_address.clone(),
        }
    }
}
