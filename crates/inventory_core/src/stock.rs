//! crates/inventory_core/src/stock.rs
//!
//! Stock availability checks shared by the bill form and outbound stock
//! transactions.

use uuid::Uuid;

use crate::domain::{Product, StockMovement};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StockError {
    #[error("Quantity must be greater than 0")]
    NonPositiveQuantity,
    #[error("Quantity exceeds available stock.")]
    Insufficient {
        product_id: Uuid,
        requested: i32,
        available: i32,
    },
}

/// Checks that `requested` units can be taken out of `product`.
pub fn ensure_available(product: &Product, requested: i32) -> Result<(), StockError> {
    if requested <= 0 {
        return Err(StockError::NonPositiveQuantity);
    }
    if requested > product.current_stock {
        return Err(StockError::Insufficient {
            product_id: product.id,
            requested,
            available: product.current_stock,
        });
    }
    Ok(())
}

/// Inbound movements are never limited; outbound ones must be covered by current stock.
pub fn check_movement(
    product: &Product,
    movement: StockMovement,
    quantity: i32,
) -> Result<(), StockError> {
    match movement {
        StockMovement::In if quantity <= 0 => Err(StockError::NonPositiveQuantity),
        StockMovement::In => Ok(()),
        StockMovement::Out => ensure_available(product, quantity),
    }
}
