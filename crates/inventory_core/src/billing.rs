//! crates/inventory_core/src/billing.rs
//!
//! The bill-creation flow: select products, compute the summary, and turn
//! the draft into the parent bill row plus its line items.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{NewBill, NewBillItem, Product};
use crate::stock::{ensure_available, StockError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BillingError {
    #[error(transparent)]
    Stock(#[from] StockError),
    #[error("Please fill out all fields and select products.")]
    Incomplete,
    #[error("Discount cannot be negative")]
    NegativeDiscount,
    #[error("Discount cannot exceed the sub-total")]
    DiscountExceedsSubTotal,
    #[error("Bill amount is too large")]
    AmountOverflow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl CustomerDetails {
    fn is_complete(&self) -> bool {
        [&self.name, &self.phone, &self.address]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// One selected product and how many units of it go on the bill.
#[derive(Debug, Clone)]
pub struct DraftLine {
    pub product: Product,
    pub quantity: i32,
}

impl DraftLine {
    pub fn line_total(&self) -> Result<Decimal, BillingError> {
        line_amount(&self.product, self.quantity)
    }
}

fn line_amount(product: &Product, quantity: i32) -> Result<Decimal, BillingError> {
    product
        .unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(BillingError::AmountOverflow)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillSummary {
    pub sub_total: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

/// A bill being assembled before it is written.
#[derive(Debug, Clone, Default)]
pub struct BillDraft {
    pub customer: CustomerDetails,
    pub discount: Decimal,
    lines: Vec<DraftLine>,
}

impl BillDraft {
    pub fn new(customer: CustomerDetails) -> Self {
        Self {
            customer,
            discount: Decimal::ZERO,
            lines: Vec::new(),
        }
    }

    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = discount;
        self
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    /// Adds `quantity` units of `product`, merging with an existing line for the
    /// same product. The combined quantity may not exceed the product's stock.
    pub fn add_product(&mut self, product: &Product, quantity: i32) -> Result<(), BillingError> {
        if quantity <= 0 {
            return Err(StockError::NonPositiveQuantity.into());
        }
        match self.lines.iter_mut().find(|line| line.product.id == product.id) {
            Some(line) => {
                let combined = line.quantity.saturating_add(quantity);
                ensure_available(product, combined)?;
                line_amount(product, combined)?;
                line.quantity = combined;
            }
            None => {
                ensure_available(product, quantity)?;
                line_amount(product, quantity)?;
                self.lines.push(DraftLine {
                    product: product.clone(),
                    quantity,
                });
            }
        }
        Ok(())
    }

    pub fn remove_product(&mut self, product_id: Uuid) {
        self.lines.retain(|line| line.product.id != product_id);
    }

    pub fn summary(&self) -> Result<BillSummary, BillingError> {
        let sub_total = self.lines.iter().try_fold(Decimal::ZERO, |acc, line| {
            acc.checked_add(line.line_total()?)
                .ok_or(BillingError::AmountOverflow)
        })?;
        let total = sub_total
            .checked_sub(self.discount)
            .ok_or(BillingError::AmountOverflow)?;
        Ok(BillSummary {
            sub_total,
            discount: self.discount,
            total,
        })
    }

    /// Produces the bill row and its items, ready to be inserted in that order.
    pub fn finalize(&self) -> Result<(NewBill, Vec<NewBillItem>), BillingError> {
        if !self.customer.is_complete() || self.lines.is_empty() {
            return Err(BillingError::Incomplete);
        }
        if self.discount < Decimal::ZERO {
            return Err(BillingError::NegativeDiscount);
        }
        let summary = self.summary()?;
        if summary.discount > summary.sub_total {
            return Err(BillingError::DiscountExceedsSubTotal);
        }

        let bill = NewBill {
            customer_name: self.customer.name.trim().to_string(),
            customer_phone: self.customer.phone.trim().to_string(),
            customer_address: self.customer.address.trim().to_string(),
            sub_total: summary.sub_total,
            discount: summary.discount,
            total: summary.total,
        };
        let items = self
            .lines
            .iter()
            .map(|line| {
                Ok(NewBillItem {
                    product_id: line.product.id,
                    quantity: line.quantity,
                    total_price: line.line_total()?,
                })
            })
            .collect::<Result<Vec<_>, BillingError>>()?;
        Ok((bill, items))
    }
}
