//! crates/inventory_core/src/dashboard.rs
//!
//! Aggregates sales records into the dashboard's stats cards and its
//! seven-day sales trend. Days are calendar days in UTC.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::domain::SalesRecord;

pub const TREND_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySales {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`.
    pub label: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub today_sales: Decimal,
    pub total_revenue: Decimal,
    pub total_products: i64,
    pub low_stock: usize,
    pub sales_trend: Vec<DailySales>,
}

pub fn summarize(
    records: &[SalesRecord],
    total_products: i64,
    low_stock: usize,
    today: NaiveDate,
) -> DashboardStats {
    let mut by_day: HashMap<NaiveDate, Decimal> = HashMap::new();
    for record in records {
        *by_day
            .entry(record.transaction_date.date_naive())
            .or_default() += record.total_amount;
    }

    let sales_trend = (0..TREND_DAYS)
        .rev()
        .map(|days_back| {
            let date = today - Duration::days(days_back);
            DailySales {
                date,
                label: date.format("%a").to_string(),
                amount: by_day.get(&date).copied().unwrap_or_default(),
            }
        })
        .collect();

    DashboardStats {
        today_sales: by_day.get(&today).copied().unwrap_or_default(),
        total_revenue: records.iter().map(|record| record.total_amount).sum(),
        total_products,
        low_stock,
        sales_trend,
    }
}
