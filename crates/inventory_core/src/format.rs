//! crates/inventory_core/src/format.rs
//!
//! Currency and date formatting used by listings, the dashboard and receipts.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

const UNITS: [&str; 5] = ["", "K", "M", "B", "T"];

/// Compact currency for dashboard cards and listings: `RS 950`, `RS 1.5K`, `RS 2.0M`.
pub fn format_currency(amount: Decimal) -> String {
    let thousand = Decimal::from(1_000);
    if amount < thousand {
        return format!("RS {}", amount.normalize());
    }

    let mut scaled = amount;
    let mut order = 0;
    while scaled >= thousand && order < UNITS.len() - 1 {
        scaled /= thousand;
        order += 1;
    }
    let scaled = scaled.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("RS {:.1}{}", scaled, UNITS[order])
}

/// Exact amount with two decimals, as printed on bills and receipts.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("Rs. {:.2}", rounded)
}

/// `3/7/2024`
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y").to_string()
}

/// `3/7/2024, 4:05 PM`
pub fn format_date_time(at: DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), "RS 0")]
    #[case(dec!(999), "RS 999")]
    #[case(dec!(12.50), "RS 12.5")]
    #[case(dec!(1000), "RS 1.0K")]
    #[case(dec!(1540), "RS 1.5K")]
    #[case(dec!(2500000), "RS 2.5M")]
    #[case(dec!(7000000000), "RS 7.0B")]
    #[case(dec!(3000000000000000), "RS 3000.0T")]
    fn compact_currency(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_currency(amount), expected);
    }

    #[test]
    fn money_always_has_two_decimals() {
        assert_eq!(format_money(dec!(12.5)), "Rs. 12.50");
        assert_eq!(format_money(dec!(3)), "Rs. 3.00");
        assert_eq!(format_money(dec!(0.005)), "Rs. 0.01");
    }

    #[test]
    fn dates_use_month_day_year() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 16, 5, 0).unwrap();
        assert_eq!(format_date(at), "3/7/2024");
        assert_eq!(format_date_time(at), "3/7/2024, 4:05 PM");
    }
}
