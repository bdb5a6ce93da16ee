//! crates/inventory_core/src/receipt.rs
//!
//! Renders the printable receipt for a bill and the short text message sent
//! to the customer's phone.

use rust_decimal::Decimal;
use std::fmt::Write;

use crate::domain::{Bill, BillWithItems};
use crate::format::{format_date, format_money};

const RECEIPT_STYLE: &str = r#"
    body { font-family: 'Arial', sans-serif; margin: 0; padding: 0; }
    .receipt-container { width: 300px; margin: 0 auto; padding: 20px; background-color: #fff; border: 1px solid #ddd; }
    .receipt-header { text-align: center; font-size: 18px; font-weight: bold; margin-bottom: 15px; }
    .receipt-header h1 { font-size: 24px; margin: 0; padding: 0; }
    .receipt-detail { font-size: 14px; margin-top: 15px; }
    .receipt-detail div { margin-bottom: 8px; }
    .item-list { margin-top: 15px; font-size: 14px; border-top: 1px dashed #ccc; padding-top: 10px; }
    .item-list div { margin-bottom: 5px; display: flex; justify-content: space-between; align-items: center; }
    .item-list div span { width: 30%; text-align: center; }
    .receipt-footer { text-align: center; margin-top: 20px; font-size: 14px; font-weight: bold; }
    .receipt-footer .total { font-size: 16px; color: #000; margin-top: 10px; }
    .receipt-footer .discount { font-size: 14px; color: red; margin-top: 5px; }
    .line { border-top: 1px dashed #ccc; margin: 10px 0; }
    .thank-you { margin-top: 10px; font-size: 12px; color: #888; }
"#;

/// Escapes text for use inside HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds a standalone HTML document that prints as a narrow till receipt.
pub fn render_receipt_html(shop_name: &str, receipt: &BillWithItems) -> String {
    let bill = &receipt.bill;
    let shop = escape_html(shop_name);

    let mut items = String::new();
    for line in &receipt.items {
        // Writing into a String cannot fail.
        let _ = write!(
            items,
            "\n        <div><span>{}</span><span>{}</span><span>{}</span></div>",
            escape_html(line.display_name()),
            line.item.quantity,
            format_money(line.item.total_price),
        );
    }

    let discount = if bill.discount > Decimal::ZERO {
        format!(
            "\n        <div class=\"discount\">Discount: {}</div>",
            format_money(bill.discount)
        )
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{shop} - Print Receipt</title>
    <style>{style}</style>
  </head>
  <body onload="window.print()">
    <div class="receipt-container">
      <div class="receipt-header">
        <h1>{shop}</h1>
        <p>Thank you for your purchase!</p>
      </div>
      <div class="receipt-detail">
        <div><strong>Customer Name:</strong> {name}</div>
        <div><strong>Phone:</strong> {phone}</div>
        <div><strong>Address:</strong> {address}</div>
        <div><strong>Date:</strong> {date}</div>
      </div>
      <div class="item-list">
        <div><strong>Product</strong><strong>Qty</strong><strong>Price</strong></div>
        <div class="line"></div>{items}
        <div class="line"></div>
      </div>
      <div class="receipt-footer">
        <div><strong>Subtotal:</strong> {sub_total}</div>{discount}
        <div class="total"><strong>Total:</strong> {total}</div>
        <div class="thank-you">We hope to serve you again!</div>
      </div>
    </div>
  </body>
</html>
"#,
        shop = shop,
        style = RECEIPT_STYLE,
        name = escape_html(&bill.customer_name),
        phone = escape_html(&bill.customer_phone),
        address = escape_html(&bill.customer_address),
        date = format_date(bill.created_at),
        items = items,
        sub_total = format_money(bill.sub_total),
        discount = discount,
        total = format_money(bill.total),
    )
}

/// The plain-text receipt delivered through the messaging API.
pub fn receipt_message(shop_name: &str, bill: &Bill) -> String {
    format!(
        "Receipt from {shop}\n\nCustomer: {name}\nPhone: {phone}\n\nBill Details:\nDate: {date}\nTotal: {total}\n\nThank you for your purchase!",
        shop = shop_name,
        name = bill.customer_name,
        phone = bill.customer_phone,
        date = format_date(bill.created_at),
        total = format_money(bill.total),
    )
}
