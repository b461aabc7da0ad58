//! # Wire Types
//!
//! Payloads exchanged with the billing server.
//!
//! ## Request / Response Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Billing Server API                              │
//! │                                                                         │
//! │  POST /api/calculate-total/                                            │
//! │    CalculateTotalRequest ──────────────────► TotalsResult              │
//! │    { customer_email,                          { order_code,             │
//! │      items: [LineItem],                         total_before_tax,       │
//! │      order_code? }                              total_tax,              │
//! │                                                 total_amount }          │
//! │                                                                         │
//! │  POST /api/generate-bill/                                              │
//! │    GenerateBillRequest ────────────────────► BillReceipt               │
//! │    { order_code,                              { order_code, ... }       │
//! │      denominations: [DenominationCount] }                               │
//! │                                                                         │
//! │  GET /api/denominations-list/ ─────────────► DenominationList          │
//! │                                               { data: [500, 200, ...] } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Request types export TypeScript bindings so a web billing page can build
//! the same payloads.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::amount::{parse_int_prefix, DisplayAmount};

// =============================================================================
// Order Code
// =============================================================================

/// Server-assigned identifier of a draft order (e.g. `PO1718001234567`).
///
/// Correlates the total computation with the later bill request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct OrderCode(String);

impl OrderCode {
    /// Wraps a server-issued code.
    pub fn new(code: impl Into<String>) -> Self {
        OrderCode(code.into())
    }

    /// Returns the code as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the bill detail view for this order.
    ///
    /// ## Example
    /// ```rust
    /// use billing_core::OrderCode;
    ///
    /// assert_eq!(OrderCode::new("O1").bill_path(), "/bill/O1/");
    /// ```
    pub fn bill_path(&self) -> String {
        format!("/bill/{}/", self.0)
    }

    /// An empty code means the server has not assigned one.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product/quantity pair sent for total computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Trimmed, non-empty product code.
    pub product_code: String,
    /// Quantity as typed; the server rejects values below 1.
    pub quantity: i64,
}

impl LineItem {
    /// Builds a line item from a row's raw inputs.
    ///
    /// Returns `None` for rows whose product code is blank. A quantity with
    /// no leading integer becomes 0 and is left for the server to reject.
    ///
    /// ## Example
    /// ```rust
    /// use billing_core::LineItem;
    ///
    /// let item = LineItem::from_inputs(" P001 ", "2").unwrap();
    /// assert_eq!(item.product_code, "P001");
    /// assert_eq!(item.quantity, 2);
    ///
    /// assert!(LineItem::from_inputs("   ", "2").is_none());
    /// assert_eq!(LineItem::from_inputs("P002", "").unwrap().quantity, 0);
    /// ```
    pub fn from_inputs(product_code: &str, quantity: &str) -> Option<Self> {
        let product_code = product_code.trim();
        if product_code.is_empty() {
            return None;
        }

        Some(LineItem {
            product_code: product_code.to_string(),
            quantity: parse_int_prefix(quantity).unwrap_or(0),
        })
    }
}

// =============================================================================
// Calculate Total
// =============================================================================

/// Body of `POST /api/calculate-total/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CalculateTotalRequest {
    pub customer_email: String,
    pub items: Vec<LineItem>,
    /// Present once the server has assigned a code, so it recomputes the same
    /// draft instead of opening a new one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub order_code: Option<OrderCode>,
}

/// Successful response of `POST /api/calculate-total/`.
///
/// Amounts are rendered verbatim; extra fields the server sends are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TotalsResult {
    pub order_code: OrderCode,
    #[ts(type = "number | string")]
    pub total_before_tax: DisplayAmount,
    #[ts(type = "number | string")]
    pub total_tax: DisplayAmount,
    #[ts(type = "number | string")]
    pub total_amount: DisplayAmount,
}

// =============================================================================
// Generate Bill
// =============================================================================

/// Count of one face value tendered (or returned as change).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DenominationCount {
    pub value: i64,
    pub count: i64,
}

/// Body of `POST /api/generate-bill/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GenerateBillRequest {
    pub order_code: OrderCode,
    /// Only slots with a positive count.
    pub denominations: Vec<DenominationCount>,
}

/// Successful response of `POST /api/generate-bill/`.
///
/// Only `order_code` drives the form. The server also reports what was paid
/// and the change it worked out; hosts may show those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillReceipt {
    pub order_code: OrderCode,
    #[serde(default)]
    pub amount_paid: Option<DisplayAmount>,
    #[serde(default)]
    pub change_given: Option<DisplayAmount>,
    #[serde(default)]
    pub change_denominations: Vec<DenominationCount>,
}

impl BillReceipt {
    /// A receipt carrying nothing but the order code.
    pub fn for_order(order_code: OrderCode) -> Self {
        BillReceipt {
            order_code,
            amount_paid: None,
            change_given: None,
            change_denominations: Vec::new(),
        }
    }
}

// =============================================================================
// Denomination List
// =============================================================================

/// Response of `GET /api/denominations-list/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenominationList {
    pub data: Vec<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_request_omits_order_code() {
        let request = CalculateTotalRequest {
            customer_email: "a@b.com".to_string(),
            items: vec![LineItem {
                product_code: "P001".to_string(),
                quantity: 2,
            }],
            order_code: None,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "customer_email": "a@b.com",
                "items": [{"product_code": "P001", "quantity": 2}]
            })
        );
    }

    #[test]
    fn test_repeat_request_carries_order_code() {
        let request = CalculateTotalRequest {
            customer_email: "a@b.com".to_string(),
            items: vec![],
            order_code: Some(OrderCode::new("PO1")),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["order_code"], json!("PO1"));
    }

    #[test]
    fn test_totals_accept_numbers_and_strings() {
        let totals: TotalsResult = serde_json::from_value(json!({
            "order_id": 7,
            "order_code": "O1",
            "customer_email": "a@b.com",
            "total_before_tax": 100,
            "total_tax": "10.00",
            "total_amount": 110
        }))
        .unwrap();

        assert_eq!(totals.order_code.as_str(), "O1");
        assert_eq!(totals.total_before_tax.as_str(), "100");
        assert_eq!(totals.total_tax.as_str(), "10.00");
        assert_eq!(totals.total_amount.as_str(), "110");
    }

    #[test]
    fn test_receipt_needs_only_order_code() {
        let receipt: BillReceipt = serde_json::from_value(json!({"order_code": "O1"})).unwrap();
        assert_eq!(receipt, BillReceipt::for_order(OrderCode::new("O1")));

        let full: BillReceipt = serde_json::from_value(json!({
            "order_code": "O1",
            "amount_paid": "200.00",
            "change_given": "90.00",
            "change_denominations": [{"value": 50, "count": 1}, {"value": 20, "count": 2}]
        }))
        .unwrap();
        assert_eq!(full.change_given.unwrap().as_str(), "90.00");
        assert_eq!(
            full.change_denominations
                .iter()
                .map(|entry| entry.value * entry.count)
                .sum::<i64>(),
            90
        );
    }
}
