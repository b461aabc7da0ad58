//! Plain-text rendering of the billing form.

use billing_core::{BillReceipt, BillingForm};
use std::fmt::Write;
use url::Url;

/// Draws every visible section of the form.
pub fn render_form(form: &BillingForm) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "== Billing ==");
    let _ = writeln!(out, "Customer email: {}", form.customer_email());
    let _ = writeln!(out, "{:>3}  {:<16} {}", "#", "Product code", "Quantity");
    for row in form.rows() {
        let _ = writeln!(out, "{:>3}  {:<16} {}", row.number, row.product_code, row.quantity);
    }
    let _ = writeln!(out, "[{}]", form.calculate_button().label());

    if form.totals_visible() {
        if let Some(totals) = form.totals() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Order code:       {}", totals.order_code);
            let _ = writeln!(out, "Total before tax: {}", totals.total_before_tax);
            let _ = writeln!(out, "Total tax:        {}", totals.total_tax);
            let _ = writeln!(out, "Total amount:     {}", totals.total_amount);
        }
    }

    if form.denominations_visible() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Denominations:");
        for slot in form.palette().slots() {
            let _ = writeln!(out, "  {:>6} x {}", slot.value, slot.count);
        }
        let paid = form
            .paid_amount()
            .map(|paid| paid.to_string())
            .unwrap_or_default();
        let _ = writeln!(out, "Paid amount: {}", paid);
        let _ = writeln!(out, "[{}]", form.generate_button().label());
    }

    if let Some(error) = form.error() {
        let _ = writeln!(out);
        for line in error.lines() {
            let _ = writeln!(out, "! {}", line);
        }
    }

    out
}

/// Summary printed once the bill exists.
pub fn render_bill(location: &Url, receipt: Option<&BillReceipt>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Bill generated: {}", location);
    if let Some(receipt) = receipt {
        if let Some(paid) = &receipt.amount_paid {
            let _ = writeln!(out, "Amount paid:  {}", paid);
        }
        if let Some(change) = &receipt.change_given {
            let _ = writeln!(out, "Change given: {}", change);
        }
        for entry in &receipt.change_denominations {
            let _ = writeln!(out, "  {:>6} x {}", entry.value, entry.count);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use billing_core::{
        Action, DenominationCount, DisplayAmount, Field, OrderCode, TotalsResult,
    };

    #[test]
    fn test_fresh_form() {
        let text = render_form(&BillingForm::new(&[100, 50]));

        assert!(text.contains("  1                   1"));
        assert!(text.contains("[Calculate Total]"));
        assert!(!text.contains("Denominations:"));
        assert!(!text.contains("Total amount"));
    }

    #[test]
    fn test_totals_and_errors() {
        let mut form = BillingForm::new(&[100, 50]);
        form.update(Action::EmailChanged("a@b.com".into()));
        form.update(Action::FieldChanged {
            row: 0,
            field: Field::ProductCode,
            value: "P001".into(),
        });
        form.update(Action::CalculateRequested);
        form.update(Action::TotalCalculated(Ok(TotalsResult {
            order_code: OrderCode::new("O1"),
            total_before_tax: DisplayAmount::new("100"),
            total_tax: DisplayAmount::new("10"),
            total_amount: DisplayAmount::new("110.00"),
        })));
        form.update(Action::DenomChanged {
            value: 100,
            count: "1".into(),
        });
        form.update(Action::GenerateRequested);

        let text = render_form(&form);
        assert!(text.contains("Order code:       O1"));
        assert!(text.contains("Total amount:     110.00"));
        assert!(text.contains("     100 x 1"));
        assert!(text.contains("Paid amount: 100"));
        assert!(text.contains(
            "! Paid amount (100) is less than total amount (110). Please add more denominations."
        ));
    }

    #[test]
    fn test_bill_summary() {
        let receipt = BillReceipt {
            order_code: OrderCode::new("O1"),
            amount_paid: Some(DisplayAmount::new("200.00")),
            change_given: Some(DisplayAmount::new("90.00")),
            change_denominations: vec![DenominationCount { value: 50, count: 1 }],
        };
        let url = Url::parse("http://127.0.0.1:8000/bill/O1/").unwrap();

        let text = render_bill(&url, Some(&receipt));
        assert!(text.starts_with("Bill generated: http://127.0.0.1:8000/bill/O1/\n"));
        assert!(text.contains("Change given: 90.00"));
        assert!(text.contains("      50 x 1"));
    }
}
