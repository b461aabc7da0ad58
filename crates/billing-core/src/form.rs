//! # Billing Form
//!
//! The controller behind the billing page. Hosts feed it [`Action`]s; it
//! updates its view state and hands back at most one [`Effect`] for the host
//! to perform.
//!
//! ## Update Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Host ──Action──► BillingForm::update() ──Option<Effect>──► Host       │
//! │    ▲                                                          │         │
//! │    │                                                          ▼         │
//! │    └──── TotalCalculated / BillGenerated ◄──── HTTP round trip          │
//! │                                                                         │
//! │   CalculateRequested ─► Effect::CalculateTotal(request)                 │
//! │   TotalCalculated    ─► totals shown (or error)                         │
//! │   GenerateRequested  ─► Effect::GenerateBill(request)                   │
//! │   BillGenerated      ─► Effect::Navigate("/bill/<code>/") (or error)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Phases
//! ```text
//!   Empty ──edit──► ItemsEntered ──total ok──► TotalsShown ──bill ok──► Navigated
//!                        ▲                         │
//!                        └────── row/field edit ───┘
//! ```
//!
//! Editing products after a total hides the totals and the denomination
//! inputs and zeroes every count. The order code stays cached in the
//! [`DraftSession`] so the next total updates the same draft order.

use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::server_error::ErrorMessage;
use crate::tender::DenominationPalette;
use crate::types::{
    BillReceipt, CalculateTotalRequest, GenerateBillRequest, LineItem, OrderCode, TotalsResult,
};
use crate::validation::{
    ensure_payment_covers_total, ensure_row_removable, require_denominations, require_line_items,
    require_order_code, validate_customer_email,
};
use crate::DEFAULT_QUANTITY;

// =============================================================================
// Actions & Effects
// =============================================================================

/// Editable column of a product row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ProductCode,
    Quantity,
}

/// Everything a host can tell the form.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddRow,
    /// Zero-based row index.
    RemoveRow(usize),
    FieldChanged {
        row: usize,
        field: Field,
        value: String,
    },
    EmailChanged(String),
    DenomChanged {
        value: i64,
        count: String,
    },
    CalculateRequested,
    GenerateRequested,
    /// Completion of an [`Effect::CalculateTotal`].
    TotalCalculated(Result<TotalsResult, ErrorMessage>),
    /// Completion of an [`Effect::GenerateBill`].
    BillGenerated(Result<BillReceipt, ErrorMessage>),
}

/// Work the form asks its host to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    CalculateTotal(CalculateTotalRequest),
    GenerateBill(GenerateBillRequest),
    /// Leave the form for the bill page at this path.
    Navigate(String),
}

/// Where the form is in the billing workflow, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Empty,
    ItemsEntered,
    TotalsShown,
    Navigated,
}

// =============================================================================
// View State Pieces
// =============================================================================

/// One editable product row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    /// 1-based position shown in the first column.
    pub number: usize,
    pub product_code: String,
    pub quantity: String,
}

impl ProductRow {
    fn blank(number: usize) -> Self {
        ProductRow {
            number,
            product_code: String::new(),
            quantity: DEFAULT_QUANTITY.to_string(),
        }
    }
}

/// A submit button that is disabled and relabelled while its request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    idle_label: &'static str,
    busy_label: &'static str,
    busy: bool,
}

impl SubmitButton {
    const fn new(idle_label: &'static str, busy_label: &'static str) -> Self {
        SubmitButton {
            idle_label,
            busy_label,
            busy: false,
        }
    }

    pub fn label(&self) -> &'static str {
        if self.busy {
            self.busy_label
        } else {
            self.idle_label
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.busy
    }
}

/// State shared by the total and bill requests of one draft order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftSession {
    order_code: Option<OrderCode>,
}

impl DraftSession {
    pub fn order_code(&self) -> Option<&OrderCode> {
        self.order_code.as_ref()
    }

    /// An empty code from the server leaves the draft unset.
    fn remember(&mut self, order_code: OrderCode) {
        self.order_code = Some(order_code).filter(|code| !code.is_empty());
    }
}

// =============================================================================
// Billing Form
// =============================================================================

/// The billing form's complete view state.
#[derive(Debug, Clone)]
pub struct BillingForm {
    rows: Vec<ProductRow>,
    customer_email: String,
    session: DraftSession,
    totals: Option<TotalsResult>,
    payment_visible: bool,
    palette: DenominationPalette,
    paid_amount: Option<i64>,
    error: Option<String>,
    calculate_button: SubmitButton,
    generate_button: SubmitButton,
    receipt: Option<BillReceipt>,
    location: Option<String>,
}

impl BillingForm {
    /// A fresh form: one blank row, no email, every count at zero.
    pub fn new(denominations: &[i64]) -> Self {
        BillingForm {
            rows: vec![ProductRow::blank(1)],
            customer_email: String::new(),
            session: DraftSession::default(),
            totals: None,
            payment_visible: false,
            palette: DenominationPalette::new(denominations),
            paid_amount: None,
            error: None,
            calculate_button: SubmitButton::new("Calculate Total", "Calculating..."),
            generate_button: SubmitButton::new("Generate Bill", "Processing..."),
            receipt: None,
            location: None,
        }
    }

    // -------------------------------------------------------------------------
    // Read Access
    // -------------------------------------------------------------------------

    pub fn rows(&self) -> &[ProductRow] {
        &self.rows
    }

    pub fn customer_email(&self) -> &str {
        &self.customer_email
    }

    /// Text of the error box; `None` while it is hidden.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last totals the server returned, shown or not.
    pub fn totals(&self) -> Option<&TotalsResult> {
        self.totals.as_ref()
    }

    pub fn totals_visible(&self) -> bool {
        self.payment_visible
    }

    pub fn denominations_visible(&self) -> bool {
        self.payment_visible
    }

    pub fn palette(&self) -> &DenominationPalette {
        &self.palette
    }

    /// Paid amount field; `None` while cleared.
    pub fn paid_amount(&self) -> Option<i64> {
        self.paid_amount
    }

    pub fn order_code(&self) -> Option<&OrderCode> {
        self.session.order_code()
    }

    pub fn calculate_button(&self) -> &SubmitButton {
        &self.calculate_button
    }

    pub fn generate_button(&self) -> &SubmitButton {
        &self.generate_button
    }

    /// The server's reply to the bill request, once it succeeded.
    pub fn receipt(&self) -> Option<&BillReceipt> {
        self.receipt.as_ref()
    }

    /// Bill page the form navigated to.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn phase(&self) -> FormPhase {
        if self.location.is_some() {
            FormPhase::Navigated
        } else if self.payment_visible {
            FormPhase::TotalsShown
        } else if self.rows.iter().any(|row| !row.product_code.trim().is_empty()) {
            FormPhase::ItemsEntered
        } else {
            FormPhase::Empty
        }
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Applies one action and returns the effect it asks for, if any.
    ///
    /// Once the form has navigated away every action is ignored.
    pub fn update(&mut self, action: Action) -> Option<Effect> {
        if let Some(location) = &self.location {
            debug!(location = %location, ?action, "Form already navigated, ignoring action");
            return None;
        }

        match action {
            Action::AddRow => {
                self.add_row();
                None
            }
            Action::RemoveRow(index) => {
                if let Err(e) = self.remove_row(index) {
                    debug!(index, error = %e, "Row not removed");
                }
                None
            }
            Action::FieldChanged { row, field, value } => {
                if let Err(e) = self.set_field(row, field, value) {
                    warn!(row, ?field, error = %e, "Ignoring edit");
                }
                None
            }
            Action::EmailChanged(email) => {
                self.customer_email = email;
                None
            }
            Action::DenomChanged { value, count } => {
                if let Err(e) = self.set_denomination(value, count) {
                    warn!(value, error = %e, "Ignoring denomination change");
                }
                None
            }
            Action::CalculateRequested => self.calculate_total().map(Effect::CalculateTotal),
            Action::GenerateRequested => self.generate_bill().map(Effect::GenerateBill),
            Action::TotalCalculated(result) => {
                self.finish_calculate(result);
                None
            }
            Action::BillGenerated(result) => self.finish_generate(result),
        }
    }

    // -------------------------------------------------------------------------
    // Product Rows
    // -------------------------------------------------------------------------

    /// Appends a blank row with quantity 1.
    pub fn add_row(&mut self) {
        self.rows.push(ProductRow::blank(self.rows.len() + 1));
        self.renumber_rows();
        self.reset_payment_section();
    }

    /// Removes the row at `index`.
    ///
    /// The last remaining row is never removed; the attempt is reported in
    /// the error box.
    pub fn remove_row(&mut self, index: usize) -> CoreResult<()> {
        if let Err(e) = ensure_row_removable(self.rows.len()) {
            self.show_error(e.to_string());
            return Err(e.into());
        }
        if index >= self.rows.len() {
            return Err(CoreError::RowNotFound {
                index,
                rows: self.rows.len(),
            });
        }

        self.rows.remove(index);
        self.renumber_rows();
        self.reset_payment_section();
        Ok(())
    }

    /// Stores the typed text for one cell.
    pub fn set_field(&mut self, index: usize, field: Field, value: String) -> CoreResult<()> {
        let rows = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(CoreError::RowNotFound { index, rows })?;

        match field {
            Field::ProductCode => row.product_code = value,
            Field::Quantity => row.quantity = value,
        }
        self.reset_payment_section();
        Ok(())
    }

    fn renumber_rows(&mut self) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.number = i + 1;
        }
    }

    /// Hides totals and denominations and zeroes the tender.
    ///
    /// The cached order code and the last totals are kept.
    fn reset_payment_section(&mut self) {
        self.payment_visible = false;
        self.palette.reset();
        self.paid_amount = None;
    }

    // -------------------------------------------------------------------------
    // Denominations
    // -------------------------------------------------------------------------

    /// Stores a typed count and recomputes the paid amount.
    ///
    /// Ignored while the denomination section is hidden.
    pub fn set_denomination(&mut self, value: i64, count: String) -> CoreResult<()> {
        if !self.payment_visible {
            debug!(value, "Denomination section hidden, ignoring count");
            return Ok(());
        }

        self.palette.set_count(value, count)?;
        self.paid_amount = Some(self.palette.paid_amount());
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Compute Total
    // -------------------------------------------------------------------------

    /// Validates the form and builds the total request.
    ///
    /// Returns `None` when the request is already running or a check fails.
    pub fn calculate_total(&mut self) -> Option<CalculateTotalRequest> {
        if self.calculate_button.is_disabled() {
            debug!("Total already being calculated");
            return None;
        }
        self.clear_error();

        match self.build_total_request() {
            Ok(request) => {
                self.calculate_button.busy = true;
                info!(
                    items = request.items.len(),
                    order_code = ?request.order_code,
                    "Requesting total"
                );
                Some(request)
            }
            Err(e) => {
                self.show_error(e.to_string());
                None
            }
        }
    }

    fn build_total_request(&self) -> Result<CalculateTotalRequest, ValidationError> {
        let items: Vec<LineItem> = self
            .rows
            .iter()
            .filter_map(|row| LineItem::from_inputs(&row.product_code, &row.quantity))
            .collect();

        let customer_email = validate_customer_email(&self.customer_email)?;
        require_line_items(&items)?;

        Ok(CalculateTotalRequest {
            customer_email: customer_email.to_string(),
            items,
            order_code: self.session.order_code().cloned(),
        })
    }

    /// Applies the server's answer to a total request.
    pub fn finish_calculate(&mut self, result: Result<TotalsResult, ErrorMessage>) {
        if !self.calculate_button.is_disabled() {
            warn!("Total result arrived with no request running, ignoring");
            return;
        }
        self.calculate_button.busy = false;

        match result {
            Ok(totals) => {
                info!(
                    order_code = %totals.order_code,
                    total_amount = %totals.total_amount,
                    "Total calculated"
                );
                self.session.remember(totals.order_code.clone());
                self.totals = Some(totals);
                self.payment_visible = true;
            }
            Err(message) => self.show_error(message.to_display()),
        }
    }

    // -------------------------------------------------------------------------
    // Generate Bill
    // -------------------------------------------------------------------------

    /// Validates the tender and builds the bill request.
    ///
    /// Returns `None` when the request is already running or a check fails.
    pub fn generate_bill(&mut self) -> Option<GenerateBillRequest> {
        if self.generate_button.is_disabled() {
            debug!("Bill already being generated");
            return None;
        }
        self.clear_error();

        match self.build_bill_request() {
            Ok(request) => {
                self.generate_button.busy = true;
                info!(
                    order_code = %request.order_code,
                    denominations = request.denominations.len(),
                    "Requesting bill"
                );
                Some(request)
            }
            Err(e) => {
                self.show_error(e.to_string());
                None
            }
        }
    }

    fn build_bill_request(&self) -> Result<GenerateBillRequest, ValidationError> {
        let order_code = require_order_code(self.session.order_code())?;

        let denominations = self.palette.tendered();
        require_denominations(&denominations)?;

        let total = self
            .totals
            .as_ref()
            .map(|totals| totals.total_amount.to_f64_lenient())
            .unwrap_or(0.0);
        ensure_payment_covers_total(self.palette.paid_amount(), total)?;

        Ok(GenerateBillRequest {
            order_code: order_code.clone(),
            denominations,
        })
    }

    /// Applies the server's answer to a bill request.
    ///
    /// A successful bill navigates to its detail page.
    pub fn finish_generate(&mut self, result: Result<BillReceipt, ErrorMessage>) -> Option<Effect> {
        if !self.generate_button.is_disabled() {
            warn!("Bill result arrived with no request running, ignoring");
            return None;
        }
        self.generate_button.busy = false;

        match result {
            Ok(receipt) => {
                let path = receipt.order_code.bill_path();
                info!(order_code = %receipt.order_code, path = %path, "Bill generated");
                self.receipt = Some(receipt);
                self.location = Some(path.clone());
                Some(Effect::Navigate(path))
            }
            Err(message) => {
                self.show_error(message.to_display());
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Error Box
    // -------------------------------------------------------------------------

    fn show_error(&mut self, message: String) {
        debug!(message = %message, "Showing error");
        self.error = Some(message);
    }

    fn clear_error(&mut self) {
        self.error = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DenominationCount;
    use crate::DisplayAmount;

    fn totals(code: &str, before: &str, tax: &str, total: &str) -> TotalsResult {
        TotalsResult {
            order_code: OrderCode::new(code),
            total_before_tax: DisplayAmount::new(before),
            total_tax: DisplayAmount::new(tax),
            total_amount: DisplayAmount::new(total),
        }
    }

    fn edit(form: &mut BillingForm, row: usize, field: Field, value: &str) {
        form.update(Action::FieldChanged {
            row,
            field,
            value: value.to_string(),
        });
    }

    fn denom(form: &mut BillingForm, value: i64, count: &str) {
        form.update(Action::DenomChanged {
            value,
            count: count.to_string(),
        });
    }

    /// A form whose total for `O1` (100 + 10 = 110) is on screen.
    fn form_with_totals() -> BillingForm {
        let mut form = BillingForm::new(&[100, 50]);
        form.update(Action::EmailChanged("a@b.com".into()));
        edit(&mut form, 0, Field::ProductCode, "P001");
        edit(&mut form, 0, Field::Quantity, "2");
        assert!(form.update(Action::CalculateRequested).is_some());
        form.update(Action::TotalCalculated(Ok(totals("O1", "100", "10", "110"))));
        form
    }

    #[test]
    fn test_new_form() {
        let form = BillingForm::new(&[100, 50]);

        assert_eq!(form.rows(), &[ProductRow::blank(1)]);
        assert_eq!(form.rows()[0].quantity, "1");
        assert_eq!(form.phase(), FormPhase::Empty);
        assert!(!form.totals_visible());
        assert!(!form.denominations_visible());
        assert_eq!(form.error(), None);
        assert_eq!(form.calculate_button().label(), "Calculate Total");
        assert_eq!(form.generate_button().label(), "Generate Bill");
    }

    #[test]
    fn test_last_row_cannot_be_removed() {
        let mut form = BillingForm::new(&[100]);
        form.update(Action::RemoveRow(0));

        assert_eq!(form.rows().len(), 1);
        assert_eq!(form.error(), Some("At least one product is required."));
    }

    #[test]
    fn test_rows_renumber_after_adds_and_removes() {
        let mut form = BillingForm::new(&[100]);
        for _ in 0..4 {
            form.update(Action::AddRow);
        }
        form.update(Action::RemoveRow(0));
        form.update(Action::RemoveRow(2));

        let numbers: Vec<usize> = form.rows().iter().map(|row| row.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_remove_keeps_other_rows() {
        let mut form = BillingForm::new(&[100]);
        form.update(Action::AddRow);
        form.update(Action::AddRow);
        edit(&mut form, 0, Field::ProductCode, "A");
        edit(&mut form, 1, Field::ProductCode, "B");
        edit(&mut form, 2, Field::ProductCode, "C");

        form.update(Action::RemoveRow(1));

        let codes: Vec<&str> = form.rows().iter().map(|r| r.product_code.as_str()).collect();
        assert_eq!(codes, vec!["A", "C"]);
    }

    #[test]
    fn test_unknown_row_rejected() {
        let mut form = BillingForm::new(&[100]);
        form.add_row();

        assert_eq!(
            form.remove_row(5),
            Err(CoreError::RowNotFound { index: 5, rows: 2 })
        );
        assert_eq!(
            form.set_field(9, Field::Quantity, "3".into()),
            Err(CoreError::RowNotFound { index: 9, rows: 2 })
        );
        assert_eq!(form.rows().len(), 2);
        assert_eq!(form.error(), None);
    }

    #[test]
    fn test_empty_email_blocks_calculation() {
        let mut form = BillingForm::new(&[100]);
        edit(&mut form, 0, Field::ProductCode, "P001");
        form.update(Action::EmailChanged("   ".into()));

        assert_eq!(form.update(Action::CalculateRequested), None);
        assert_eq!(form.error(), Some("Customer email is required."));
        assert!(!form.calculate_button().is_disabled());
    }

    #[test]
    fn test_blank_rows_block_calculation() {
        let mut form = BillingForm::new(&[100]);
        form.update(Action::EmailChanged("a@b.com".into()));
        form.update(Action::AddRow);
        edit(&mut form, 1, Field::ProductCode, "   ");

        assert_eq!(form.update(Action::CalculateRequested), None);
        assert_eq!(form.error(), Some("Add at least one product."));
    }

    #[test]
    fn test_calculate_request_payload() {
        let mut form = BillingForm::new(&[100, 50]);
        form.update(Action::EmailChanged(" a@b.com ".into()));
        edit(&mut form, 0, Field::ProductCode, " P001 ");
        edit(&mut form, 0, Field::Quantity, "2");
        form.update(Action::AddRow);

        let effect = form.update(Action::CalculateRequested);
        assert_eq!(
            effect,
            Some(Effect::CalculateTotal(CalculateTotalRequest {
                customer_email: "a@b.com".into(),
                items: vec![LineItem {
                    product_code: "P001".into(),
                    quantity: 2,
                }],
                order_code: None,
            }))
        );
        assert!(form.calculate_button().is_disabled());
        assert_eq!(form.calculate_button().label(), "Calculating...");
    }

    #[test]
    fn test_busy_button_ignores_requests() {
        let mut form = BillingForm::new(&[100]);
        form.update(Action::EmailChanged("a@b.com".into()));
        edit(&mut form, 0, Field::ProductCode, "P001");

        assert!(form.update(Action::CalculateRequested).is_some());
        assert_eq!(form.update(Action::CalculateRequested), None);
    }

    #[test]
    fn test_totals_shown_verbatim() {
        let form = form_with_totals();

        let shown = form.totals().unwrap();
        assert_eq!(shown.total_before_tax.as_str(), "100");
        assert_eq!(shown.total_tax.as_str(), "10");
        assert_eq!(shown.total_amount.as_str(), "110");
        assert_eq!(form.order_code(), Some(&OrderCode::new("O1")));
        assert!(form.totals_visible());
        assert!(form.denominations_visible());
        assert_eq!(form.phase(), FormPhase::TotalsShown);
        assert_eq!(form.calculate_button().label(), "Calculate Total");
    }

    #[test]
    fn test_server_error_keeps_sections_hidden() {
        let mut form = BillingForm::new(&[100]);
        form.update(Action::EmailChanged("a@b.com".into()));
        edit(&mut form, 0, Field::ProductCode, "P404");
        form.update(Action::CalculateRequested);

        form.update(Action::TotalCalculated(Err(ErrorMessage::List(vec![
            "Product with code 'P404' not found.".into(),
        ]))));

        assert_eq!(form.error(), Some("Product with code 'P404' not found."));
        assert!(!form.totals_visible());
        assert!(!form.calculate_button().is_disabled());
        assert_eq!(form.phase(), FormPhase::ItemsEntered);
    }

    #[test]
    fn test_edit_after_totals_resets_payment() {
        let mut form = form_with_totals();
        denom(&mut form, 100, "1");
        assert_eq!(form.paid_amount(), Some(100));

        edit(&mut form, 0, Field::Quantity, "3");

        assert!(!form.totals_visible());
        assert!(!form.denominations_visible());
        assert_eq!(form.paid_amount(), None);
        assert!(form.palette().slots().iter().all(|slot| slot.count == "0"));
        assert_eq!(form.order_code(), Some(&OrderCode::new("O1")));
        assert_eq!(form.phase(), FormPhase::ItemsEntered);
    }

    fn assert_payment_reset(form: &BillingForm) {
        assert!(!form.totals_visible());
        assert!(!form.denominations_visible());
        assert_eq!(form.paid_amount(), None);
        assert!(form.palette().slots().iter().all(|slot| slot.count == "0"));
        assert_eq!(form.order_code(), Some(&OrderCode::new("O1")));
    }

    #[test]
    fn test_added_row_resets_payment() {
        let mut form = form_with_totals();
        denom(&mut form, 50, "3");

        form.update(Action::AddRow);

        assert_payment_reset(&form);
    }

    #[test]
    fn test_product_code_edit_resets_payment() {
        let mut form = form_with_totals();
        denom(&mut form, 100, "2");

        edit(&mut form, 0, Field::ProductCode, "P009");

        assert_payment_reset(&form);
    }

    #[test]
    fn test_removed_row_resets_payment() {
        let mut form = form_with_totals();
        form.update(Action::AddRow);
        form.update(Action::CalculateRequested);
        form.update(Action::TotalCalculated(Ok(totals("O1", "100", "10", "110"))));
        assert!(form.totals_visible());
        denom(&mut form, 100, "1");

        form.update(Action::RemoveRow(1));

        assert_payment_reset(&form);
    }

    #[test]
    fn test_empty_order_code_is_not_sent() {
        let mut form = BillingForm::new(&[100, 50]);
        form.update(Action::EmailChanged("a@b.com".into()));
        edit(&mut form, 0, Field::ProductCode, "P001");
        form.update(Action::CalculateRequested);
        form.update(Action::TotalCalculated(Ok(totals("", "100", "10", "110"))));
        assert_eq!(form.order_code(), None);

        match form.update(Action::CalculateRequested) {
            Some(Effect::CalculateTotal(request)) => assert_eq!(request.order_code, None),
            other => panic!("expected total request, got {other:?}"),
        }
    }

    #[test]
    fn test_recalculation_reuses_order_code() {
        let mut form = form_with_totals();
        form.update(Action::AddRow);
        edit(&mut form, 1, Field::ProductCode, "P002");

        match form.update(Action::CalculateRequested) {
            Some(Effect::CalculateTotal(request)) => {
                assert_eq!(request.order_code, Some(OrderCode::new("O1")));
                assert_eq!(request.items.len(), 2);
            }
            other => panic!("expected total request, got {other:?}"),
        }
    }

    #[test]
    fn test_paid_amount_tracks_counts() {
        let mut form = form_with_totals();
        denom(&mut form, 100, "1");
        denom(&mut form, 50, "2");

        assert_eq!(form.paid_amount(), Some(200));
    }

    #[test]
    fn test_denominations_ignored_while_hidden() {
        let mut form = BillingForm::new(&[100]);
        denom(&mut form, 100, "5");

        assert_eq!(form.paid_amount(), None);
        assert_eq!(form.palette().slots()[0].count, "0");
    }

    #[test]
    fn test_unknown_denomination_rejected() {
        let mut form = form_with_totals();
        assert_eq!(
            form.set_denomination(3, "1".into()),
            Err(CoreError::UnknownDenomination { value: 3 })
        );
    }

    #[test]
    fn test_bill_requires_order_code() {
        let mut form = BillingForm::new(&[100]);
        assert_eq!(form.update(Action::GenerateRequested), None);
        assert_eq!(form.error(), Some("Please calculate total first."));
    }

    #[test]
    fn test_bill_requires_denominations() {
        let mut form = form_with_totals();
        assert_eq!(form.update(Action::GenerateRequested), None);
        assert_eq!(form.error(), Some("Enter at least one denomination count."));
    }

    #[test]
    fn test_bill_rejects_short_payment() {
        let mut form = form_with_totals();
        denom(&mut form, 100, "1");

        assert_eq!(form.update(Action::GenerateRequested), None);
        assert_eq!(
            form.error(),
            Some("Paid amount (100) is less than total amount (110). Please add more denominations.")
        );
        assert!(!form.generate_button().is_disabled());
    }

    #[test]
    fn test_bill_request_and_navigation() {
        let mut form = form_with_totals();
        denom(&mut form, 100, "2");

        let effect = form.update(Action::GenerateRequested);
        assert_eq!(
            effect,
            Some(Effect::GenerateBill(GenerateBillRequest {
                order_code: OrderCode::new("O1"),
                denominations: vec![DenominationCount { value: 100, count: 2 }],
            }))
        );
        assert_eq!(form.generate_button().label(), "Processing...");

        let effect = form.update(Action::BillGenerated(Ok(BillReceipt::for_order(
            OrderCode::new("O1"),
        ))));
        assert_eq!(effect, Some(Effect::Navigate("/bill/O1/".into())));
        assert_eq!(form.location(), Some("/bill/O1/"));
        assert_eq!(form.phase(), FormPhase::Navigated);
        assert_eq!(form.generate_button().label(), "Generate Bill");
    }

    #[test]
    fn test_bill_failure_shows_error() {
        let mut form = form_with_totals();
        denom(&mut form, 100, "2");
        form.update(Action::GenerateRequested);

        let effect = form.update(Action::BillGenerated(Err(ErrorMessage::Text(
            "Draft order 'O1' not found.".into(),
        ))));

        assert_eq!(effect, None);
        assert_eq!(form.error(), Some("Draft order 'O1' not found."));
        assert!(!form.generate_button().is_disabled());
        assert_eq!(form.phase(), FormPhase::TotalsShown);
    }

    #[test]
    fn test_navigated_form_ignores_actions() {
        let mut form = form_with_totals();
        denom(&mut form, 50, "3");
        form.update(Action::GenerateRequested);
        form.update(Action::BillGenerated(Ok(BillReceipt::for_order(OrderCode::new("O1")))));

        form.update(Action::AddRow);
        assert_eq!(form.rows().len(), 1);
        assert_eq!(form.update(Action::CalculateRequested), None);
    }

    #[test]
    fn test_error_persists_until_next_submit() {
        let mut form = BillingForm::new(&[100]);
        form.update(Action::RemoveRow(0));
        form.update(Action::AddRow);
        form.update(Action::EmailChanged("a@b.com".into()));
        assert_eq!(form.error(), Some("At least one product is required."));

        edit(&mut form, 0, Field::ProductCode, "P001");
        form.update(Action::CalculateRequested);
        assert_eq!(form.error(), None);
    }

    #[test]
    fn test_stray_completion_ignored() {
        let mut form = BillingForm::new(&[100]);
        form.update(Action::TotalCalculated(Ok(totals("O9", "1", "0", "1"))));

        assert_eq!(form.order_code(), None);
        assert!(!form.totals_visible());
    }
}
