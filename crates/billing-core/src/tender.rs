//! # Tender Module
//!
//! The denomination palette: one count input per note/coin face value, and
//! the paid amount derived from it.
//!
//! ## Paid Amount
//! ```text
//! ┌───────────────────────────────────────────┐
//! │  Face value   Count input   Subtotal      │
//! │  ──────────   ───────────   ────────      │
//! │      500          "0"           0         │
//! │      100          "1"         100         │
//! │       50          "2"         100         │
//! │       10          "x"           0  ◄── no leading integer → 0
//! │                             ────────      │
//! │  paid_amount                  200         │
//! └───────────────────────────────────────────┘
//! ```
//!
//! Only slots with a positive count are tendered to the server.

use crate::amount::parse_int_prefix;
use crate::error::{CoreError, CoreResult};
use crate::types::DenominationCount;

/// Count input shown for an untouched slot.
const ZERO_COUNT: &str = "0";

/// One face value and the count text the cashier typed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenominationSlot {
    pub value: i64,
    pub count: String,
}

impl DenominationSlot {
    fn new(value: i64) -> Self {
        DenominationSlot {
            value,
            count: ZERO_COUNT.to_string(),
        }
    }

    /// Parsed count; text with no leading integer counts as 0.
    pub fn parsed_count(&self) -> i64 {
        parse_int_prefix(&self.count).unwrap_or(0)
    }

    /// Value of this slot at the current count.
    pub fn subtotal(&self) -> i64 {
        self.value.saturating_mul(self.parsed_count())
    }
}

/// The fixed set of denomination slots, highest face value first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenominationPalette {
    slots: Vec<DenominationSlot>,
}

impl DenominationPalette {
    /// Builds a palette with every count at zero.
    ///
    /// Face values are sorted descending; duplicates collapse into one slot.
    ///
    /// ## Example
    /// ```rust
    /// use billing_core::DenominationPalette;
    ///
    /// let palette = DenominationPalette::new(&[50, 100, 50]);
    /// let values: Vec<i64> = palette.slots().iter().map(|s| s.value).collect();
    /// assert_eq!(values, vec![100, 50]);
    /// ```
    pub fn new(values: &[i64]) -> Self {
        let mut values = values.to_vec();
        values.sort_unstable_by(|a, b| b.cmp(a));
        values.dedup();

        DenominationPalette {
            slots: values.into_iter().map(DenominationSlot::new).collect(),
        }
    }

    pub fn slots(&self) -> &[DenominationSlot] {
        &self.slots
    }

    /// Stores the typed count for `value`.
    pub fn set_count(&mut self, value: i64, input: impl Into<String>) -> CoreResult<()> {
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.value == value)
            .ok_or(CoreError::UnknownDenomination { value })?;

        slot.count = input.into();
        Ok(())
    }

    /// Sets every count back to zero.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.count = ZERO_COUNT.to_string();
        }
    }

    /// Σ(value × count) over all slots.
    pub fn paid_amount(&self) -> i64 {
        self.slots
            .iter()
            .fold(0i64, |paid, slot| paid.saturating_add(slot.subtotal()))
    }

    /// Slots with a positive count, in palette order.
    pub fn tendered(&self) -> Vec<DenominationCount> {
        self.slots
            .iter()
            .map(|slot| DenominationCount {
                value: slot.value,
                count: slot.parsed_count(),
            })
            .filter(|entry| entry.count > 0)
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paid_amount_sums_all_slots() {
        let mut palette = DenominationPalette::new(&[100, 50]);
        palette.set_count(100, "1").unwrap();
        palette.set_count(50, "2").unwrap();

        assert_eq!(palette.paid_amount(), 200);
        assert_eq!(
            palette.tendered(),
            vec![
                DenominationCount { value: 100, count: 1 },
                DenominationCount { value: 50, count: 2 },
            ]
        );
    }

    #[test]
    fn test_lenient_counts() {
        let mut palette = DenominationPalette::new(&[20, 10]);
        palette.set_count(20, "3 notes").unwrap();
        palette.set_count(10, "lots").unwrap();

        assert_eq!(palette.paid_amount(), 60);
        assert_eq!(palette.tendered(), vec![DenominationCount { value: 20, count: 3 }]);
    }

    #[test]
    fn test_negative_count_counts_but_is_not_tendered() {
        let mut palette = DenominationPalette::new(&[100, 10]);
        palette.set_count(100, "2").unwrap();
        palette.set_count(10, "-1").unwrap();

        assert_eq!(palette.paid_amount(), 190);
        assert_eq!(palette.tendered().len(), 1);
    }

    #[test]
    fn test_unknown_value_rejected() {
        let mut palette = DenominationPalette::new(&[100]);
        assert_eq!(
            palette.set_count(7, "1"),
            Err(CoreError::UnknownDenomination { value: 7 })
        );
        assert_eq!(palette.slots()[0].count, "0");
    }

    #[test]
    fn test_reset_zeroes_counts() {
        let mut palette = DenominationPalette::new(&[500, 1]);
        palette.set_count(500, "4").unwrap();
        palette.reset();

        assert!(palette.slots().iter().all(|slot| slot.count == "0"));
        assert_eq!(palette.paid_amount(), 0);
        assert!(palette.tendered().is_empty());
    }
}
