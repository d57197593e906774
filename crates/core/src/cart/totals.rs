//! Cart Totals

use rust_decimal::Decimal;

use crate::cart::line::CartLine;

/// Figures derived from the cart's lines.
///
/// Only ever built by folding over the current lines, so it cannot drift from
/// them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartTotals {
    line_count: usize,
    unit_count: u64,
    grand_total: Decimal,
}

impl CartTotals {
    /// Fold the given lines into totals.
    ///
    /// Returns `None` if any subtotal or the grand total does not fit in a
    /// decimal.
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Option<Self> {
        lines.iter().try_fold(Self::default(), |acc, line| {
            Some(Self {
                line_count: acc.line_count + 1,
                unit_count: acc.unit_count.checked_add(u64::from(line.quantity))?,
                grand_total: acc.grand_total.checked_add(line.subtotal()?)?,
            })
        })
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Sum of quantities across lines.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.unit_count
    }

    /// Sum of `unit_price × quantity` across lines.
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }
}
