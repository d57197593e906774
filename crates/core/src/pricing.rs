//! Pricing

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors that can occur while pricing a product or line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Discount percentages must lie within `0..=100`.
    #[error("discount of {0}% is outside 0..=100")]
    DiscountOutOfRange(Decimal),

    /// Prices cannot be negative.
    #[error("price {0} is negative")]
    NegativePrice(Decimal),

    /// The discounted price does not fit in a decimal.
    #[error("price {0} is too large to discount")]
    Overflow(Decimal),
}

/// Calculates the price a customer pays once the percentage discount is taken off.
///
/// A zero (or absent) discount leaves the price untouched.
///
/// # Errors
///
/// - [`PricingError::NegativePrice`]: the list price is below zero.
/// - [`PricingError::DiscountOutOfRange`]: the discount is negative or above 100.
/// - [`PricingError::Overflow`]: the price is too large to discount.
pub fn effective_price(price: Decimal, discount_percent: Decimal) -> Result<Decimal, PricingError> {
    if price < Decimal::ZERO {
        return Err(PricingError::NegativePrice(price));
    }

    if discount_percent < Decimal::ZERO || discount_percent > Decimal::ONE_HUNDRED {
        return Err(PricingError::DiscountOutOfRange(discount_percent));
    }

    if discount_percent.is_zero() {
        return Ok(price);
    }

    price
        .checked_mul(Decimal::ONE_HUNDRED - discount_percent)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(PricingError::Overflow(price))
}

/// Total for `quantity` units at `unit_price`, or `None` if it does not fit.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: u32) -> Option<Decimal> {
    unit_price.checked_mul(Decimal::from(quantity))
}

/// Wrap a decimal amount in the given currency for display.
#[must_use]
pub fn to_money(amount: Decimal, currency: &'static Currency) -> Money<'static, Currency> {
    Money::from_decimal(amount, currency)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn effective_price_without_discount_is_list_price() -> TestResult {
        let price = Decimal::new(2_500, 2);

        assert_eq!(effective_price(price, Decimal::ZERO)?, price);

        Ok(())
    }

    #[test]
    fn effective_price_takes_percentage_off() -> TestResult {
        let price = Decimal::from(80);

        assert_eq!(
            effective_price(price, Decimal::from(25))?,
            Decimal::from(60)
        );

        Ok(())
    }

    #[test]
    fn full_discount_is_free() -> TestResult {
        assert_eq!(
            effective_price(Decimal::from(10), Decimal::ONE_HUNDRED)?,
            Decimal::ZERO
        );

        Ok(())
    }

    #[test]
    fn discount_above_hundred_is_rejected() {
        let result = effective_price(Decimal::from(10), Decimal::from(101));

        assert_eq!(
            result,
            Err(PricingError::DiscountOutOfRange(Decimal::from(101)))
        );
    }

    #[test]
    fn negative_price_is_rejected() {
        let result = effective_price(Decimal::from(-1), Decimal::ZERO);

        assert_eq!(result, Err(PricingError::NegativePrice(Decimal::from(-1))));
    }

    #[test]
    fn huge_price_cannot_be_discounted() {
        let result = effective_price(Decimal::MAX, Decimal::from(10));

        assert_eq!(result, Err(PricingError::Overflow(Decimal::MAX)));
    }

    #[test]
    fn line_total_multiplies_by_quantity() {
        assert_eq!(
            line_total(Decimal::new(1_050, 2), 3),
            Some(Decimal::new(3_150, 2))
        );
    }

    #[test]
    fn line_total_overflow_is_none() {
        assert_eq!(line_total(Decimal::MAX, 2), None);
    }

    #[test]
    fn to_money_keeps_amount() {
        let money = to_money(Decimal::new(1_999, 2), GBP);

        assert_eq!(*money.amount(), Decimal::new(1_999, 2));
    }
}
