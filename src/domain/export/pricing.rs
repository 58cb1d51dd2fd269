use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use super::model::ExportItem;

// ============================================================================
// Pricing - Money and Price Calculation
// ============================================================================

/// A monetary amount in minor units (cents). Formatting to a 2-decimal
/// string happens only at the HTTP boundary.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, qty: u32) -> Money {
        Money(self.0 * qty as i64)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Orders above this subtotal ship for free.
pub const FREE_SHIPPING_OVER: Money = Money::from_cents(100_00);

/// Flat shipping fee applied at or below the threshold.
pub const FLAT_SHIPPING: Money = Money::from_cents(10_00);

const TAX_RATE_PERCENT: i64 = 15;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub items_price: Money,
    pub shipping_price: Money,
    pub tax_price: Money,
    pub total_price: Money,
}

/// Compute the price breakdown for a set of line items.
///
/// Subtotal is the sum of unit price times quantity; shipping is a flat fee
/// waived strictly above the threshold; tax is 15% of the subtotal, rounded
/// half-up to the cent. Callers reject empty item lists before pricing.
pub fn calc_prices(items: &[ExportItem]) -> PriceBreakdown {
    let items_price: Money = items.iter().map(|item| item.price * item.qty).sum();

    let shipping_price = if items_price > FREE_SHIPPING_OVER {
        Money::ZERO
    } else {
        FLAT_SHIPPING
    };

    let tax_price = Money::from_cents((items_price.cents() * TAX_RATE_PERCENT + 50) / 100);

    let total_price = items_price + shipping_price + tax_price;

    PriceBreakdown {
        items_price,
        shipping_price,
        tax_price,
        total_price,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn item(price_cents: i64, qty: u32) -> ExportItem {
        ExportItem {
            product: Uuid::new_v4(),
            name: "Widget".to_string(),
            qty,
            price: Money::from_cents(price_cents),
            image: "/images/widget.jpg".to_string(),
        }
    }

    #[test]
    fn test_subtotal_below_threshold_pays_flat_shipping() {
        // 2 x 25.00 = 50.00 subtotal
        let prices = calc_prices(&[item(25_00, 2)]);

        assert_eq!(prices.items_price, Money::from_cents(50_00));
        assert_eq!(prices.shipping_price, FLAT_SHIPPING);
        assert_eq!(prices.tax_price, Money::from_cents(7_50));
        assert_eq!(prices.total_price, Money::from_cents(67_50));
    }

    #[test]
    fn test_subtotal_above_threshold_ships_free() {
        let prices = calc_prices(&[item(75_00, 2)]);

        assert_eq!(prices.items_price, Money::from_cents(150_00));
        assert_eq!(prices.shipping_price, Money::ZERO);
        assert_eq!(prices.tax_price, Money::from_cents(22_50));
        assert_eq!(prices.total_price, Money::from_cents(172_50));
    }

    #[test]
    fn test_exact_threshold_still_pays_shipping() {
        // The waiver applies strictly above 100.00
        let prices = calc_prices(&[item(100_00, 1)]);

        assert_eq!(prices.shipping_price, FLAT_SHIPPING);
        assert_eq!(prices.total_price, Money::from_cents(125_00));
    }

    #[test]
    fn test_tax_rounds_half_up_to_the_cent() {
        // 33.33 * 15% = 4.9995 -> 5.00
        let prices = calc_prices(&[item(33_33, 1)]);
        assert_eq!(prices.tax_price, Money::from_cents(5_00));

        // 0.03 * 15% = 0.0045 -> 0.00
        let prices = calc_prices(&[item(3, 1)]);
        assert_eq!(prices.tax_price, Money::ZERO);
    }

    #[test]
    fn test_multiple_lines_accumulate() {
        let prices = calc_prices(&[item(10_00, 3), item(5_25, 4)]);

        assert_eq!(prices.items_price, Money::from_cents(51_00));
        assert_eq!(prices.tax_price, Money::from_cents(7_65));
        assert_eq!(prices.total_price, Money::from_cents(68_65));
    }

    #[test]
    fn test_empty_items_hit_the_shipping_floor() {
        // Creation rejects empty carts upstream; the calculator itself
        // yields a zero subtotal with the flat fee applied.
        let prices = calc_prices(&[]);

        assert_eq!(prices.items_price, Money::ZERO);
        assert_eq!(prices.shipping_price, FLAT_SHIPPING);
        assert_eq!(prices.tax_price, Money::ZERO);
        assert_eq!(prices.total_price, FLAT_SHIPPING);
    }

    #[test]
    fn test_money_formats_to_two_decimals() {
        assert_eq!(Money::from_cents(67_50).to_string(), "67.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(120_000_00).to_string(), "120000.00");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }
}
