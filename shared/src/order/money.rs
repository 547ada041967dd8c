//! Money calculation utilities using rust_decimal for precision
//!
//! Monetary values travel as JSON numbers and are held as `Decimal`
//! everywhere in memory. Totals are always re-derived from their lines.

use rust_decimal::prelude::*;

/// Monetary amount
pub type Money = Decimal;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Something with a quantity and a unit price
pub trait PricedLine {
    fn quantity(&self) -> Money;
    fn unit_price(&self) -> Money;

    fn line_total(&self) -> Money {
        line_total(self.quantity(), self.unit_price())
    }
}

/// Round to cents, midpoint away from zero
#[inline]
pub fn round_money(value: Money) -> Money {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// `quantity × unit_price`, rounded to cents
#[inline]
pub fn line_total(quantity: Money, unit_price: Money) -> Money {
    round_money(quantity * unit_price)
}

/// `Σ(quantity × unit_price)` over the lines
pub fn compute_total<'a, L, I>(lines: I) -> Money
where
    L: PricedLine + 'a,
    I: IntoIterator<Item = &'a L>,
{
    round_money(lines.into_iter().map(PricedLine::line_total).sum())
}

/// Equality within [`MONEY_TOLERANCE`]
#[inline]
pub fn approx_eq(a: Money, b: Money) -> bool {
    (a - b).abs() <= MONEY_TOLERANCE
}

/// Convert f64 to Decimal
///
/// Non-finite input logs an error and yields zero.
#[inline]
pub fn to_decimal(value: f64) -> Money {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(
            value = ?value,
            "Non-finite f64 in monetary calculation, defaulting to zero"
        );
        Decimal::ZERO
    })
}

/// Format with two decimals, e.g. `1234.50`
pub fn format_money(value: Money) -> String {
    format!("{:.2}", round_money(value))
}

impl PricedLine for crate::models::OrderItem {
    fn quantity(&self) -> Money {
        self.quantity
    }

    fn unit_price(&self) -> Money {
        self.unit_price
    }
}

impl PricedLine for crate::models::CreditMemoItem {
    fn quantity(&self) -> Money {
        self.quantity
    }

    fn unit_price(&self) -> Money {
        self.unit_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreditMemoItem;

    fn item(qty: i64, price: Money) -> CreditMemoItem {
        CreditMemoItem {
            product_id: "p".into(),
            quantity: Decimal::from(qty),
            unit_price: price,
            ..Default::default()
        }
    }

    #[test]
    fn test_to_decimal_precision() {
        let a = 0.1_f64;
        let b = 0.2_f64;
        assert_ne!(a + b, 0.3);
        assert_eq!(to_decimal(a) + to_decimal(b), Decimal::new(3, 1));
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
    }

    #[test]
    fn test_compute_total() {
        let items = vec![item(3, Decimal::new(1099, 2)), item(2, Decimal::new(5, 1))];
        assert_eq!(compute_total(&items), Decimal::new(3397, 2));
        assert_eq!(compute_total::<CreditMemoItem, _>(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_compute_total_ignores_stale_line_total() {
        let mut stale = item(2, Decimal::from(5));
        stale.total = Decimal::from(999);
        assert_eq!(compute_total(&[stale]), Decimal::from(10));
    }

    #[test]
    fn test_round_and_format() {
        assert_eq!(round_money(Decimal::new(12345, 3)), Decimal::new(1235, 2));
        assert_eq!(format_money(Decimal::from(100)), "100.00");
        assert_eq!(format_money(Decimal::new(6025, 2)), "60.25");
        assert!(approx_eq(Decimal::new(1000, 2), Decimal::new(1001, 2)));
        assert!(!approx_eq(Decimal::new(1000, 2), Decimal::new(1002, 2)));
    }
}
