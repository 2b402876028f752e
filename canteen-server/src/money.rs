//! Money calculation utilities using rust_decimal for precision
//!
//! Prices travel as `f64` (JSON numbers); every sum and tax calculation is
//! done in `Decimal` and rounded back to 2 decimal places.

use rust_decimal::prelude::*;
use shared::models::CartItem;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Flat sales tax applied on top of the pre-tax order amount (5%)
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Pre-tax total of cart lines: sum of price x quantity
pub fn items_total(items: &[CartItem]) -> f64 {
    let total: Decimal = items
        .iter()
        .map(|line| to_decimal(line.item.price) * Decimal::from(line.quantity))
        .sum();
    to_f64(total.max(Decimal::ZERO))
}

/// Tax due on a pre-tax amount
pub fn tax_of(amount: f64) -> f64 {
    to_f64(to_decimal(amount) * TAX_RATE)
}

/// Amount including tax (amount x 1.05)
pub fn with_tax(amount: f64) -> f64 {
    to_f64(to_decimal(amount) * (Decimal::ONE + TAX_RATE))
}

/// Sum of already-rounded amounts without float drift
pub fn sum(amounts: impl IntoIterator<Item = f64>) -> f64 {
    to_f64(amounts.into_iter().map(to_decimal).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{MenuItem, NutritionalInfo};

    fn line(price: f64, quantity: u32) -> CartItem {
        CartItem {
            item: MenuItem {
                id: format!("item-{price}"),
                name: "Item".to_string(),
                description: String::new(),
                price,
                category: "Main Course".to_string(),
                image: String::new(),
                is_veg: true,
                cuisine: "Indian".to_string(),
                spice_level: 0,
                allergens: vec![],
                nutritional_info: NutritionalInfo::default(),
                is_available: true,
                ingredients: vec![],
                average_rating: 0.0,
                review_count: 0,
                preparation_time: 10,
            },
            quantity,
        }
    }

    #[test]
    fn test_to_decimal_precision() {
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);
        assert_eq!(to_f64(to_decimal(0.1) + to_decimal(0.2)), 0.3);
    }

    #[test]
    fn test_items_total() {
        assert_eq!(items_total(&[line(120.0, 2), line(60.0, 1)]), 300.0);
        assert_eq!(items_total(&[]), 0.0);
        assert_eq!(items_total(&[line(0.1, 3)]), 0.3);
    }

    #[test]
    fn test_tax_and_total() {
        assert_eq!(tax_of(300.0), 15.0);
        assert_eq!(with_tax(300.0), 315.0);
        // 33.33 * 1.05 = 34.9965 -> 35.00
        assert_eq!(with_tax(33.33), 35.0);
        assert_eq!(tax_of(0.0), 0.0);
    }

    #[test]
    fn test_sum_rounds() {
        assert_eq!(sum(vec![0.1; 10]), 1.0);
    }
}
