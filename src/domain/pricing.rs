//! Price derivation
//!
//! Pure projections from a product's price pair to what the UI shows on
//! badges and line totals. No state, no clock.

use serde::Serialize;

use crate::domain::catalog::Product;

/// Everything a price badge needs, derived in one place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPrice {
    pub price: i64,
    pub original_price: Option<i64>,
    pub discount_percent: u8,
}

/// Discount percentage in 0..=100.
///
/// Zero when there is no `original_price` or it does not exceed `price`;
/// otherwise `100 * (original - price) / original` rounded half-up, so
/// 1899 against 2499 shows 24%.
pub fn discount_percent(product: &Product) -> u8 {
    match product.original_price {
        Some(original) if original > product.price && original > 0 => {
            let off = original - product.price;
            ((off * 200 + original) / (2 * original)) as u8
        }
        _ => 0,
    }
}

pub fn display_price(product: &Product) -> DisplayPrice {
    DisplayPrice {
        price: product.price,
        original_price: product.original_price,
        discount_percent: discount_percent(product),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(price: i64, original_price: Option<i64>) -> Product {
        let now = Utc::now();
        Product {
            id: "1".into(),
            name: "Embroidered Kurti".into(),
            description: String::new(),
            price,
            original_price,
            images: vec!["/images/products/kurti-1.jpg".into()],
            category: "traditional".into(),
            tags: vec![],
            in_stock: true,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_no_discount_without_original_price() {
        assert_eq!(discount_percent(&product(1899, None)), 0);
        assert_eq!(discount_percent(&product(1899, Some(1899))), 0);
        assert_eq!(discount_percent(&product(1899, Some(1500))), 0);
    }

    #[test]
    fn test_discount_rounds_half_up() {
        // 600 / 2499 = 24.0096..%
        assert_eq!(discount_percent(&product(1899, Some(2499))), 24);
        // 25 / 200 = 12.5% rounds up
        assert_eq!(discount_percent(&product(175, Some(200))), 13);
        assert_eq!(discount_percent(&product(0, Some(100))), 100);
    }

    #[test]
    fn test_display_price_projection() {
        let display = display_price(&product(999, Some(1499)));
        assert_eq!(display.price, 999);
        assert_eq!(display.original_price, Some(1499));
        assert_eq!(display.discount_percent, 33);
    }
}
