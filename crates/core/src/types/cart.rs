//! Cart line type and the quantity-merge rules.
//!
//! The merge rules are pure functions over a slice of lines so that the
//! persistent store only has to load, apply, and save.
//!
//! # Line lifecycle
//!
//! ```text
//! {absent} --add(d > 0)--> {qty = d}
//! {qty}    --add(d)------> {qty + d}, or {absent} when qty + d < 1
//! {qty}    --remove------> {absent}
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount;
use super::id::ProductId;
use super::product::Product;

/// A single line in a cart.
///
/// Serialized in the camelCase layout shared with the browser storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(
        default,
        deserialize_with = "amount::deserialize_lenient",
        serialize_with = "amount::serialize"
    )]
    pub price: Decimal,
    #[serde(
        default,
        deserialize_with = "amount::deserialize_lenient",
        serialize_with = "amount::serialize"
    )]
    pub labelled_price: Decimal,
    #[serde(default, deserialize_with = "amount::deserialize_quantity")]
    pub qty: u32,
}

impl CartLine {
    /// Build a new line for `product`, using `placeholder_image` when the
    /// product has no images.
    #[must_use]
    pub fn from_product(product: &Product, qty: u32, placeholder_image: &str) -> Self {
        Self {
            product_id: product.product_id.clone(),
            name: product.name.clone(),
            image: product
                .primary_image()
                .unwrap_or(placeholder_image)
                .to_owned(),
            price: product.price,
            labelled_price: product.labelled_price,
            qty,
        }
    }

    /// Price times quantity.
    ///
    /// A line whose total does not fit a decimal counts as zero, the same as
    /// a line with a non-numeric price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price
            .checked_mul(Decimal::from(self.qty))
            .unwrap_or(Decimal::ZERO)
    }

    /// Whether the labelled price is above the selling price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.labelled_price > self.price
    }

    /// Amount saved across the whole line, zero when not discounted or when
    /// the amount does not fit a decimal.
    #[must_use]
    pub fn savings(&self) -> Decimal {
        if !self.is_discounted() {
            return Decimal::ZERO;
        }
        self.labelled_price
            .checked_sub(self.price)
            .and_then(|per_item| per_item.checked_mul(Decimal::from(self.qty)))
            .unwrap_or(Decimal::ZERO)
    }
}

/// Largest quantity a cart line can hold.
pub const MAX_QTY: u32 = u32::MAX;

/// A quantity change that cannot be represented on a cart line.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The resulting quantity is above [`MAX_QTY`].
    #[error("quantity {requested} for product {product_id} exceeds the maximum of {max}", max = MAX_QTY)]
    TooLarge {
        product_id: ProductId,
        requested: i64,
    },
}

/// What a quantity change did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    /// A new line was created with this quantity.
    Inserted { qty: u32 },
    /// An existing line now has this quantity.
    Updated { qty: u32 },
    /// The line dropped below one and was removed.
    Removed,
    /// Nothing to do (negative or zero delta for an absent product).
    Unchanged,
}

impl LineChange {
    /// Whether the cart needs to be persisted after this change.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Apply a signed quantity delta for `product` to `lines`.
///
/// - Absent product: a delta of zero or less is a no-op, otherwise a new line
///   with `qty = delta` is appended.
/// - Present product: the delta is added; a result below one removes the line.
///
/// # Errors
///
/// Returns [`QuantityError::TooLarge`] if the resulting quantity exceeds
/// [`MAX_QTY`]. `lines` is left untouched in that case.
pub fn apply_delta(
    lines: &mut Vec<CartLine>,
    product: &Product,
    delta: i64,
    placeholder_image: &str,
) -> Result<LineChange, QuantityError> {
    let too_large = |requested: i64| QuantityError::TooLarge {
        product_id: product.product_id.clone(),
        requested,
    };

    let Some(index) = lines
        .iter()
        .position(|line| line.product_id == product.product_id)
    else {
        if delta <= 0 {
            return Ok(LineChange::Unchanged);
        }
        let qty = u32::try_from(delta).map_err(|_| too_large(delta))?;
        lines.push(CartLine::from_product(product, qty, placeholder_image));
        return Ok(LineChange::Inserted { qty });
    };

    let new_qty = i64::from(lines.get(index).map_or(0, |line| line.qty)).saturating_add(delta);
    if new_qty < 1 {
        lines.remove(index);
        return Ok(LineChange::Removed);
    }

    let qty = u32::try_from(new_qty).map_err(|_| too_large(new_qty))?;
    if let Some(line) = lines.get_mut(index) {
        line.qty = qty;
    }
    Ok(LineChange::Updated { qty })
}

/// Remove the line for `product_id`. Returns whether a line was removed.
pub fn remove_line(lines: &mut Vec<CartLine>, product_id: &ProductId) -> bool {
    let before = lines.len();
    lines.retain(|line| &line.product_id != product_id);
    lines.len() != before
}

/// Sum of `price * qty` over all lines.
///
/// Never panics: a line that would push the sum out of the decimal range
/// contributes zero.
#[must_use]
pub fn total(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(CartLine::line_total)
        .fold(Decimal::ZERO, |sum, line| sum.checked_add(line).unwrap_or(sum))
}

/// Sum of quantities over all lines.
#[must_use]
pub fn item_count(lines: &[CartLine]) -> u64 {
    lines.iter().map(|line| u64::from(line.qty)).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    const PLACEHOLDER: &str = "https://via.placeholder.com/150";

    fn product(id: &str, price: i64) -> Product {
        Product {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::from(price),
            labelled_price: Decimal::from(price + 5),
            images: vec![format!("https://img.example/{id}.jpg")],
        }
    }

    #[test]
    fn test_insert_then_merge() {
        let mut lines = Vec::new();
        let p = product("P1", 10);

        assert_eq!(
            apply_delta(&mut lines, &p, 2, PLACEHOLDER).unwrap(),
            LineChange::Inserted { qty: 2 }
        );
        assert_eq!(
            apply_delta(&mut lines, &p, 3, PLACEHOLDER).unwrap(),
            LineChange::Updated { qty: 5 }
        );
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().qty, 5);
    }

    #[test]
    fn test_non_positive_delta_on_absent_is_noop() {
        let mut lines = Vec::new();
        let p = product("P1", 10);
        assert_eq!(apply_delta(&mut lines, &p, 0, PLACEHOLDER).unwrap(), LineChange::Unchanged);
        assert_eq!(apply_delta(&mut lines, &p, -3, PLACEHOLDER).unwrap(), LineChange::Unchanged);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_decrement_to_zero_removes() {
        let mut lines = Vec::new();
        let p = product("P1", 10);
        apply_delta(&mut lines, &p, 3, PLACEHOLDER).unwrap();
        assert_eq!(apply_delta(&mut lines, &p, -3, PLACEHOLDER).unwrap(), LineChange::Removed);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_decrement_past_zero_removes() {
        let mut lines = Vec::new();
        let p = product("P1", 10);
        apply_delta(&mut lines, &p, 1, PLACEHOLDER).unwrap();
        assert_eq!(apply_delta(&mut lines, &p, -10, PLACEHOLDER).unwrap(), LineChange::Removed);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_decrement_keeps_line_above_one() {
        let mut lines = Vec::new();
        let p = product("P1", 10);
        apply_delta(&mut lines, &p, 4, PLACEHOLDER).unwrap();
        assert_eq!(
            apply_delta(&mut lines, &p, -1, PLACEHOLDER).unwrap(),
            LineChange::Updated { qty: 3 }
        );
    }

    #[test]
    fn test_placeholder_image_when_no_images() {
        let mut p = product("P1", 10);
        p.images.clear();
        let line = CartLine::from_product(&p, 1, PLACEHOLDER);
        assert_eq!(line.image, PLACEHOLDER);
    }

    #[test]
    fn test_remove_line() {
        let mut lines = Vec::new();
        apply_delta(&mut lines, &product("P1", 10), 1, PLACEHOLDER).unwrap();
        assert!(!remove_line(&mut lines, &ProductId::new("P2")));
        assert_eq!(lines.len(), 1);
        assert!(remove_line(&mut lines, &ProductId::new("P1")));
        assert!(lines.is_empty());
    }

    #[test]
    fn test_total_and_item_count() {
        let mut lines = Vec::new();
        apply_delta(&mut lines, &product("A", 10), 2, PLACEHOLDER).unwrap();
        apply_delta(&mut lines, &product("B", 5), 3, PLACEHOLDER).unwrap();
        assert_eq!(total(&lines), Decimal::from(35));
        assert_eq!(item_count(&lines), 5);
        assert_eq!(total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_discount_helpers() {
        let line = CartLine::from_product(&product("P1", 20), 2, PLACEHOLDER);
        assert!(line.is_discounted());
        assert_eq!(line.savings(), Decimal::from(10));
        assert_eq!(line.line_total(), Decimal::from(40));
    }

    #[test]
    fn test_stored_layout_is_camel_case_numbers() {
        let line = CartLine::from_product(&product("P1", 20), 1, PLACEHOLDER);
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["productId"], json!("P1"));
        assert_eq!(value["price"], json!(20));
        assert_eq!(value["labelledPrice"], json!(25));
        assert_eq!(value["qty"], json!(1));
    }

    #[test]
    fn test_non_numeric_fields_contribute_zero() {
        let lines: Vec<CartLine> = serde_json::from_value(json!([
            {"productId": "A", "price": 10, "qty": 2},
            {"productId": "B", "price": "oops", "qty": 3},
            {"productId": "C", "price": 4, "qty": null}
        ]))
        .unwrap();
        assert_eq!(total(&lines), Decimal::from(20));
    }

    #[test]
    fn test_quantity_above_max_is_rejected_without_mutation() {
        let mut lines = Vec::new();
        let p = product("P1", 10);

        apply_delta(&mut lines, &p, 3_000_000_000, PLACEHOLDER).unwrap();
        let err = apply_delta(&mut lines, &p, 3_000_000_000, PLACEHOLDER).unwrap_err();
        assert_eq!(
            err,
            QuantityError::TooLarge {
                product_id: ProductId::new("P1"),
                requested: 6_000_000_000,
            }
        );
        assert_eq!(lines.first().unwrap().qty, 3_000_000_000);

        let mut empty = Vec::new();
        assert!(apply_delta(&mut empty, &p, i64::from(MAX_QTY) + 1, PLACEHOLDER).is_err());
        assert!(empty.is_empty());
        assert_eq!(
            apply_delta(&mut empty, &p, i64::from(MAX_QTY), PLACEHOLDER).unwrap(),
            LineChange::Inserted { qty: MAX_QTY }
        );
    }

    #[test]
    fn test_overflowing_amounts_count_as_zero() {
        let lines: Vec<CartLine> = serde_json::from_value(json!([
            {"productId": "A", "price": "70000000000000000000000000000", "labelledPrice": 0, "qty": 2},
            {"productId": "B", "price": 0, "labelledPrice": "70000000000000000000000000000", "qty": 2},
            {"productId": "C", "price": 10, "labelledPrice": 10, "qty": 3}
        ]))
        .unwrap();

        assert_eq!(lines.first().unwrap().line_total(), Decimal::ZERO);
        assert_eq!(lines.get(1).unwrap().savings(), Decimal::ZERO);
        assert_eq!(total(&lines), Decimal::from(30));
    }

    #[test]
    fn test_total_skips_line_that_overflows_the_sum() {
        let huge = Decimal::MAX;
        let mut lines = Vec::new();
        apply_delta(&mut lines, &product("A", 1), 1, PLACEHOLDER).unwrap();
        let mut line = CartLine::from_product(&product("B", 0), 1, PLACEHOLDER);
        line.price = huge;
        lines.push(line);

        assert_eq!(total(&lines), Decimal::from(1));
    }
}
