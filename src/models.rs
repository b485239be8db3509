use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

pub const FALLBACK_ORDER_IMAGE: &str = "default-image.jpg";
pub const FALLBACK_PAYMENT_METHOD: &str = "N/A";
pub const FALLBACK_PAYMENT_STATUS: &str = "Unknown";

/// Treats an explicit `null` the same as an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartProduct {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "productName", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "sellingPrice", default, skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<Decimal>,
    #[serde(rename = "productImage", default, deserialize_with = "nullable")]
    pub images: Vec<String>,
}

impl CartProduct {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or_default()
    }

    pub fn unit_price(&self) -> Decimal {
        self.selling_price.unwrap_or(Decimal::ZERO)
    }

    pub fn first_image(&self) -> Option<&str> {
        non_empty(self.images.first())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "_id")]
    pub id: String,
    pub quantity: u32,
    #[serde(rename = "productId", default, skip_serializing_if = "Option::is_none")]
    pub product: Option<CartProduct>,
}

impl CartLine {
    pub fn unit_price(&self) -> Decimal {
        self.product
            .as_ref()
            .map_or(Decimal::ZERO, CartProduct::unit_price)
    }

    /// Unit price times quantity, saturating at `Decimal::MAX` on overflow.
    pub fn line_total(&self) -> Decimal {
        self.unit_price()
            .checked_mul(Decimal::from(self.quantity))
            .unwrap_or(Decimal::MAX)
    }
}

/// Cart lines in the order the remote store returned them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartSnapshot {
    lines: Vec<CartLine>,
}

impl CartSnapshot {
    pub fn new(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, line_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == line_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    pub quantity: u64,
    pub price: Decimal,
}

pub fn compute_totals(snapshot: &CartSnapshot) -> CartTotals {
    snapshot
        .lines()
        .iter()
        .fold(CartTotals::default(), |totals, line| CartTotals {
            quantity: totals.quantity.saturating_add(u64::from(line.quantity)),
            price: totals
                .price
                .checked_add(line.line_total())
                .unwrap_or(Decimal::MAX),
        })
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OrderProduct {
    #[serde(rename = "productId", default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub image: Vec<String>,
}

impl OrderProduct {
    pub fn image(&self) -> &str {
        non_empty(self.image.first()).unwrap_or(FALLBACK_ORDER_IMAGE)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PaymentDetails {
    #[serde(rename = "paymentId", default)]
    pub payment_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub payment_method_type: Vec<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
}

impl PaymentDetails {
    pub fn method(&self) -> &str {
        non_empty(self.payment_method_type.first()).unwrap_or(FALLBACK_PAYMENT_METHOD)
    }

    pub fn status(&self) -> &str {
        non_empty(self.payment_status.as_ref()).unwrap_or(FALLBACK_PAYMENT_STATUS)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ShippingOption {
    #[serde(default)]
    pub shipping_rate: Option<String>,
    #[serde(default)]
    pub shipping_amount: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Order {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "productDetails", default)]
    pub product_details: Option<Vec<OrderProduct>>,
    #[serde(rename = "paymentDetails", default)]
    pub payment_details: Option<PaymentDetails>,
    #[serde(default, deserialize_with = "nullable")]
    pub shipping_options: Vec<ShippingOption>,
    #[serde(rename = "totalAmount", default)]
    pub total_amount: Option<Decimal>,
}

impl Order {
    /// Calendar day the order was placed, when `createdAt` is a valid RFC 3339 timestamp.
    pub fn placed_on(&self) -> Option<NaiveDate> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|at| at.date_naive())
    }

    /// Orders missing either detail block render as a placeholder.
    pub fn is_complete(&self) -> bool {
        self.product_details.is_some() && self.payment_details.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, quantity: u32, price: i64) -> CartLine {
        CartLine {
            id: id.to_string(),
            quantity,
            product: Some(CartProduct {
                selling_price: Some(Decimal::from(price)),
                ..CartProduct::default()
            }),
        }
    }

    #[test]
    fn totals_of_empty_snapshot_are_zero() {
        let totals = compute_totals(&CartSnapshot::default());

        assert_eq!(totals.quantity, 0);
        assert_eq!(totals.price, Decimal::ZERO);
    }

    #[test]
    fn totals_sum_quantity_and_line_prices() {
        let snapshot = CartSnapshot::new(vec![line("a", 2, 10), line("b", 1, 5)]);

        let totals = compute_totals(&snapshot);

        assert_eq!(totals.quantity, 3);
        assert_eq!(totals.price, Decimal::from(25));
    }

    #[test]
    fn line_without_product_counts_quantity_at_zero_price() {
        let snapshot = CartSnapshot::new(vec![
            line("a", 3, 4),
            CartLine {
                id: "b".into(),
                quantity: 2,
                product: None,
            },
        ]);

        let totals = compute_totals(&snapshot);

        assert_eq!(totals.quantity, 5);
        assert_eq!(totals.price, Decimal::from(12));
    }

    #[test]
    fn huge_totals_saturate_instead_of_overflowing() {
        let snapshot: CartSnapshot = serde_json::from_str(
            r#"[
                {"_id": "a", "quantity": 1000000000, "productId": {"sellingPrice": 1e20}},
                {"_id": "b", "quantity": 1000000000, "productId": {"sellingPrice": 1e20}}
            ]"#,
        )
        .unwrap();

        let totals = compute_totals(&snapshot);

        assert_eq!(totals.quantity, 2_000_000_000);
        assert_eq!(totals.price, Decimal::MAX);
        assert_eq!(snapshot.lines()[0].line_total(), Decimal::MAX);
    }

    #[test]
    fn cart_line_decodes_wire_names_and_nulls() {
        let raw = r#"[{
            "_id": "line-1",
            "quantity": 2,
            "userId": "u-1",
            "productId": {
                "_id": "p-1",
                "productName": "Boat Airdopes",
                "category": "airpodes",
                "sellingPrice": 19.99,
                "productImage": null
            }
        }]"#;

        let snapshot: CartSnapshot = serde_json::from_str(raw).unwrap();
        let line = snapshot.line("line-1").unwrap();
        let product = line.product.as_ref().unwrap();

        assert_eq!(product.name(), "Boat Airdopes");
        assert_eq!(product.category(), "airpodes");
        assert_eq!(product.first_image(), None);
        assert_eq!(line.line_total(), "39.98".parse::<Decimal>().unwrap());
    }

    #[test]
    fn order_fallbacks() {
        let raw = r#"{
            "createdAt": "2026-10-18T09:30:00.000Z",
            "productDetails": [{"name": "Mouse", "price": 12, "quantity": 1, "image": []}],
            "paymentDetails": {"payment_method_type": [], "payment_status": ""}
        }"#;

        let order: Order = serde_json::from_str(raw).unwrap();
        let payment = order.payment_details.as_ref().unwrap();
        let products = order.product_details.as_ref().unwrap();

        assert!(order.is_complete());
        assert_eq!(order.placed_on(), NaiveDate::from_ymd_opt(2026, 10, 18));
        assert_eq!(products[0].image(), FALLBACK_ORDER_IMAGE);
        assert_eq!(payment.method(), FALLBACK_PAYMENT_METHOD);
        assert_eq!(payment.status(), FALLBACK_PAYMENT_STATUS);
    }

    #[test]
    fn order_without_payment_details_is_incomplete() {
        let order: Order =
            serde_json::from_str(r#"{"productDetails": [], "createdAt": "yesterday"}"#).unwrap();

        assert!(!order.is_complete());
        assert_eq!(order.placed_on(), None);
    }
}
