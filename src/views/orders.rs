use std::fmt;

use crate::{
    api::StorefrontApi,
    models::Order,
    money::display_usd,
    state::AppState,
};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch order details";
pub const MISSING_ORDER_MESSAGE: &str = "Missing data for this order";

#[derive(Debug, Clone, PartialEq)]
pub enum OrderHistoryState {
    Loading,
    Error(String),
    Empty,
    Populated(Vec<Order>),
}

/// Read-only order list, fetched once on mount.
#[derive(Debug)]
pub struct OrderHistoryView {
    api: StorefrontApi,
    state: OrderHistoryState,
}

impl OrderHistoryView {
    pub fn new(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            state: OrderHistoryState::Loading,
        }
    }

    pub fn state(&self) -> &OrderHistoryState {
        &self.state
    }

    pub async fn mount(&mut self) {
        if !matches!(self.state, OrderHistoryState::Loading) {
            return;
        }

        self.state = match self.api.read_order_history().await {
            Ok(Some(orders)) if !orders.is_empty() => {
                tracing::debug!(orders = orders.len(), "order list fetched");
                OrderHistoryState::Populated(orders)
            }
            Ok(_) => OrderHistoryState::Empty,
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch order details");
                OrderHistoryState::Error(FETCH_FAILED_MESSAGE.to_string())
            }
        };
    }

    pub fn render(&self) -> OrderHistoryRender {
        match &self.state {
            OrderHistoryState::Loading => OrderHistoryRender::Loading,
            OrderHistoryState::Error(message) => OrderHistoryRender::Error(message.clone()),
            OrderHistoryState::Empty => OrderHistoryRender::Empty,
            OrderHistoryState::Populated(orders) => OrderHistoryRender::Orders(
                orders
                    .iter()
                    .enumerate()
                    .map(|(index, order)| OrderCard::from_order(index, order))
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderProductRow {
    pub image: String,
    pub name: String,
    pub price: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderCard {
    Missing,
    Complete {
        placed_on: String,
        products: Vec<OrderProductRow>,
        payment_method: String,
        payment_status: String,
        shipping_amounts: Vec<String>,
        total_amount: String,
    },
}

impl OrderCard {
    fn from_order(index: usize, order: &Order) -> Self {
        let (Some(products), Some(payment)) = (&order.product_details, &order.payment_details)
        else {
            tracing::warn!(index, "missing productDetails or paymentDetails for order");
            return OrderCard::Missing;
        };

        OrderCard::Complete {
            placed_on: order
                .placed_on()
                .map(|day| day.format("%B %-d, %Y").to_string())
                .unwrap_or_else(|| "Invalid date".to_string()),
            products: products
                .iter()
                .map(|product| OrderProductRow {
                    image: product.image().to_string(),
                    name: product.name.clone().unwrap_or_default(),
                    price: display_usd(product.price.unwrap_or_default()),
                    quantity: product.quantity.unwrap_or_default(),
                })
                .collect(),
            payment_method: payment.method().to_string(),
            payment_status: payment.status().to_string(),
            shipping_amounts: order
                .shipping_options
                .iter()
                .map(|option| option.shipping_amount.unwrap_or_default().to_string())
                .collect(),
            total_amount: order.total_amount.unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderHistoryRender {
    Loading,
    Error(String),
    Empty,
    Orders(Vec<OrderCard>),
}

impl fmt::Display for OrderHistoryRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderHistoryRender::Loading => writeln!(f, "Loading orders..."),
            OrderHistoryRender::Error(message) => writeln!(f, "{message}"),
            OrderHistoryRender::Empty => writeln!(f, "No orders available"),
            OrderHistoryRender::Orders(cards) => {
                for card in cards {
                    match card {
                        OrderCard::Missing => writeln!(f, "{MISSING_ORDER_MESSAGE}")?,
                        OrderCard::Complete {
                            placed_on,
                            products,
                            payment_method,
                            payment_status,
                            shipping_amounts,
                            total_amount,
                        } => {
                            writeln!(f, "{placed_on}")?;
                            for product in products {
                                writeln!(
                                    f,
                                    "  {} {} Quantity : {} [{}]",
                                    product.name, product.price, product.quantity, product.image
                                )?;
                            }
                            writeln!(f, "  Payment Details :")?;
                            writeln!(f, "    Payment method : {payment_method}")?;
                            writeln!(f, "    Payment Status : {payment_status}")?;
                            writeln!(f, "  Shipping Details :")?;
                            for amount in shipping_amounts {
                                writeln!(f, "    Shipping Amount : {amount}")?;
                            }
                            writeln!(f, "  Total Amount : {total_amount}")?;
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
