use reqwest::Method;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: String,
}

impl Endpoint {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

/// Method and path of every backend call the views make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub read_cart: Endpoint,
    pub update_cart_line: Endpoint,
    pub delete_cart_line: Endpoint,
    pub cart_count: Endpoint,
    pub create_checkout_session: Endpoint,
    pub read_order_history: Endpoint,
    pub verify_payment: Endpoint,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            read_cart: Endpoint::new(Method::GET, "/api/view-card-product"),
            update_cart_line: Endpoint::new(Method::POST, "/api/update-cart-product"),
            delete_cart_line: Endpoint::new(Method::POST, "/api/delete-cart-product"),
            cart_count: Endpoint::new(Method::GET, "/api/countAddToCartProduct"),
            create_checkout_session: Endpoint::new(Method::POST, "/api/checkout"),
            read_order_history: Endpoint::new(Method::GET, "/api/order-list"),
            verify_payment: Endpoint::new(Method::GET, "/api/verify-payment"),
        }
    }
}
