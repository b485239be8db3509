use serde::{Deserialize, Serialize};

use crate::models::CartLine;

#[derive(Debug, Serialize)]
pub struct CheckoutSessionRequest<'a> {
    #[serde(rename = "cartItems")]
    pub cart_items: &'a [CartLine],
}

/// Raw checkout-session reply; the payment provider's session object is returned unwrapped.
#[derive(Debug, Deserialize)]
pub struct CheckoutSessionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

impl TryFrom<CheckoutSessionResponse> for CheckoutSession {
    type Error = crate::error::AppError;

    fn try_from(response: CheckoutSessionResponse) -> Result<Self, Self::Error> {
        let id = response
            .id
            .filter(|id| !id.is_empty())
            .ok_or(crate::error::AppError::MissingSessionToken)?;
        Ok(Self {
            id,
            url: response.url.filter(|url| !url.is_empty()),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentQuery<'a> {
    pub session_id: &'a str,
}
