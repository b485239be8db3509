use std::env;

use crate::api::endpoints::Endpoints;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_CHECKOUT_URL: &str = "https://checkout.stripe.com/c/pay/";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub session_cookie: Option<String>,
    pub stripe_public_key: Option<String>,
    pub checkout_url: String,
    pub endpoints: Endpoints,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_url = env::var("STOREFRONT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let session_cookie = env::var("STOREFRONT_SESSION_COOKIE")
            .ok()
            .filter(|c| !c.is_empty());
        let stripe_public_key = env::var("STRIPE_PUBLIC_KEY").ok().filter(|k| !k.is_empty());
        let checkout_url = env::var("STOREFRONT_CHECKOUT_URL")
            .unwrap_or_else(|_| DEFAULT_CHECKOUT_URL.to_string());

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            anyhow::bail!("STOREFRONT_API_URL must be an http(s) url, got {api_url}");
        }

        Ok(Self {
            api_url,
            session_cookie,
            stripe_public_key,
            checkout_url,
            endpoints: Endpoints::default(),
        })
    }

    /// Config pointing at `api_url` with every optional setting left unset.
    pub fn for_api(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            session_cookie: None,
            stripe_public_key: None,
            checkout_url: DEFAULT_CHECKOUT_URL.to_string(),
            endpoints: Endpoints::default(),
        }
    }

    pub fn with_stripe_public_key(mut self, key: impl Into<String>) -> Self {
        self.stripe_public_key = Some(key.into());
        self
    }

    /// The payment provider can only be initialised with a publishable key.
    pub fn payment_provider_ready(&self) -> bool {
        self.stripe_public_key
            .as_deref()
            .is_some_and(|key| !key.is_empty())
    }
}
