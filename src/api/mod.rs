use reqwest::{
    Client, RequestBuilder, StatusCode, Url,
    header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dto::{
        cart::{CartCount, DeleteCartLineRequest, UpdateCartLineRequest},
        payment::{
            CheckoutSession, CheckoutSessionRequest, CheckoutSessionResponse, VerifyPaymentQuery,
        },
    },
    error::{AppError, AppResult},
    models::{CartSnapshot, Order},
    response::ApiResponse,
};

pub mod endpoints;

use endpoints::{Endpoint, Endpoints};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client for the storefront backend.
///
/// Every request carries the session cookie (the cookie store plus the
/// configured cookie, if any) and a fresh `x-request-id`.
#[derive(Debug, Clone)]
pub struct StorefrontApi {
    http: Client,
    base_url: Url,
    endpoints: Endpoints,
}

impl StorefrontApi {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.api_url)
            .map_err(|err| AppError::Config(format!("invalid api url {}: {err}", config.api_url)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|_| AppError::Config("session cookie is not a valid header".into()))?;
            headers.insert(COOKIE, value);
        }

        let http = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url,
            endpoints: config.endpoints.clone(),
        })
    }

    pub async fn read_cart(&self) -> AppResult<CartSnapshot> {
        let request = self.request(&self.endpoints.read_cart)?;
        let envelope: ApiResponse<CartSnapshot> = self.send(request).await?;
        Ok(envelope.into_data()?.unwrap_or_default())
    }

    pub async fn update_cart_line(&self, line_id: &str, quantity: u32) -> AppResult<()> {
        let request = self
            .request(&self.endpoints.update_cart_line)?
            .json(&UpdateCartLineRequest { line_id, quantity });
        let envelope: ApiResponse<serde_json::Value> = self.send(request).await?;
        envelope.into_data()?;
        Ok(())
    }

    pub async fn delete_cart_line(&self, line_id: &str) -> AppResult<()> {
        let request = self
            .request(&self.endpoints.delete_cart_line)?
            .json(&DeleteCartLineRequest { line_id });
        let envelope: ApiResponse<serde_json::Value> = self.send(request).await?;
        envelope.into_data()?;
        Ok(())
    }

    pub async fn cart_count(&self) -> AppResult<u64> {
        let request = self.request(&self.endpoints.cart_count)?;
        let envelope: ApiResponse<CartCount> = self.send(request).await?;
        Ok(envelope.into_data()?.map_or(0, |data| data.count))
    }

    pub async fn create_checkout_session(
        &self,
        snapshot: &CartSnapshot,
    ) -> AppResult<CheckoutSession> {
        let request = self
            .request(&self.endpoints.create_checkout_session)?
            .json(&CheckoutSessionRequest {
                cart_items: snapshot.lines(),
            });
        let response: CheckoutSessionResponse = self.send(request).await?;
        CheckoutSession::try_from(response)
    }

    /// Orders of the signed-in user; `None` when the backend sent no `data`.
    ///
    /// The envelope is decoded whatever the status, so a signed-out `401`
    /// with no `data` reads as an empty history rather than a failure.
    pub async fn read_order_history(&self) -> AppResult<Option<Vec<Order>>> {
        let request = self.request(&self.endpoints.read_order_history)?;
        let (status, body) = self.exchange(request).await?;
        let envelope: ApiResponse<Vec<Order>> = serde_json::from_slice(&body)?;
        if !status.is_success() {
            tracing::warn!(
                status = %status,
                message = envelope.message.as_deref().unwrap_or_default(),
                "order history request was not successful"
            );
        }
        Ok(envelope.data)
    }

    /// Asks the backend to confirm the payment and save the order. Returns the backend message.
    pub async fn verify_payment(&self, session_id: &str) -> AppResult<String> {
        let request = self
            .request(&self.endpoints.verify_payment)?
            .query(&VerifyPaymentQuery { session_id });
        let envelope: ApiResponse<serde_json::Value> = self.send(request).await?;
        let message = envelope.message.clone().unwrap_or_default();
        envelope.into_data()?;
        Ok(message)
    }

    fn request(&self, endpoint: &Endpoint) -> AppResult<RequestBuilder> {
        let url = self
            .base_url
            .join(&endpoint.path)
            .map_err(|err| AppError::Config(format!("invalid endpoint {}: {err}", endpoint.path)))?;
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!(
            request_id = %request_id,
            method = %endpoint.method,
            url = %url,
            "request started"
        );
        Ok(self
            .http
            .request(endpoint.method.clone(), url)
            .header(REQUEST_ID_HEADER, request_id))
    }

    async fn exchange(&self, request: RequestBuilder) -> AppResult<(StatusCode, Vec<u8>)> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(status = %status, bytes = body.len(), "request finished");
        Ok((status, body))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let (status, body) = self.exchange(request).await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());
            return Err(AppError::Protocol(format!("status {status}: {message}")));
        }

        Ok(serde_json::from_slice(&body)?)
    }
}
