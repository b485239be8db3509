use std::fmt;

use reqwest::Url;

use crate::{api::StorefrontApi, state::AppState};

pub const SUCCESS_MESSAGE: &str = "Payment Successfully";
pub const ORDERS_LINK_LABEL: &str = "See Order";
pub const ORDERS_LINK_TARGET: &str = "/order";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Pending,
    MissingSessionId,
    Verified(String),
    Failed(String),
}

/// Landing page after the hosted checkout.
///
/// The verification result is only logged and recorded; the rendered
/// confirmation is the same whatever the backend answered.
#[derive(Debug)]
pub struct PaymentSuccessView {
    api: StorefrontApi,
    session_id: Option<String>,
    verification: VerificationOutcome,
}

impl PaymentSuccessView {
    /// `location` may be a full URL, a `?query` or a bare query string.
    pub fn new(state: &AppState, location: &str) -> Self {
        Self {
            api: state.api.clone(),
            session_id: session_id_from(location),
            verification: VerificationOutcome::Pending,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn verification(&self) -> &VerificationOutcome {
        &self.verification
    }

    pub async fn mount(&mut self) {
        let Some(session_id) = self.session_id.as_deref() else {
            tracing::error!("session id is missing from the url");
            self.verification = VerificationOutcome::MissingSessionId;
            return;
        };

        self.verification = match self.api.verify_payment(session_id).await {
            Ok(message) => {
                tracing::info!(session_id, message = %message, "order saved successfully");
                VerificationOutcome::Verified(message)
            }
            Err(err) => {
                tracing::error!(session_id, error = %err, "failed to verify payment");
                VerificationOutcome::Failed(err.to_string())
            }
        };
    }

    pub fn render(&self) -> SuccessRender {
        SuccessRender {
            message: SUCCESS_MESSAGE,
            link_label: ORDERS_LINK_LABEL,
            link_target: ORDERS_LINK_TARGET,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessRender {
    pub message: &'static str,
    pub link_label: &'static str,
    pub link_target: &'static str,
}

impl fmt::Display for SuccessRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;
        writeln!(f, "{} -> {}", self.link_label, self.link_target)
    }
}

fn session_id_from(location: &str) -> Option<String> {
    let url = match Url::parse(location) {
        Ok(url) => url,
        Err(_) => {
            let query = location.trim_start_matches('?');
            let mut url = Url::parse("http://localhost/").ok()?;
            url.set_query(Some(query));
            url
        }
    };

    url.query_pairs()
        .find(|(key, _)| key == "session_id")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
