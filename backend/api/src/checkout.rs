//! Hosted-checkout provider client.
//!
//! Subscription purchases are not processed here; the provider hosts the
//! payment page and we only create a session and hand its URL back to the
//! frontend. Rate-limit responses are retried with bounded exponential
//! backoff; unlike a background poller, a request handler is waiting on
//! this call, so the attempts are capped rather than unbounded.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use invest_core::PlanKey;

use crate::config::Config;
use crate::errors::{ApiError, Result};

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF_SECS: u64 = 1;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionRequest {
    /// Provider price identifier for the chosen plan.
    pub price_id: String,
    /// Amount in cents, as providers bill integers.
    pub amount_cents: i64,
    pub customer_email: String,
    pub success_url: String,
    pub cancel_url: String,
    /// Echoed back in the provider webhook so the purchase can be matched
    /// to a plan upgrade.
    pub metadata: SessionMetadata,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionMetadata {
    pub plan_key: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
}

#[derive(Clone)]
pub struct CheckoutClient {
    client: Client,
    base_url: String,
    secret: String,
    success_url: String,
    cancel_url: String,
}

impl CheckoutClient {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            base_url: config.checkout_url.trim_end_matches('/').to_string(),
            secret: config.checkout_secret.clone(),
            success_url: config.checkout_success_url.clone(),
            cancel_url: config.checkout_cancel_url.clone(),
        }
    }

    /// Build the session payload for a plan purchase.
    pub fn session_request(
        &self,
        user_id: i64,
        email: &str,
        plan: PlanKey,
        price_id: &str,
        price_usd: f64,
    ) -> SessionRequest {
        SessionRequest {
            price_id: price_id.to_string(),
            amount_cents: (price_usd * 100.0).round() as i64,
            customer_email: email.to_string(),
            success_url: self.success_url.clone(),
            cancel_url: self.cancel_url.clone(),
            metadata: SessionMetadata {
                plan_key: plan.as_str().to_string(),
                user_id,
            },
        }
    }

    /// Create a hosted checkout session and return its URL.
    pub async fn create_session(&self, request: &SessionRequest) -> Result<String> {
        let endpoint = format!("{}/v1/checkout/sessions", self.base_url);
        let mut backoff = INITIAL_BACKOFF_SECS;

        for attempt in 1..=MAX_ATTEMPTS {
            let response = self
                .client
                .post(&endpoint)
                .bearer_auth(&self.secret)
                .json(request)
                .send()
                .await;

            match response {
                Err(e) if attempt < MAX_ATTEMPTS => {
                    warn!("Checkout request failed (retry in {backoff}s): {e}");
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff *= 2;
                }
                Err(e) => return Err(ApiError::Checkout(e.to_string())),
                Ok(resp) => {
                    let status = resp.status();
                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS && attempt < MAX_ATTEMPTS {
                        warn!("Checkout provider rate-limited (retry in {backoff}s)");
                        tokio::time::sleep(Duration::from_secs(backoff)).await;
                        backoff *= 2;
                        continue;
                    }
                    if !status.is_success() {
                        let message = resp
                            .json::<ProviderError>()
                            .await
                            .ok()
                            .and_then(|e| e.message)
                            .unwrap_or_else(|| format!("provider returned {status}"));
                        return Err(ApiError::Checkout(message));
                    }
                    let session: SessionResponse = resp
                        .json()
                        .await
                        .map_err(|e| ApiError::Checkout(e.to_string()))?;
                    tracing::info!("Created checkout session {}", session.id);
                    return Ok(session.url);
                }
            }
        }

        Err(ApiError::Checkout("provider rate limit exceeded".to_string()))
    }
}
