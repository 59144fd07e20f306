use reqwest::Method;
use serde::Serialize;
use spreadify_protocol::{CheckoutSession, CheckoutSessionRequest, SessionVerification, VerifySessionRequest};
use tracing::info;

use super::ApiClient;
use crate::error::{Error, Result};
use crate::navigation::Route;

/// `/stripe` endpoints.
pub struct BillingApi<'a> {
	client: &'a ApiClient,
}

/// Everything the external checkout page needs to take over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRedirect {
	pub session_id: String,
	pub publishable_key: String,
	pub success_url: String,
	pub cancel_url: String,
}

impl<'a> BillingApi<'a> {
	pub(super) fn new(client: &'a ApiClient) -> Self {
		Self { client }
	}

	/// Creates a checkout session for `price_id`.
	///
	/// The checkout returns to the success page when paid and to the pricing
	/// page when abandoned.
	pub async fn create_checkout_session(&self, price_id: &str) -> Result<CheckoutRedirect> {
		let config = self.client.config();
		if config.stripe_public_key().is_empty() {
			return Err(Error::Config("payment provider publishable key is not configured".into()));
		}

		let body = CheckoutSessionRequest {
			price_id: price_id.to_string(),
			success_url: config.public_page(Route::Success).to_string(),
			cancel_url: config.public_page(Route::Pricing).to_string(),
		};
		let session: CheckoutSession = self.client.send_json(Method::POST, self.client.endpoint("/stripe/create-checkout-session"), &body).await?;
		info!(target = "spreadify.api", price_id, session_id = %session.session_id, "checkout session created");

		Ok(CheckoutRedirect {
			session_id: session.session_id,
			publishable_key: config.stripe_public_key().to_string(),
			success_url: body.success_url,
			cancel_url: body.cancel_url,
		})
	}

	/// Verifies a completed checkout.
	pub async fn verify_session(&self, session_id: &str) -> Result<SessionVerification> {
		let body = VerifySessionRequest {
			session_id: session_id.to_string(),
		};
		self.client.send_json(Method::POST, self.client.endpoint("/stripe/verify-session"), &body).await
	}
}
