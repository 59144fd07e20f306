//! Checkout session bodies for the payment provider integration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /stripe/create-checkout-session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionRequest {
	pub price_id: String,
	pub success_url: String,
	pub cancel_url: String,
}

/// Checkout session created by the backend.
///
/// The backend has answered with both `sessionId` and `id` over time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
	#[serde(alias = "id")]
	pub session_id: String,
}

/// Body of `POST /stripe/verify-session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifySessionRequest {
	pub session_id: String,
}

/// Verification result for a completed checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionVerification {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	#[serde(default, alias = "customer_email", skip_serializing_if = "Option::is_none")]
	pub customer_email: Option<String>,
	/// Fields this client does not model yet.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn checkout_request_uses_camel_case() {
		let body = CheckoutSessionRequest {
			price_id: "price_1".into(),
			success_url: "http://localhost:5173/success".into(),
			cancel_url: "http://localhost:5173/pricing".into(),
		};
		assert_eq!(
			serde_json::to_value(&body).unwrap(),
			json!({
				"priceId": "price_1",
				"successUrl": "http://localhost:5173/success",
				"cancelUrl": "http://localhost:5173/pricing",
			})
		);
	}

	#[test]
	fn checkout_session_accepts_id_alias() {
		let a: CheckoutSession = serde_json::from_value(json!({ "sessionId": "cs_1" })).unwrap();
		let b: CheckoutSession = serde_json::from_value(json!({ "id": "cs_1" })).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn verification_keeps_unknown_fields() {
		let v: SessionVerification = serde_json::from_value(json!({
			"status": "complete",
			"plan": "professional",
		}))
		.unwrap();
		assert_eq!(v.status.as_deref(), Some("complete"));
		assert_eq!(v.extra["plan"], "professional");
	}
}
