//! Plan and checkout commands.

use spreadify::pricing::{PLANS, Plan, SubscribeTarget, find_plan};
use spreadify::protocol::SessionVerification;
use spreadify::{Error, Result};

use crate::context::CommandContext;
use crate::output::CheckoutData;

pub fn plans() -> &'static [Plan] {
	PLANS
}

/// Starts subscribing to `plan`: free plans point at the login page, paid
/// plans create a checkout session.
pub async fn checkout(ctx: &CommandContext, plan: &str) -> Result<CheckoutData> {
	let plan = find_plan(plan).ok_or_else(|| {
		let known: Vec<&str> = PLANS.iter().map(|p| p.name).collect();
		Error::InvalidInput(format!("unknown plan `{plan}` (expected one of: {})", known.join(", ")))
	})?;

	match plan.subscribe_target() {
		SubscribeTarget::Route(route) => Ok(CheckoutData::Navigate {
			plan: plan.name.to_string(),
			url: ctx.config().public_page(route).to_string(),
		}),
		SubscribeTarget::Checkout { price_id } => {
			let redirect = ctx.api()?.billing().create_checkout_session(price_id).await?;
			Ok(CheckoutData::Checkout {
				plan: plan.name.to_string(),
				redirect,
			})
		}
	}
}

pub async fn verify(ctx: &CommandContext, session_id: &str) -> Result<SessionVerification> {
	ctx.api()?.billing().verify_session(session_id).await
}
