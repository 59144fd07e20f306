//! Subscription plans shown on the pricing page.

use serde::Serialize;

use crate::navigation::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
	pub name: &'static str,
	pub price: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub period: Option<&'static str>,
	pub features: &'static [&'static str],
	/// Payment-provider price id; `None` for free plans.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub price_id: Option<&'static str>,
}

/// Where subscribing to a plan leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeTarget {
	/// Free plans only need an account.
	Route(Route),
	/// Paid plans go through an external checkout for this price id.
	Checkout { price_id: &'static str },
}

impl Plan {
	pub fn is_free(&self) -> bool {
		self.price_id.is_none()
	}

	pub fn subscribe_target(&self) -> SubscribeTarget {
		match self.price_id {
			Some(price_id) => SubscribeTarget::Checkout { price_id },
			None => SubscribeTarget::Route(Route::Login),
		}
	}
}

pub const PLANS: &[Plan] = &[
	Plan {
		name: "Basic",
		price: "Free",
		period: None,
		features: &["720p Streaming", "Up to 2 guests", "Basic overlays", "Stream to 1 platform", "4 hours per stream"],
		price_id: None,
	},
	Plan {
		name: "Professional",
		price: "$25",
		period: Some("per month"),
		features: &[
			"1080p Streaming",
			"Up to 6 guests",
			"Custom overlays",
			"Stream to 3 platforms",
			"Unlimited streaming",
			"Recording storage",
			"Analytics",
		],
		price_id: Some("price_H5ggYwtDq4fbrJ"),
	},
	Plan {
		name: "Business",
		price: "$49",
		period: Some("per month"),
		features: &[
			"4K Streaming",
			"Up to 10 guests",
			"Advanced overlays",
			"Stream to unlimited platforms",
			"Unlimited streaming",
			"Priority support",
			"White-label service",
			"Team management",
		],
		price_id: Some("price_H5ggYwtDq4fbrK"),
	},
];

/// Looks up a plan by name, case-insensitively.
pub fn find_plan(name: &str) -> Option<&'static Plan> {
	PLANS.iter().find(|plan| plan.name.eq_ignore_ascii_case(name.trim()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn free_plan_routes_to_login() {
		let basic = find_plan("basic").unwrap();
		assert!(basic.is_free());
		assert_eq!(basic.subscribe_target(), SubscribeTarget::Route(Route::Login));
	}

	#[test]
	fn paid_plans_go_to_checkout() {
		let pro = find_plan(" Professional ").unwrap();
		assert_eq!(
			pro.subscribe_target(),
			SubscribeTarget::Checkout {
				price_id: "price_H5ggYwtDq4fbrJ"
			}
		);
		assert!(find_plan("enterprise").is_none());
	}

	#[test]
	fn price_ids_are_unique() {
		let ids: Vec<_> = PLANS.iter().filter_map(|p| p.price_id).collect();
		let mut deduped = ids.clone();
		deduped.sort_unstable();
		deduped.dedup();
		assert_eq!(ids.len(), deduped.len());
	}
}
