use spreadify::navigation::ROUTES;

use crate::context::CommandContext;
use crate::output::RouteEntry;

pub fn list(ctx: &CommandContext) -> Vec<RouteEntry> {
	ROUTES
		.iter()
		.map(|&(route, path)| RouteEntry {
			route,
			path,
			url: ctx.config().public_page(route).to_string(),
		})
		.collect()
}
