mod auth;
mod billing;
mod routes;
mod streams;
mod studio;

use std::time::{Duration, Instant};

use serde::Serialize;
use spreadify::Result;
use spreadify::studio::{Notice, Severity};
use tracing::error;

use crate::cli::{Cli, Commands};
use crate::context::CommandContext;
use crate::output::{DiagnosticLevel, OutputFormat, ResultBuilder, print_result};

pub use studio::StudioOptions;

/// Runs the parsed command and prints its result envelope.
///
/// Returns whether the command succeeded.
pub async fn dispatch(cli: Cli) -> bool {
	let started = Instant::now();
	let name = cli.command.name();
	let format = cli.format;
	let report = Report { name, format, started };

	let ctx = match CommandContext::new(cli.endpoints, cli.credentials) {
		Ok(ctx) => ctx,
		Err(err) => return report.emit::<()>(Err(err), Vec::new()),
	};

	match cli.command {
		Commands::Login { code, callback } => report.emit(auth::login(&ctx, code, callback).await, Vec::new()),
		Commands::Logout => report.emit(auth::logout(&ctx), Vec::new()),
		Commands::Whoami => report.emit(Ok(auth::whoami(&ctx)), Vec::new()),
		Commands::Plans => report.emit(Ok(billing::plans()), Vec::new()),
		Commands::Checkout { plan } => report.emit(billing::checkout(&ctx, &plan).await, Vec::new()),
		Commands::Verify { session_id } => report.emit(billing::verify(&ctx, &session_id).await, Vec::new()),
		Commands::Streams { action } => report.emit(streams::execute(&ctx, action).await, Vec::new()),
		Commands::Studio { deny_devices, duration } => {
			let options = StudioOptions {
				deny_devices,
				duration: duration.map(Duration::from_secs),
			};
			let (result, notices) = studio::run(&ctx, options).await;
			report.emit(result, notices)
		}
		Commands::Routes => report.emit(Ok(routes::list(&ctx)), Vec::new()),
	}
}

struct Report {
	name: &'static str,
	format: OutputFormat,
	started: Instant,
}

impl Report {
	fn emit<T: Serialize>(&self, result: Result<T>, notices: Vec<Notice>) -> bool {
		let mut builder = ResultBuilder::new(self.name).duration_ms(self.started.elapsed().as_millis() as u64);
		for notice in notices {
			let level = match notice.severity {
				Severity::Info => DiagnosticLevel::Info,
				Severity::Destructive => DiagnosticLevel::Error,
			};
			builder = builder.diagnostic_with_source(level, format!("{}: {}", notice.title, notice.description), "studio");
		}

		let result = match result {
			Ok(data) => builder.data(data).build(),
			Err(err) => {
				error!(target = "spreadify.cli", command = self.name, error = %err, "command failed");
				builder.failure(&err).build()
			}
		};
		print_result(&result, self.format);
		result.ok
	}
}
