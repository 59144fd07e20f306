//! Diagnostic logging to stderr.
//!
//! Command output goes to stdout; everything emitted through `tracing` goes
//! to stderr so scripted callers can parse stdout untouched.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` enables info and `-vv` debug for
/// the spreadify targets (`-vvv` trace), with warnings only by default.
pub fn init_logging(verbose: u8) {
	let default = match verbose {
		0 => "warn",
		1 => "warn,spreadify=info,spreadify_cli=info",
		2 => "info,spreadify=debug,spreadify_cli=debug",
		_ => "debug,spreadify=trace,spreadify_cli=trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(std::io::stderr().is_terminal())
		.with_target(verbose > 1)
		.try_init();
}
