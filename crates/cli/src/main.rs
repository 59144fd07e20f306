use clap::Parser;
use spreadify_cli::cli::Cli;
use spreadify_cli::{commands, logging};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let ok = commands::dispatch(cli).await;
	if !ok {
		std::process::exit(1);
	}
}
