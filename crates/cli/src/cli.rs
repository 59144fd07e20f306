use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use spreadify::protocol::StreamStatus;

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "spreadify")]
#[command(about = "Spreadify studio client - accounts, billing, streams and the live studio")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format
	#[arg(short, long, global = true, value_enum, default_value = "json")]
	pub format: OutputFormat,

	/// Credential file (defaults to the user config directory)
	#[arg(long, global = true, value_name = "FILE", env = "SPREADIFY_CREDENTIALS_FILE")]
	pub credentials: Option<PathBuf>,

	#[command(flatten)]
	pub endpoints: EndpointArgs,

	#[command(subcommand)]
	pub command: Commands,
}

/// Backend endpoints and public identifiers. Unset values fall back to the
/// local development defaults, with a warning.
#[derive(Args, Debug, Clone, Default)]
pub struct EndpointArgs {
	/// Backend HTTP API base URL
	#[arg(long, global = true, value_name = "URL", env = "SPREADIFY_API_URL")]
	pub api_url: Option<String>,

	/// Control channel base URL (ws:// or wss://)
	#[arg(long, global = true, value_name = "URL", env = "SPREADIFY_WS_URL")]
	pub ws_url: Option<String>,

	/// Public front-end URL used for checkout return pages
	#[arg(long, global = true, value_name = "URL", env = "SPREADIFY_PUBLIC_URL")]
	pub public_url: Option<String>,

	/// Payment provider publishable key
	#[arg(long, global = true, value_name = "KEY", env = "SPREADIFY_STRIPE_PUBLIC_KEY", hide_env_values = true)]
	pub stripe_public_key: Option<String>,

	/// OAuth client id
	#[arg(long, global = true, value_name = "ID", env = "SPREADIFY_GOOGLE_CLIENT_ID")]
	pub google_client_id: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Sign in with an OAuth code or the URL the login page was redirected to.
	/// Without either, prints the Google consent URL to open in a browser.
	Login {
		/// OAuth authorization code to exchange
		#[arg(long, conflicts_with = "callback")]
		code: Option<String>,
		/// Login page URL (or query string) carrying `token` or `error`
		#[arg(long)]
		callback: Option<String>,
	},

	/// Forget the stored credential
	Logout,

	/// Report whether a credential is stored
	Whoami,

	/// List subscription plans
	Plans,

	/// Start subscribing to a plan
	Checkout {
		/// Plan name, e.g. "Professional"
		plan: String,
	},

	/// Verify a completed checkout session
	Verify {
		/// Checkout session id from the success page
		session_id: String,
	},

	/// Manage streams
	Streams {
		#[command(subcommand)]
		action: StreamsAction,
	},

	/// Run a studio session until interrupted or the connection is lost
	Studio {
		/// Simulate a capture device that refuses access
		#[arg(long)]
		deny_devices: bool,
		/// End the session after this many seconds
		#[arg(long, value_name = "SECS")]
		duration: Option<u64>,
	},

	/// List front-end routes
	Routes,
}

#[derive(Subcommand, Debug)]
pub enum StreamsAction {
	/// List your streams
	#[command(alias = "ls")]
	List,

	/// Show one stream
	Get { id: String },

	/// Create a draft stream
	Create {
		title: String,
		/// Target platform (repeatable)
		#[arg(short, long = "platform", value_name = "PLATFORM")]
		platforms: Vec<String>,
		#[arg(short, long)]
		description: Option<String>,
	},

	/// Change fields of a stream
	Update {
		id: String,
		#[arg(long)]
		title: Option<String>,
		#[arg(long)]
		description: Option<String>,
		/// Replace target platforms (repeatable)
		#[arg(long = "platform", value_name = "PLATFORM")]
		platforms: Vec<String>,
		#[arg(long)]
		status: Option<StreamStatus>,
	},

	/// Delete a stream
	#[command(alias = "rm")]
	Delete { id: String },
}

impl Commands {
	/// Name used in the output envelope.
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Login { .. } => "login",
			Commands::Logout => "logout",
			Commands::Whoami => "whoami",
			Commands::Plans => "plans",
			Commands::Checkout { .. } => "checkout",
			Commands::Verify { .. } => "verify",
			Commands::Streams { action } => match action {
				StreamsAction::List => "streams.list",
				StreamsAction::Get { .. } => "streams.get",
				StreamsAction::Create { .. } => "streams.create",
				StreamsAction::Update { .. } => "streams.update",
				StreamsAction::Delete { .. } => "streams.delete",
			},
			Commands::Studio { .. } => "studio",
			Commands::Routes => "routes",
		}
	}
}
