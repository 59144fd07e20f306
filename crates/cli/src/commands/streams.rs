//! Stream CRUD commands.

use spreadify::protocol::{Stream, StreamCreate, StreamStatus, StreamUpdate};
use spreadify::{Error, Result};

use crate::cli::StreamsAction;
use crate::context::CommandContext;
use crate::output::DeletedData;

/// Payload of a streams subcommand.
#[derive(Debug, serde::Serialize)]
#[serde(untagged)]
pub enum StreamsData {
	Many(Vec<Stream>),
	One(Stream),
	Deleted(DeletedData),
}

pub async fn execute(ctx: &CommandContext, action: StreamsAction) -> Result<StreamsData> {
	let api = ctx.api()?;
	let streams = api.streams();

	match action {
		StreamsAction::List => Ok(StreamsData::Many(streams.list().await?)),
		StreamsAction::Get { id } => Ok(StreamsData::One(streams.get(&id).await?)),
		StreamsAction::Create {
			title,
			platforms,
			description,
		} => {
			let body = StreamCreate::new(title, platforms).with_description(description);
			Ok(StreamsData::One(streams.create(&body).await?))
		}
		StreamsAction::Update {
			id,
			title,
			description,
			platforms,
			status,
		} => {
			let update = build_update(title, description, platforms, status);
			if update.is_empty() {
				return Err(Error::InvalidInput("nothing to update".into()));
			}
			Ok(StreamsData::One(streams.update(&id, &update).await?))
		}
		StreamsAction::Delete { id } => {
			streams.delete(&id).await?;
			Ok(StreamsData::Deleted(DeletedData { id, deleted: true }))
		}
	}
}

fn build_update(
	title: Option<String>,
	description: Option<String>,
	platforms: Vec<String>,
	status: Option<StreamStatus>,
) -> StreamUpdate {
	StreamUpdate {
		title,
		description,
		platforms: (!platforms.is_empty()).then_some(platforms),
		status,
	}
}
