//! Meetings command

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::AttioClient;
use crate::cli::{list_cursor, CursorArgs};
use crate::config::Config;
use crate::output::{self, Shape};

const MEETING: Shape<'static> = Shape::Fields {
    id_field: "meeting_id",
    columns: &["id.meeting_id", "title", "start.datetime", "end.datetime"],
};

const RECORDING: Shape<'static> = Shape::Fields {
    id_field: "call_recording_id",
    columns: &["id.call_recording_id", "status", "web_url", "created_at"],
};

#[derive(Args, Debug)]
pub struct MeetingsArgs {
    #[command(subcommand)]
    pub command: MeetingsCommand,
}

#[derive(Subcommand, Debug)]
pub enum MeetingsCommand {
    /// List meetings
    List {
        /// Only meetings linked to this object (with --record)
        #[arg(long, requires = "record")]
        object: Option<String>,

        /// Only meetings linked to this record
        #[arg(long, requires = "object")]
        record: Option<String>,

        #[command(flatten)]
        page: CursorArgs,
    },

    /// Get a meeting by ID
    Get {
        /// Meeting ID
        id: String,
    },

    /// List call recordings of a meeting
    Recordings {
        /// Meeting ID
        meeting: String,

        #[command(flatten)]
        page: CursorArgs,
    },
}

pub async fn execute(config: &Config, args: MeetingsArgs) -> Result<()> {
    let client = AttioClient::new(config)?;
    let format = config.output_format;

    match args.command {
        MeetingsCommand::List {
            object,
            record,
            page,
        } => {
            let mut query = Vec::new();
            if let Some(object) = object {
                query.push(("linked_object", object));
            }
            if let Some(record) = record {
                query.push(("linked_record_id", record));
            }

            let meetings = list_cursor(&client, "/v2/meetings", &query, &page).await?;
            output::print_list(&meetings, MEETING, format)?;
        }

        MeetingsCommand::Get { id } => {
            let meeting = client.get(&format!("/v2/meetings/{}", id)).await?;
            output::print_item(&meeting, MEETING, format)?;
        }

        MeetingsCommand::Recordings { meeting, page } => {
            let path = format!("/v2/meetings/{}/call_recordings", meeting);
            let recordings = list_cursor(&client, &path, &[], &page).await?;
            output::print_list(&recordings, RECORDING, format)?;
        }
    }

    Ok(())
}
