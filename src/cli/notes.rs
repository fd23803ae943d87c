//! Notes command

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use crate::api::AttioClient;
use crate::cli::{confirm_delete, list_all, PageArgs};
use crate::config::Config;
use crate::output::{self, Shape};

/// The notes endpoint rejects larger pages
const NOTES_PAGE_SIZE: usize = 50;

const NOTE: Shape<'static> = Shape::Fields {
    id_field: "note_id",
    columns: &[
        "id.note_id",
        "title",
        "parent_object",
        "parent_record_id",
        "created_at",
    ],
};

#[derive(Args, Debug)]
pub struct NotesArgs {
    #[command(subcommand)]
    pub command: NotesCommand,
}

#[derive(Subcommand, Debug)]
pub enum NotesCommand {
    /// List notes, optionally for one record
    List {
        /// Parent object slug
        #[arg(long, requires = "record")]
        object: Option<String>,

        /// Parent record ID
        #[arg(long, requires = "object")]
        record: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Get a note by ID
    Get {
        /// Note ID
        id: String,
    },

    /// Create a note on a record
    Create {
        /// Parent object slug
        #[arg(long)]
        object: String,

        /// Parent record ID
        #[arg(long)]
        record: String,

        /// Note title
        #[arg(long)]
        title: String,

        /// Note body
        #[arg(long)]
        content: String,

        /// Treat the body as markdown
        #[arg(long)]
        markdown: bool,
    },

    /// Delete a note
    Delete {
        /// Note ID
        id: String,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

pub async fn execute(config: &Config, args: NotesArgs) -> Result<()> {
    let client = AttioClient::new(config)?;
    let format = config.output_format;

    match args.command {
        NotesCommand::List {
            object,
            record,
            page,
        } => {
            let mut query = Vec::new();
            if let Some(object) = object {
                query.push(("parent_object", object));
            }
            if let Some(record) = record {
                query.push(("parent_record_id", record));
            }

            let notes = list_all(&client, "/v2/notes", &query, &page, NOTES_PAGE_SIZE).await?;
            output::print_list(&notes, NOTE, format)?;
        }

        NotesCommand::Get { id } => {
            let note = client.get(&format!("/v2/notes/{}", id)).await?;
            output::print_item(&note, NOTE, format)?;
        }

        NotesCommand::Create {
            object,
            record,
            title,
            content,
            markdown,
        } => {
            let body = json!({
                "data": {
                    "parent_object": object,
                    "parent_record_id": record,
                    "title": title,
                    "format": if markdown { "markdown" } else { "plaintext" },
                    "content": content,
                }
            });
            let note = client.post("/v2/notes", body).await?;
            output::print_item(&note, NOTE, format)?;
        }

        NotesCommand::Delete { id, yes } => {
            if !confirm_delete(&format!("note {}", id), yes) {
                return Ok(());
            }

            client.delete(&format!("/v2/notes/{}", id)).await?;
            output::success(&format!("Deleted note: {}", id));
        }
    }

    Ok(())
}
