//! Comments command

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use serde_json::{json, Map, Value};

use crate::api::AttioClient;
use crate::cli::confirm_delete;
use crate::config::Config;
use crate::output::{self, Shape};

const COMMENT: Shape<'static> = Shape::Fields {
    id_field: "comment_id",
    columns: &[
        "id.comment_id",
        "thread_id",
        "author.id",
        "content_plaintext",
        "created_at",
    ],
};

#[derive(Args, Debug)]
pub struct CommentsArgs {
    #[command(subcommand)]
    pub command: CommentsCommand,
}

#[derive(Subcommand, Debug)]
pub enum CommentsCommand {
    /// Get a comment by ID
    Get {
        /// Comment ID
        id: String,
    },

    /// Comment on a thread, or start a thread on a record
    Create {
        /// Reply to this thread
        #[arg(long, conflicts_with_all = ["object", "record"], required_unless_present = "record")]
        thread: Option<String>,

        /// Record's object slug (starts a new thread)
        #[arg(long, requires = "record")]
        object: Option<String>,

        /// Record ID (starts a new thread)
        #[arg(long, requires = "object")]
        record: Option<String>,

        /// Comment text
        #[arg(long)]
        content: String,

        /// Author workspace member ID (defaults to the key's owner)
        #[arg(long)]
        author: Option<String>,
    },

    /// Delete a comment
    Delete {
        /// Comment ID
        id: String,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

enum Target {
    Thread(String),
    Record { object: String, record: String },
}

/// Workspace member behind the API key
async fn default_author(client: &AttioClient) -> Result<String> {
    let identity = client.get_raw("/v2/self", &[]).await?;
    identity
        .get("authorized_by_workspace_member_id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("cannot determine the comment author; pass --author"))
}

fn comment_body(target: Target, content: String, author: String) -> Value {
    let mut data = Map::new();
    data.insert("format".to_string(), "plaintext".into());
    data.insert("content".to_string(), content.into());
    data.insert(
        "author".to_string(),
        json!({ "type": "workspace-member", "id": author }),
    );
    match target {
        Target::Thread(thread) => {
            data.insert("thread_id".to_string(), thread.into());
        }
        Target::Record { object, record } => {
            data.insert(
                "record".to_string(),
                json!({ "object": object, "record_id": record }),
            );
        }
    }
    json!({ "data": data })
}

pub async fn execute(config: &Config, args: CommentsArgs) -> Result<()> {
    let client = AttioClient::new(config)?;
    let format = config.output_format;

    match args.command {
        CommentsCommand::Get { id } => {
            let comment = client.get(&format!("/v2/comments/{}", id)).await?;
            output::print_item(&comment, COMMENT, format)?;
        }

        CommentsCommand::Create {
            thread,
            object,
            record,
            content,
            author,
        } => {
            let target = match (thread, object, record) {
                (Some(thread), _, _) => Target::Thread(thread),
                (None, Some(object), Some(record)) => Target::Record { object, record },
                _ => return Err(anyhow!("pass --thread, or --object with --record")),
            };
            let author = match author {
                Some(author) => author,
                None => default_author(&client).await?,
            };

            let comment = client
                .post("/v2/comments", comment_body(target, content, author))
                .await?;
            output::print_item(&comment, COMMENT, format)?;
        }

        CommentsCommand::Delete { id, yes } => {
            if !confirm_delete(&format!("comment {}", id), yes) {
                return Ok(());
            }

            client.delete(&format!("/v2/comments/{}", id)).await?;
            output::success(&format!("Deleted comment: {}", id));
        }
    }

    Ok(())
}
