//! List entries command

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::{json, Map, Value};

use crate::api::AttioClient;
use crate::cli::{confirm_delete, query_all, QueryArgs, ValueArgs};
use crate::config::Config;
use crate::output::{self, Shape};

const ENTRY: Shape<'static> = Shape::Record {
    id_field: "entry_id",
};

#[derive(Args, Debug)]
pub struct EntriesArgs {
    #[command(subcommand)]
    pub command: EntriesCommand,
}

#[derive(Subcommand, Debug)]
pub enum EntriesCommand {
    /// List entries in a list, with optional filters and sorts
    #[command(alias = "query")]
    List {
        /// List slug or ID
        list: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Get an entry by ID
    Get {
        /// List slug or ID
        list: String,

        /// Entry ID
        id: String,
    },

    /// Add a record to a list
    Create {
        /// List slug or ID
        list: String,

        /// Parent object slug (e.g. companies)
        #[arg(long)]
        object: String,

        /// Parent record ID
        #[arg(long)]
        record: String,

        #[command(flatten)]
        values: ValueArgs,
    },

    /// Add a record to a list, or update its existing entry
    Assert {
        /// List slug or ID
        list: String,

        /// Parent object slug
        #[arg(long)]
        object: String,

        /// Parent record ID
        #[arg(long)]
        record: String,

        #[command(flatten)]
        values: ValueArgs,
    },

    /// Update entry values
    Update {
        /// List slug or ID
        list: String,

        /// Entry ID
        id: String,

        #[command(flatten)]
        values: ValueArgs,
    },

    /// Remove an entry from a list
    Delete {
        /// List slug or ID
        list: String,

        /// Entry ID
        id: String,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

fn entry_body(object: String, record: String, values: Map<String, Value>) -> Value {
    json!({
        "data": {
            "parent_record_id": record,
            "parent_object": object,
            "entry_values": values,
        }
    })
}

pub async fn execute(config: &Config, args: EntriesArgs) -> Result<()> {
    let client = AttioClient::new(config)?;
    let format = config.output_format;

    match args.command {
        EntriesCommand::List { list, query } => {
            let path = format!("/v2/lists/{}/entries/query", list);
            let entries = query_all(&client, &path, &query).await?;
            output::print_list(&entries, ENTRY, format)?;
        }

        EntriesCommand::Get { list, id } => {
            let entry = client
                .get(&format!("/v2/lists/{}/entries/{}", list, id))
                .await?;
            output::print_item(&entry, ENTRY, format)?;
        }

        EntriesCommand::Create {
            list,
            object,
            record,
            values,
        } => {
            let body = entry_body(object, record, values.resolve()?);
            let entry = client
                .post(&format!("/v2/lists/{}/entries", list), body)
                .await?;
            output::print_item(&entry, ENTRY, format)?;
        }

        EntriesCommand::Assert {
            list,
            object,
            record,
            values,
        } => {
            let body = entry_body(object, record, values.resolve()?);
            let entry = client
                .put(&format!("/v2/lists/{}/entries", list), &[], body)
                .await?;
            output::print_item(&entry, ENTRY, format)?;
        }

        EntriesCommand::Update { list, id, values } => {
            let values = values.require()?;
            let entry = client
                .patch(
                    &format!("/v2/lists/{}/entries/{}", list, id),
                    json!({ "data": { "entry_values": values } }),
                )
                .await?;
            output::print_item(&entry, ENTRY, format)?;
        }

        EntriesCommand::Delete { list, id, yes } => {
            if !confirm_delete(&format!("entry {}", id), yes) {
                return Ok(());
            }

            client
                .delete(&format!("/v2/lists/{}/entries/{}", list, id))
                .await?;
            output::success(&format!("Deleted entry: {}", id));
        }
    }

    Ok(())
}
