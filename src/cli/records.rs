//! Records command

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use crate::api::client::into_items;
use crate::api::AttioClient;
use crate::cli::{confirm_delete, query_all, QueryArgs, ValueArgs};
use crate::config::Config;
use crate::output::{self, Shape};

const RECORD: Shape<'static> = Shape::Record {
    id_field: "record_id",
};

const RECORD_ENTRY: Shape<'static> = Shape::Fields {
    id_field: "entry_id",
    columns: &["entry_id", "list_id", "list_api_slug", "created_at"],
};

#[derive(Args, Debug)]
pub struct RecordsArgs {
    #[command(subcommand)]
    pub command: RecordsCommand,
}

#[derive(Subcommand, Debug)]
pub enum RecordsCommand {
    /// List records, with optional filters and sorts
    #[command(alias = "query")]
    List {
        /// Object slug or ID (e.g. companies, people, deals)
        object: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Get a record by ID
    Get {
        /// Object slug or ID
        object: String,

        /// Record ID
        id: String,
    },

    /// Create a record
    Create {
        /// Object slug or ID
        object: String,

        #[command(flatten)]
        values: ValueArgs,
    },

    /// Update a record (multiselect values are appended)
    Update {
        /// Object slug or ID
        object: String,

        /// Record ID
        id: String,

        #[command(flatten)]
        values: ValueArgs,
    },

    /// Create or update a record matched on a unique attribute
    Assert {
        /// Object slug or ID
        object: String,

        /// Unique attribute to match on (e.g. domains, email_addresses)
        #[arg(long = "match", value_name = "ATTRIBUTE")]
        matching_attribute: String,

        #[command(flatten)]
        values: ValueArgs,
    },

    /// Delete a record
    Delete {
        /// Object slug or ID
        object: String,

        /// Record ID
        id: String,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List the list entries a record belongs to
    Entries {
        /// Object slug or ID
        object: String,

        /// Record ID
        id: String,
    },
}

pub async fn execute(config: &Config, args: RecordsArgs) -> Result<()> {
    let client = AttioClient::new(config)?;
    let format = config.output_format;

    match args.command {
        RecordsCommand::List { object, query } => {
            let path = format!("/v2/objects/{}/records/query", object);
            let records = query_all(&client, &path, &query).await?;
            output::print_list(&records, RECORD, format)?;
        }

        RecordsCommand::Get { object, id } => {
            let record = client
                .get(&format!("/v2/objects/{}/records/{}", object, id))
                .await?;
            output::print_item(&record, RECORD, format)?;
        }

        RecordsCommand::Create { object, values } => {
            let values = values.require()?;
            let record = client
                .post(
                    &format!("/v2/objects/{}/records", object),
                    json!({ "data": { "values": values } }),
                )
                .await
                .with_context(|| format!("failed to create {} record", object))?;
            output::print_item(&record, RECORD, format)?;
        }

        RecordsCommand::Update { object, id, values } => {
            let values = values.require()?;
            let record = client
                .patch(
                    &format!("/v2/objects/{}/records/{}", object, id),
                    json!({ "data": { "values": values } }),
                )
                .await
                .with_context(|| format!("failed to update record {}", id))?;
            output::print_item(&record, RECORD, format)?;
        }

        RecordsCommand::Assert {
            object,
            matching_attribute,
            values,
        } => {
            let values = values.require()?;
            let record = client
                .put(
                    &format!("/v2/objects/{}/records", object),
                    &[("matching_attribute", matching_attribute)],
                    json!({ "data": { "values": values } }),
                )
                .await?;
            output::print_item(&record, RECORD, format)?;
        }

        RecordsCommand::Delete { object, id, yes } => {
            if !confirm_delete(&format!("record {}", id), yes) {
                return Ok(());
            }

            client
                .delete(&format!("/v2/objects/{}/records/{}", object, id))
                .await?;
            output::success(&format!("Deleted record: {}", id));
        }

        RecordsCommand::Entries { object, id } => {
            let entries = client
                .get(&format!("/v2/objects/{}/records/{}/entries", object, id))
                .await?;
            output::print_list(&into_items(entries), RECORD_ENTRY, format)?;
        }
    }

    Ok(())
}
