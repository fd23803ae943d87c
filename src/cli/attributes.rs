//! Attributes command

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::client::into_items;
use crate::api::AttioClient;
use crate::config::Config;
use crate::output::{self, Shape};

const ATTRIBUTE: Shape<'static> = Shape::Fields {
    id_field: "attribute_id",
    columns: &[
        "api_slug",
        "title",
        "type",
        "is_multiselect",
        "is_required",
        "is_unique",
    ],
};

#[derive(Args, Debug)]
pub struct AttributesArgs {
    #[command(subcommand)]
    pub command: AttributesCommand,
}

#[derive(Subcommand, Debug)]
pub enum AttributesCommand {
    /// List attributes of an object (or of a list with --list)
    List {
        /// Object or list slug or ID
        target: String,

        /// Treat the target as a list
        #[arg(long)]
        list: bool,
    },
}

fn attributes_path(target: &str, list: bool) -> String {
    let kind = if list { "lists" } else { "objects" };
    format!("/v2/{}/{}/attributes", kind, target)
}

pub async fn execute(config: &Config, args: AttributesArgs) -> Result<()> {
    let client = AttioClient::new(config)?;

    match args.command {
        AttributesCommand::List { target, list } => {
            let attributes = into_items(client.get(&attributes_path(&target, list)).await?);
            output::print_list(&attributes, ATTRIBUTE, config.output_format)?;
        }
    }

    Ok(())
}
