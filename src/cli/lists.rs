//! Lists command

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::client::into_items;
use crate::api::AttioClient;
use crate::config::Config;
use crate::output::{self, Shape};

const LIST: Shape<'static> = Shape::Fields {
    id_field: "list_id",
    columns: &["id.list_id", "api_slug", "name", "parent_object"],
};

#[derive(Args, Debug)]
pub struct ListsArgs {
    #[command(subcommand)]
    pub command: ListsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ListsCommand {
    /// List all lists in the workspace
    List,

    /// Get a list by slug or ID
    Get {
        /// List slug or ID
        list: String,
    },
}

pub async fn execute(config: &Config, args: ListsArgs) -> Result<()> {
    let client = AttioClient::new(config)?;

    match args.command {
        ListsCommand::List => {
            let lists = into_items(client.get("/v2/lists").await?);
            output::print_list(&lists, LIST, config.output_format)?;
        }

        ListsCommand::Get { list } => {
            let list = client.get(&format!("/v2/lists/{}", list)).await?;
            output::print_item(&list, LIST, config.output_format)?;
        }
    }

    Ok(())
}
