//! Objects command

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::client::into_items;
use crate::api::AttioClient;
use crate::config::Config;
use crate::output::{self, Shape};

const OBJECT: Shape<'static> = Shape::Fields {
    id_field: "object_id",
    columns: &["id.object_id", "api_slug", "singular_noun", "plural_noun"],
};

#[derive(Args, Debug)]
pub struct ObjectsArgs {
    #[command(subcommand)]
    pub command: ObjectsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ObjectsCommand {
    /// List objects (people, companies, custom objects)
    List,

    /// Get an object by slug or ID
    Get {
        /// Object slug or ID
        object: String,
    },
}

pub async fn execute(config: &Config, args: ObjectsArgs) -> Result<()> {
    let client = AttioClient::new(config)?;

    match args.command {
        ObjectsCommand::List => {
            let objects = into_items(client.get("/v2/objects").await?);
            output::print_list(&objects, OBJECT, config.output_format)?;
        }

        ObjectsCommand::Get { object } => {
            let object = client.get(&format!("/v2/objects/{}", object)).await?;
            output::print_item(&object, OBJECT, config.output_format)?;
        }
    }

    Ok(())
}
