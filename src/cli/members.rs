//! Workspace members command

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::client::into_items;
use crate::api::AttioClient;
use crate::config::Config;
use crate::output::{self, Shape};

const MEMBER: Shape<'static> = Shape::Fields {
    id_field: "workspace_member_id",
    columns: &[
        "id.workspace_member_id",
        "first_name",
        "last_name",
        "email_address",
        "access_level",
    ],
};

#[derive(Args, Debug)]
pub struct MembersArgs {
    #[command(subcommand)]
    pub command: MembersCommand,
}

#[derive(Subcommand, Debug)]
pub enum MembersCommand {
    /// List workspace members
    List,

    /// Get a workspace member by ID
    Get {
        /// Workspace member ID
        id: String,
    },
}

pub async fn execute(config: &Config, args: MembersArgs) -> Result<()> {
    let client = AttioClient::new(config)?;

    match args.command {
        MembersCommand::List => {
            let members = into_items(client.get("/v2/workspace_members").await?);
            output::print_list(&members, MEMBER, config.output_format)?;
        }

        MembersCommand::Get { id } => {
            let member = client
                .get(&format!("/v2/workspace_members/{}", id))
                .await?;
            output::print_item(&member, MEMBER, config.output_format)?;
        }
    }

    Ok(())
}
