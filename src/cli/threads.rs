//! Comment threads command

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::AttioClient;
use crate::cli::{list_all, PageArgs};
use crate::config::Config;
use crate::output::{self, Shape};

const THREADS_PAGE_SIZE: usize = 50;

const THREAD: Shape<'static> = Shape::Fields {
    id_field: "thread_id",
    columns: &["id.thread_id", "created_at"],
};

#[derive(Args, Debug)]
pub struct ThreadsArgs {
    #[command(subcommand)]
    pub command: ThreadsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ThreadsCommand {
    /// List threads on a record or a list entry
    List {
        /// Record's object slug
        #[arg(long, requires = "record", conflicts_with = "list")]
        object: Option<String>,

        /// Record ID
        #[arg(long, requires = "object")]
        record: Option<String>,

        /// List slug
        #[arg(long, requires = "entry")]
        list: Option<String>,

        /// Entry ID
        #[arg(long, requires = "list")]
        entry: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Get a thread and its comments
    Get {
        /// Thread ID
        id: String,
    },
}

pub async fn execute(config: &Config, args: ThreadsArgs) -> Result<()> {
    let client = AttioClient::new(config)?;
    let format = config.output_format;

    match args.command {
        ThreadsCommand::List {
            object,
            record,
            list,
            entry,
            page,
        } => {
            let query: Vec<(&str, String)> = [
                ("object", object),
                ("record_id", record),
                ("list", list),
                ("entry_id", entry),
            ]
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect();

            let threads = list_all(&client, "/v2/threads", &query, &page, THREADS_PAGE_SIZE).await?;
            output::print_list(&threads, THREAD, format)?;
        }

        ThreadsCommand::Get { id } => {
            let thread = client.get(&format!("/v2/threads/{}", id)).await?;
            output::print_item(&thread, THREAD, format)?;
        }
    }

    Ok(())
}
