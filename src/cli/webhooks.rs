//! Webhooks command

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use serde_json::{json, Map, Value};

use crate::api::client::into_items;
use crate::api::AttioClient;
use crate::cli::confirm_delete;
use crate::config::Config;
use crate::output::{self, Shape};

const WEBHOOK: Shape<'static> = Shape::Fields {
    id_field: "webhook_id",
    columns: &["id.webhook_id", "target_url", "status", "created_at"],
};

#[derive(Args, Debug)]
pub struct WebhooksArgs {
    #[command(subcommand)]
    pub command: WebhooksCommand,
}

#[derive(Subcommand, Debug)]
pub enum WebhooksCommand {
    /// List webhooks
    List,

    /// Get a webhook by ID
    Get {
        /// Webhook ID
        id: String,
    },

    /// Create a webhook
    Create {
        /// Target URL (must be https)
        #[arg(long)]
        url: String,

        /// Event type to subscribe to, e.g. record.created (repeatable)
        #[arg(long = "event", value_name = "EVENT", required = true)]
        events: Vec<String>,
    },

    /// Update a webhook's target or subscriptions
    Update {
        /// Webhook ID
        id: String,

        /// New target URL
        #[arg(long)]
        url: Option<String>,

        /// Replace subscriptions (repeatable)
        #[arg(long = "event", value_name = "EVENT")]
        events: Vec<String>,
    },

    /// Delete a webhook
    Delete {
        /// Webhook ID
        id: String,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

fn subscriptions(events: &[String]) -> Value {
    events
        .iter()
        .map(|event| json!({ "event_type": event, "filter": null }))
        .collect()
}

pub async fn execute(config: &Config, args: WebhooksArgs) -> Result<()> {
    let client = AttioClient::new(config)?;
    let format = config.output_format;

    match args.command {
        WebhooksCommand::List => {
            let webhooks = into_items(client.get("/v2/webhooks").await?);
            output::print_list(&webhooks, WEBHOOK, format)?;
        }

        WebhooksCommand::Get { id } => {
            let webhook = client.get(&format!("/v2/webhooks/{}", id)).await?;
            output::print_item(&webhook, WEBHOOK, format)?;
        }

        WebhooksCommand::Create { url, events } => {
            let body = json!({
                "data": { "target_url": url, "subscriptions": subscriptions(&events) }
            });
            let webhook = client.post("/v2/webhooks", body).await?;
            output::print_item(&webhook, WEBHOOK, format)?;
        }

        WebhooksCommand::Update { id, url, events } => {
            let mut data = Map::new();
            if let Some(url) = url {
                data.insert("target_url".to_string(), url.into());
            }
            if !events.is_empty() {
                data.insert("subscriptions".to_string(), subscriptions(&events));
            }
            if data.is_empty() {
                bail!("nothing to update; pass --url or --event");
            }

            let webhook = client
                .patch(&format!("/v2/webhooks/{}", id), json!({ "data": data }))
                .await?;
            output::print_item(&webhook, WEBHOOK, format)?;
        }

        WebhooksCommand::Delete { id, yes } => {
            if !confirm_delete(&format!("webhook {}", id), yes) {
                return Ok(());
            }

            client.delete(&format!("/v2/webhooks/{}", id)).await?;
            output::success(&format!("Deleted webhook: {}", id));
        }
    }

    Ok(())
}
