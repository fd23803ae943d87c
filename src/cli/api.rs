//! Raw API command

use anyhow::{anyhow, Context, Result};
use clap::Args;
use reqwest::Method;
use serde_json::Value;

use crate::api::AttioClient;
use crate::config::Config;
use crate::output;

#[derive(Args, Debug)]
pub struct ApiArgs {
    /// API path (e.g., /v2/objects, /v2/objects/people/records/query)
    pub path: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Request body (JSON)
    #[arg(short, long)]
    pub body: Option<String>,

    /// Query parameter as key=value (repeatable)
    #[arg(long = "query", value_name = "KEY=VALUE")]
    pub query: Vec<String>,
}

fn parse_query(pairs: &[String]) -> Result<Vec<(&str, String)>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, value)| (key, value.to_string()))
                .ok_or_else(|| anyhow!("invalid --query '{}': expected key=value", pair))
        })
        .collect()
}

pub async fn execute(config: &Config, args: ApiArgs) -> Result<()> {
    let client = AttioClient::new(config)?;

    let method = Method::from_bytes(args.method.to_uppercase().as_bytes())
        .map_err(|_| anyhow!("Unsupported HTTP method: {}", args.method))?;

    let body = args
        .body
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("--body is not valid JSON")?;

    let query = parse_query(&args.query)?;

    match client.request(method, &args.path, &query, body).await? {
        Some(response) => output::print_value(&response, config.output_format)?,
        None => output::success("Done (no content)"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_split_on_first_equals() {
        let pairs = vec!["limit=5".to_string(), "q=a=b".to_string()];
        assert_eq!(
            parse_query(&pairs).unwrap(),
            vec![("limit", "5".to_string()), ("q", "a=b".to_string())]
        );
        assert!(parse_query(&["nope".to_string()]).is_err());
    }
}
