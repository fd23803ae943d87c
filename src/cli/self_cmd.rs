//! Identity command

use anyhow::Result;

use crate::api::AttioClient;
use crate::config::Config;
use crate::output;

pub async fn execute(config: &Config) -> Result<()> {
    let client = AttioClient::new(config)?;
    let identity = client.get_raw("/v2/self", &[]).await?;
    output::print_value(&identity, config.output_format)
}
