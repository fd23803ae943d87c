//! CLI commands module

pub mod api;
pub mod attributes;
pub mod comments;
pub mod config_cmd;
pub mod entries;
pub mod lists;
pub mod meetings;
pub mod members;
pub mod notes;
pub mod objects;
pub mod records;
pub mod self_cmd;
pub mod tasks;
pub mod threads;
pub mod webhooks;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};

use crate::api::client::{into_items, AttioClient};
use crate::api::pagination::{self, CursorOptions, PageOptions, Paginated, MAX_ITEMS};
use crate::config::OutputFormat;
use crate::output;
use crate::query;
use crate::values::{self, Values};

/// attio - scriptable CLI for the Attio CRM REST API
#[derive(Parser, Debug)]
#[command(name = "attio")]
#[command(version)]
#[command(about = "Scriptable Attio CRM CLI - records, lists, notes, tasks and more", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// API key (overrides ATTIO_API_KEY and the config file)
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long, global = true)]
    pub json: bool,

    /// Print IDs only (shorthand for --format quiet)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Output format requested on the command line, if any
    pub fn output_format(&self) -> Option<OutputFormat> {
        if self.json {
            Some(OutputFormat::Json)
        } else if self.quiet {
            Some(OutputFormat::Quiet)
        } else {
            self.format
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the identity behind the API key
    #[command(name = "self")]
    Whoami,

    /// List and inspect objects
    Objects(objects::ObjectsArgs),

    /// List attributes of an object or list
    Attributes(attributes::AttributesArgs),

    /// Query and manage records
    Records(records::RecordsArgs),

    /// List and inspect lists
    Lists(lists::ListsArgs),

    /// Query and manage list entries
    Entries(entries::EntriesArgs),

    /// Manage notes
    Notes(notes::NotesArgs),

    /// Manage tasks
    Tasks(tasks::TasksArgs),

    /// Manage comments
    Comments(comments::CommentsArgs),

    /// List and inspect comment threads
    Threads(threads::ThreadsArgs),

    /// Manage webhooks
    Webhooks(webhooks::WebhooksArgs),

    /// List workspace members
    Members(members::MembersArgs),

    /// Meetings and call recordings
    Meetings(meetings::MeetingsArgs),

    /// Raw API requests
    Api(api::ApiArgs),

    /// Configuration management
    Config(config_cmd::ConfigArgs),
}

/// Offset pagination flags
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Maximum results to return
    #[arg(long, default_value_t = 25)]
    pub limit: usize,

    /// Number of results to skip
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Fetch every page (ignores --limit and --offset)
    #[arg(long)]
    pub all: bool,
}

impl PageArgs {
    pub fn options(&self) -> PageOptions {
        PageOptions {
            limit: self.limit,
            offset: self.offset,
            all: self.all,
        }
    }
}

/// Cursor pagination flags
#[derive(Args, Debug, Clone)]
pub struct CursorArgs {
    /// Maximum results to return
    #[arg(long, default_value_t = 25)]
    pub limit: usize,

    /// Cursor from a previous page
    #[arg(long)]
    pub cursor: Option<String>,

    /// Follow cursors until the last page
    #[arg(long)]
    pub all: bool,
}

impl CursorArgs {
    pub fn options(&self) -> CursorOptions {
        CursorOptions {
            limit: self.limit,
            cursor: self.cursor.clone(),
            all: self.all,
        }
    }
}

/// Filter, sort and pagination flags for query endpoints
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Filter expression, e.g. 'name~Acme', 'employee_count>=50', 'domains?' (repeatable, ANDed)
    #[arg(long = "filter", value_name = "EXPR")]
    pub filters: Vec<String>,

    /// Raw filter JSON, sent as-is (takes precedence over --filter)
    #[arg(long, value_name = "JSON")]
    pub filter_json: Option<String>,

    /// Sort expression: attribute[.field][:asc|desc] (repeatable)
    #[arg(long = "sort", value_name = "EXPR")]
    pub sorts: Vec<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

impl QueryArgs {
    /// Request body without pagination fields
    pub fn body(&self) -> Result<Map<String, Value>> {
        let mut body = Map::new();

        let filter = query::build_filter(&self.filters, self.filter_json.as_deref())?;
        if filter.as_object().map_or(true, |f| !f.is_empty()) {
            body.insert("filter".to_string(), filter);
        }

        let sorts = query::build_sorts(&self.sorts);
        if !sorts.is_empty() {
            body.insert("sorts".to_string(), serde_json::to_value(sorts)?);
        }

        Ok(body)
    }
}

/// Attribute value input flags
#[derive(Args, Debug, Clone, Default)]
pub struct ValueArgs {
    /// Values as inline JSON, or @path to a JSON file
    #[arg(long, value_name = "JSON|@FILE")]
    pub values: Option<String>,

    /// Set one attribute: key=value (repeatable; value may be JSON or [a,b])
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub sets: Vec<String>,
}

impl ValueArgs {
    /// Resolve values; may be empty
    pub fn resolve(&self) -> Result<Values> {
        Ok(values::resolve_values(self.values.as_deref(), &self.sets)?)
    }

    /// Resolve values and refuse an empty result
    pub fn require(&self) -> Result<Values> {
        Ok(values::require_values(self.resolve()?)?)
    }
}

/// POST a query endpoint page by page
pub async fn query_all(
    client: &AttioClient,
    path: &str,
    args: &QueryArgs,
) -> Result<Vec<Value>> {
    let base = args.body()?;

    let result = pagination::paginate(
        |limit, offset| {
            let mut body = base.clone();
            body.insert("limit".to_string(), limit.into());
            body.insert("offset".to_string(), offset.into());
            async move { Ok::<_, anyhow::Error>(into_items(client.post(path, Value::Object(body)).await?)) }
        },
        args.page.options(),
    )
    .await?;

    Ok(finish(result))
}

/// GET an offset-paginated endpoint page by page
pub async fn list_all(
    client: &AttioClient,
    path: &str,
    query: &[(&str, String)],
    page: &PageArgs,
    page_size: usize,
) -> Result<Vec<Value>> {
    let result = pagination::paginate_by(
        |limit, offset| {
            let mut query = query.to_vec();
            query.push(("limit", limit.to_string()));
            query.push(("offset", offset.to_string()));
            async move { Ok::<_, anyhow::Error>(into_items(client.get_query(path, &query).await?)) }
        },
        page.options(),
        page_size,
    )
    .await?;

    Ok(finish(result))
}

/// GET a cursor-paginated endpoint
pub async fn list_cursor(
    client: &AttioClient,
    path: &str,
    query: &[(&str, String)],
    args: &CursorArgs,
) -> Result<Vec<Value>> {
    let result = pagination::paginate_cursor(
        |limit, cursor| {
            let mut query = query.to_vec();
            query.push(("limit", limit.to_string()));
            if let Some(cursor) = cursor {
                query.push(("cursor", cursor));
            }
            async move { client.get_cursor_page(path, &query).await }
        },
        args.options(),
    )
    .await?;

    if let Some(ref next) = result.next_cursor {
        output::info(&format!("More results available: --cursor {}", next));
    }

    Ok(finish(result))
}

fn finish(result: Paginated<Value>) -> Vec<Value> {
    if result.truncated {
        output::warning(&format!(
            "Stopped after {} items; narrow the query with --filter to see the rest",
            MAX_ITEMS
        ));
    }
    result.items
}

/// Deletes need an explicit --yes
pub fn confirm_delete(what: &str, yes: bool) -> bool {
    if !yes {
        output::warning(&format!("Are you sure you want to delete {}?", what));
        output::info("Use -y to skip this confirmation");
    }
    yes
}

/// Split `object:record_id` references used by several commands
pub fn parse_reference(raw: &str) -> Result<(String, String)> {
    match raw.split_once(':') {
        Some((object, id)) if !object.is_empty() && !id.is_empty() => {
            Ok((object.to_string(), id.to_string()))
        }
        _ => Err(values::ValueError::InvalidReference(raw.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query_args(filters: &[&str], sorts: &[&str]) -> QueryArgs {
        QueryArgs {
            filters: filters.iter().map(|s| s.to_string()).collect(),
            filter_json: None,
            sorts: sorts.iter().map(|s| s.to_string()).collect(),
            page: PageArgs {
                limit: 25,
                offset: 0,
                all: false,
            },
        }
    }

    #[test]
    fn query_body_combines_filters_and_sorts() {
        let body = query_args(&["name~Acme", "employee_count>=50"], &["name:desc"])
            .body()
            .unwrap();
        assert_eq!(
            Value::Object(body),
            json!({
                "filter": { "$and": [
                    { "name": { "$contains": "Acme" } },
                    { "employee_count": { "$gte": 50 } }
                ] },
                "sorts": [{ "attribute": "name", "direction": "desc" }]
            })
        );
    }

    #[test]
    fn empty_query_body_omits_filter() {
        let body = query_args(&[], &[]).body().unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn quiet_and_json_flags_pick_format() {
        let cli = Cli::parse_from(["attio", "--json", "objects", "list"]);
        assert_eq!(cli.output_format(), Some(OutputFormat::Json));

        let cli = Cli::parse_from(["attio", "objects", "list", "-q"]);
        assert_eq!(cli.output_format(), Some(OutputFormat::Quiet));

        let cli = Cli::parse_from(["attio", "objects", "list", "--format", "csv"]);
        assert_eq!(cli.output_format(), Some(OutputFormat::Csv));

        let cli = Cli::parse_from(["attio", "objects", "list"]);
        assert_eq!(cli.output_format(), None);
    }

    #[test]
    fn repeatable_flags_parse() {
        let cli = Cli::parse_from([
            "attio",
            "records",
            "list",
            "companies",
            "--filter",
            "name~Acme",
            "--filter",
            "employee_count>=50",
            "--sort",
            "name",
            "--all",
        ]);
        match cli.command {
            Commands::Records(args) => match args.command {
                records::RecordsCommand::List { object, query } => {
                    assert_eq!(object, "companies");
                    assert_eq!(query.filters.len(), 2);
                    assert_eq!(query.sorts, vec!["name"]);
                    assert!(query.page.all);
                }
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn references() {
        assert_eq!(
            parse_reference("companies:abc").unwrap(),
            ("companies".to_string(), "abc".to_string())
        );
        assert!(parse_reference("companies").is_err());
        assert!(parse_reference(":abc").is_err());
    }
}
