//! Tasks command

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use serde_json::{json, Map, Value};

use crate::api::AttioClient;
use crate::cli::{confirm_delete, list_all, parse_reference, PageArgs};
use crate::config::Config;
use crate::output::{self, Shape};
use crate::values::input::parse_datetime;

const TASKS_PAGE_SIZE: usize = 500;

const TASK: Shape<'static> = Shape::Fields {
    id_field: "task_id",
    columns: &[
        "id.task_id",
        "content_plaintext",
        "deadline_at",
        "is_completed",
        "created_at",
    ],
};

#[derive(Args, Debug)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

#[derive(Subcommand, Debug)]
pub enum TasksCommand {
    /// List tasks
    List {
        /// Only tasks linked to this object (with --record)
        #[arg(long, requires = "record")]
        object: Option<String>,

        /// Only tasks linked to this record
        #[arg(long, requires = "object")]
        record: Option<String>,

        /// Only completed tasks
        #[arg(long, conflicts_with = "incomplete")]
        completed: bool,

        /// Only open tasks
        #[arg(long)]
        incomplete: bool,

        /// Only tasks assigned to this workspace member ID or email
        #[arg(long)]
        assignee: Option<String>,

        /// Sort order: created_at:asc or created_at:desc
        #[arg(long)]
        sort: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Get a task by ID
    Get {
        /// Task ID
        id: String,
    },

    /// Create a task
    Create {
        /// Task text
        #[arg(long)]
        content: String,

        /// Deadline (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        deadline: Option<String>,

        /// Mark as already completed
        #[arg(long)]
        complete: bool,

        /// Link a record: object:record_id (repeatable)
        #[arg(long = "link", value_name = "OBJECT:ID")]
        links: Vec<String>,

        /// Assign a workspace member by ID or email (repeatable)
        #[arg(long = "assignee", value_name = "MEMBER")]
        assignees: Vec<String>,
    },

    /// Update a task
    Update {
        /// Task ID
        id: String,

        /// Mark as completed
        #[arg(long, conflicts_with = "incomplete")]
        complete: bool,

        /// Mark as open
        #[arg(long)]
        incomplete: bool,

        /// New deadline (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        deadline: Option<String>,

        /// Replace linked records: object:record_id (repeatable)
        #[arg(long = "link", value_name = "OBJECT:ID")]
        links: Vec<String>,

        /// Replace assignees by member ID or email (repeatable)
        #[arg(long = "assignee", value_name = "MEMBER")]
        assignees: Vec<String>,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

fn linked_records(links: &[String]) -> Result<Vec<Value>> {
    links
        .iter()
        .map(|link| {
            let (object, id) = parse_reference(link)?;
            Ok(json!({ "target_object": object, "target_record_id": id }))
        })
        .collect()
}

fn assignee(member: &str) -> Value {
    if member.contains('@') {
        json!({ "workspace_member_email_address": member })
    } else {
        json!({
            "referenced_actor_type": "workspace-member",
            "referenced_actor_id": member,
        })
    }
}

fn completion(complete: bool, incomplete: bool) -> Option<bool> {
    match (complete, incomplete) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Fields shared by create and update; only what was given is included
fn task_fields(
    deadline: Option<&str>,
    is_completed: Option<bool>,
    links: &[String],
    assignees: &[String],
) -> Result<Map<String, Value>> {
    let mut data = Map::new();

    if let Some(deadline) = deadline {
        data.insert("deadline_at".to_string(), parse_datetime(deadline)?.into());
    }
    if let Some(is_completed) = is_completed {
        data.insert("is_completed".to_string(), is_completed.into());
    }
    if !links.is_empty() {
        data.insert("linked_records".to_string(), linked_records(links)?.into());
    }
    if !assignees.is_empty() {
        let assignees: Vec<Value> = assignees.iter().map(|m| assignee(m)).collect();
        data.insert("assignees".to_string(), assignees.into());
    }

    Ok(data)
}

pub async fn execute(config: &Config, args: TasksArgs) -> Result<()> {
    let client = AttioClient::new(config)?;
    let format = config.output_format;

    match args.command {
        TasksCommand::List {
            object,
            record,
            completed,
            incomplete,
            assignee,
            sort,
            page,
        } => {
            let mut query = Vec::new();
            if let Some(object) = object {
                query.push(("linked_object", object));
            }
            if let Some(record) = record {
                query.push(("linked_record_id", record));
            }
            if let Some(done) = completion(completed, incomplete) {
                query.push(("is_completed", done.to_string()));
            }
            if let Some(assignee) = assignee {
                query.push(("assignee", assignee));
            }
            if let Some(sort) = sort {
                query.push(("sort", sort));
            }

            let tasks = list_all(&client, "/v2/tasks", &query, &page, TASKS_PAGE_SIZE).await?;
            output::print_list(&tasks, TASK, format)?;
        }

        TasksCommand::Get { id } => {
            let task = client.get(&format!("/v2/tasks/{}", id)).await?;
            output::print_item(&task, TASK, format)?;
        }

        TasksCommand::Create {
            content,
            deadline,
            complete,
            links,
            assignees,
        } => {
            let mut data = task_fields(deadline.as_deref(), Some(complete), &links, &assignees)?;
            data.insert("content".to_string(), content.into());
            data.insert("format".to_string(), "plaintext".into());
            // The API requires these keys even when empty
            data.entry("deadline_at").or_insert(Value::Null);
            data.entry("linked_records").or_insert_with(|| json!([]));
            data.entry("assignees").or_insert_with(|| json!([]));

            let task = client.post("/v2/tasks", json!({ "data": data })).await?;
            output::print_item(&task, TASK, format)?;
        }

        TasksCommand::Update {
            id,
            complete,
            incomplete,
            deadline,
            links,
            assignees,
        } => {
            let data = task_fields(
                deadline.as_deref(),
                completion(complete, incomplete),
                &links,
                &assignees,
            )?;
            if data.is_empty() {
                bail!("nothing to update; pass --complete, --incomplete, --deadline, --link or --assignee");
            }

            let task = client
                .patch(&format!("/v2/tasks/{}", id), json!({ "data": data }))
                .await?;
            output::print_item(&task, TASK, format)?;
        }

        TasksCommand::Delete { id, yes } => {
            if !confirm_delete(&format!("task {}", id), yes) {
                return Ok(());
            }

            client.delete(&format!("/v2/tasks/{}", id)).await?;
            output::success(&format!("Deleted task: {}", id));
        }
    }

    Ok(())
}
