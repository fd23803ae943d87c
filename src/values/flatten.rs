//! Attribute value flattening for table and CSV output
//!
//! Every attribute comes back from the API as an array of typed objects,
//! even single-valued ones. These helpers turn such arrays into one display
//! string, dispatching on `attribute_type`. They never fail: unknown or
//! partially populated shapes degrade to a best-effort string.

use serde_json::Value;

/// Ordered `(column, text)` pairs for one row
pub type FlatRecord = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeType {
    Text,
    Number,
    Checkbox,
    Date,
    Timestamp,
    Rating,
    Currency,
    PersonalName,
    EmailAddress,
    PhoneNumber,
    Domain,
    Select,
    Status,
    Location,
    RecordReference,
    ActorReference,
    Interaction,
    Other(String),
}

impl From<&str> for AttributeType {
    fn from(tag: &str) -> Self {
        match tag {
            "text" => Self::Text,
            "number" => Self::Number,
            "checkbox" => Self::Checkbox,
            "date" => Self::Date,
            "timestamp" => Self::Timestamp,
            "rating" => Self::Rating,
            "currency" => Self::Currency,
            "personal-name" => Self::PersonalName,
            "email-address" => Self::EmailAddress,
            "phone-number" => Self::PhoneNumber,
            "domain" => Self::Domain,
            "select" => Self::Select,
            "status" => Self::Status,
            "location" => Self::Location,
            "record-reference" => Self::RecordReference,
            "actor-reference" => Self::ActorReference,
            "interaction" => Self::Interaction,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Render a scalar JSON value as plain text (no quotes around strings)
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn field(item: &Value, key: &str) -> String {
    item.get(key).map(scalar_text).unwrap_or_default()
}

/// First non-empty field among `keys`
fn first_of(item: &Value, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| field(item, key))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

fn nested(item: &Value, outer: &str, inner: &str) -> String {
    item.get(outer)
        .and_then(|o| o.get(inner))
        .map(scalar_text)
        .unwrap_or_default()
}

fn join_present(parts: &[String], sep: &str) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(sep)
}

/// Flatten a single typed attribute value
pub fn flatten_one(item: &Value) -> String {
    if !item.is_object() {
        return scalar_text(item);
    }

    let tag = item
        .get("attribute_type")
        .and_then(Value::as_str)
        .unwrap_or_default();

    match AttributeType::from(tag) {
        AttributeType::Text
        | AttributeType::Number
        | AttributeType::Checkbox
        | AttributeType::Date
        | AttributeType::Timestamp
        | AttributeType::Rating => field(item, "value"),
        AttributeType::Currency => {
            join_present(&[field(item, "currency_value"), field(item, "currency_code")], " ")
        }
        AttributeType::PersonalName => {
            let full = field(item, "full_name");
            if full.is_empty() {
                join_present(&[field(item, "first_name"), field(item, "last_name")], " ")
            } else {
                full
            }
        }
        AttributeType::EmailAddress => {
            first_of(item, &["email_address", "original_email_address"])
        }
        AttributeType::PhoneNumber => {
            first_of(item, &["phone_number", "original_phone_number"])
        }
        AttributeType::Domain => field(item, "domain"),
        AttributeType::Select => nested(item, "option", "title"),
        AttributeType::Status => nested(item, "status", "title"),
        AttributeType::Location => join_present(
            &[
                field(item, "locality"),
                field(item, "region"),
                first_of(item, &["country_code", "country"]),
            ],
            ", ",
        ),
        AttributeType::RecordReference => format!(
            "{}:{}",
            field(item, "target_object"),
            field(item, "target_record_id")
        ),
        AttributeType::ActorReference => {
            format!("member:{}", field(item, "referenced_actor_id"))
        }
        AttributeType::Interaction => format!(
            "{} @ {}",
            field(item, "interaction_type"),
            field(item, "interacted_at")
        ),
        AttributeType::Other(kind) => {
            tracing::trace!("No flattener for attribute type '{}'", kind);
            fallback(item)
        }
    }
}

/// Unknown types: `value`, then `title`, then the raw JSON
fn fallback(item: &Value) -> String {
    for key in ["value", "title"] {
        match item.get(key) {
            Some(Value::Null) | None => continue,
            Some(v) => return scalar_text(v),
        }
    }
    item.to_string()
}

/// Flatten an attribute value array into one display string
pub fn flatten(values: &[Value]) -> String {
    values
        .iter()
        .map(flatten_one)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Flatten whatever sits under an attribute slug (array, single object or missing)
pub fn flatten_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Array(items)) => flatten(items),
        Some(other) => flatten_one(other),
    }
}

/// Flatten a record or list entry into `id` followed by every attribute.
///
/// Records carry `values` and `id.record_id`; entries carry `entry_values`
/// and `id.entry_id`.
pub fn flatten_record(record: &Value) -> FlatRecord {
    let id = ["record_id", "entry_id"]
        .iter()
        .find_map(|key| record.get("id").and_then(|id| id.get(*key)))
        .map(scalar_text)
        .unwrap_or_default();

    let mut row = vec![("id".to_string(), id)];

    let values = record
        .get("values")
        .or_else(|| record.get("entry_values"))
        .and_then(Value::as_object);

    if let Some(values) = values {
        for (slug, value) in values {
            row.push((slug.clone(), flatten_value(Some(value))));
        }
    }

    row
}

/// Look up a dotted path (`id.note_id`, `linked_records`) in any JSON object
pub fn lookup<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(item, |cur, key| cur.get(key))
}

/// Flatten selected columns of a non-record resource (notes, tasks, webhooks...)
pub fn flatten_fields(item: &Value, columns: &[&str]) -> FlatRecord {
    columns
        .iter()
        .map(|&path| {
            let text = match lookup(item, path) {
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|v| match v {
                        Value::Object(_) => flatten_one(v),
                        other => scalar_text(other),
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
                Some(v) => scalar_text(v),
                None => String::new(),
            };
            (column_name(path, columns), text)
        })
        .collect()
}

fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// Last path segment, or the whole path joined with `_` when another
/// column ends in the same segment (`start.datetime` / `end.datetime`)
fn column_name(path: &str, columns: &[&str]) -> String {
    let last = last_segment(path);
    let collides = columns
        .iter()
        .any(|&other| other != path && last_segment(other) == last);
    if collides {
        path.replace('.', "_")
    } else {
        last.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_array_is_empty_string() {
        assert_eq!(flatten(&[]), "");
        assert_eq!(flatten_value(None), "");
    }

    #[test]
    fn select_uses_option_title() {
        let v = json!([{ "option": { "title": "SaaS" }, "attribute_type": "select" }]);
        assert_eq!(flatten_value(Some(&v)), "SaaS");
    }

    #[test]
    fn multiselect_joins() {
        let v = json!([
            { "value": "a", "attribute_type": "text" },
            { "value": "b", "attribute_type": "text" }
        ]);
        assert_eq!(flatten_value(Some(&v)), "a, b");
    }

    #[test]
    fn scalar_types() {
        assert_eq!(
            flatten_one(&json!({ "value": 42, "attribute_type": "number" })),
            "42"
        );
        assert_eq!(
            flatten_one(&json!({ "value": true, "attribute_type": "checkbox" })),
            "true"
        );
        assert_eq!(
            flatten_one(&json!({ "domain": "acme.com", "attribute_type": "domain" })),
            "acme.com"
        );
        assert_eq!(
            flatten_one(&json!({
                "email_address": "a@acme.com",
                "attribute_type": "email-address"
            })),
            "a@acme.com"
        );
        assert_eq!(
            flatten_one(&json!({
                "status": { "title": "Won" },
                "attribute_type": "status"
            })),
            "Won"
        );
    }

    #[test]
    fn currency_with_and_without_code() {
        assert_eq!(
            flatten_one(&json!({
                "currency_value": 1000,
                "currency_code": "USD",
                "attribute_type": "currency"
            })),
            "1000 USD"
        );
        assert_eq!(
            flatten_one(&json!({ "currency_value": 5, "attribute_type": "currency" })),
            "5"
        );
    }

    #[test]
    fn personal_name() {
        assert_eq!(
            flatten_one(&json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "full_name": "Ada King Lovelace",
                "attribute_type": "personal-name"
            })),
            "Ada King Lovelace"
        );
        assert_eq!(
            flatten_one(&json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "attribute_type": "personal-name"
            })),
            "Ada Lovelace"
        );
        assert_eq!(
            flatten_one(&json!({ "last_name": "Lovelace", "attribute_type": "personal-name" })),
            "Lovelace"
        );
    }

    #[test]
    fn location_skips_missing_parts() {
        assert_eq!(
            flatten_one(&json!({
                "locality": "London",
                "region": null,
                "country_code": "GB",
                "attribute_type": "location"
            })),
            "London, GB"
        );
    }

    #[test]
    fn references_and_interactions() {
        assert_eq!(
            flatten_one(&json!({
                "target_object": "companies",
                "target_record_id": "abc",
                "attribute_type": "record-reference"
            })),
            "companies:abc"
        );
        assert_eq!(
            flatten_one(&json!({
                "referenced_actor_type": "workspace-member",
                "referenced_actor_id": "m1",
                "attribute_type": "actor-reference"
            })),
            "member:m1"
        );
        assert_eq!(
            flatten_one(&json!({
                "interaction_type": "email",
                "interacted_at": "2024-03-01T10:00:00Z",
                "attribute_type": "interaction"
            })),
            "email @ 2024-03-01T10:00:00Z"
        );
    }

    #[test]
    fn unknown_types_degrade() {
        assert_eq!(
            flatten_one(&json!({ "value": "x", "attribute_type": "hologram" })),
            "x"
        );
        assert_eq!(
            flatten_one(&json!({ "title": "t", "attribute_type": "hologram" })),
            "t"
        );
        let raw = json!({ "shape": 1, "attribute_type": "hologram" });
        assert_eq!(flatten_one(&raw), raw.to_string());
        let untagged = json!({ "value": "plain" });
        assert_eq!(flatten_one(&untagged), "plain");
    }

    #[test]
    fn flatten_record_puts_id_first() {
        let record = json!({
            "id": { "workspace_id": "w", "object_id": "o", "record_id": "r1" },
            "values": {
                "name": [{ "value": "Acme", "attribute_type": "text" }],
                "categories": []
            }
        });
        assert_eq!(
            flatten_record(&record),
            vec![
                ("id".to_string(), "r1".to_string()),
                ("name".to_string(), "Acme".to_string()),
                ("categories".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn flatten_record_handles_entries() {
        let entry = json!({
            "id": { "list_id": "l", "entry_id": "e1" },
            "entry_values": {
                "stage": [{ "status": { "title": "Lead" }, "attribute_type": "status" }]
            }
        });
        let row = flatten_record(&entry);
        assert_eq!(row[0], ("id".to_string(), "e1".to_string()));
        assert_eq!(row[1], ("stage".to_string(), "Lead".to_string()));
    }

    #[test]
    fn fields_by_path() {
        let note = json!({
            "id": { "note_id": "n1" },
            "title": "Call",
            "tags": ["a", "b"]
        });
        assert_eq!(
            flatten_fields(&note, &["id.note_id", "title", "tags", "missing"]),
            vec![
                ("note_id".to_string(), "n1".to_string()),
                ("title".to_string(), "Call".to_string()),
                ("tags".to_string(), "a, b".to_string()),
                ("missing".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn colliding_leaf_names_keep_full_path() {
        let meeting = json!({
            "id": { "meeting_id": "m1" },
            "start": { "datetime": "2024-01-01T10:00:00Z" },
            "end": { "datetime": "2024-01-01T11:00:00Z" }
        });
        assert_eq!(
            flatten_fields(&meeting, &["id.meeting_id", "start.datetime", "end.datetime"]),
            vec![
                ("meeting_id".to_string(), "m1".to_string()),
                ("start_datetime".to_string(), "2024-01-01T10:00:00Z".to_string()),
                ("end_datetime".to_string(), "2024-01-01T11:00:00Z".to_string()),
            ]
        );
    }
}
