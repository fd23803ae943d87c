//! Query shorthand: filters and sorts

pub mod filter;
pub mod sort;

use anyhow::Result;
use serde_json::Value;
use thiserror::Error;

pub use filter::FilterSyntaxError;
pub use sort::{parse_sort, SortSpec};

#[derive(Debug, Error)]
#[error("--filter-json is not valid JSON")]
pub struct FilterJsonError(#[source] serde_json::Error);

/// Build the filter object for a query request.
///
/// Raw `--filter-json` is passed through untouched (only JSON syntax is checked).
pub fn build_filter(filters: &[String], filter_json: Option<&str>) -> Result<Value> {
    if let Some(raw) = filter_json {
        return Ok(serde_json::from_str::<Value>(raw).map_err(FilterJsonError)?);
    }
    Ok(filter::parse_all(filters)?)
}

/// Build the sorts array for a query request
pub fn build_sorts(sorts: &[String]) -> Vec<SortSpec> {
    sorts.iter().map(|s| parse_sort(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_json_bypasses_parser() {
        let filter = build_filter(
            &["ignored".to_string()],
            Some(r#"{"$or":[{"name":"a"},{"name":"b"}]}"#),
        )
        .unwrap();
        assert_eq!(filter, json!({ "$or": [{ "name": "a" }, { "name": "b" }] }));
    }

    #[test]
    fn raw_json_must_parse() {
        let err = build_filter(&[], Some("{not json")).unwrap_err();
        assert!(err.downcast_ref::<FilterJsonError>().is_some());
    }

    #[test]
    fn no_filters_is_empty_object() {
        assert_eq!(build_filter(&[], None).unwrap(), json!({}));
    }

    #[test]
    fn syntax_error_survives_as_typed_error() {
        let err = build_filter(&["broken".to_string()], None).unwrap_err();
        assert!(err.downcast_ref::<FilterSyntaxError>().is_some());
    }
}
