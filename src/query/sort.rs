//! Sort shorthand parser (`attribute[.field]:direction`)

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub attribute: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub direction: String,
}

/// Parse a sort expression such as `name.last_name:desc`
pub fn parse_sort(expr: &str) -> SortSpec {
    let (target, direction) = match expr.split_once(':') {
        Some((target, dir)) if !dir.trim().is_empty() => (target, dir.trim().to_lowercase()),
        Some((target, _)) => (target, "asc".to_string()),
        None => (expr, "asc".to_string()),
    };

    let (attribute, field) = match target.split_once('.') {
        Some((attr, field)) if !field.is_empty() => (attr, Some(field.to_string())),
        Some((attr, _)) => (attr, None),
        None => (target, None),
    };

    SortSpec {
        attribute: attribute.trim().to_string(),
        field,
        direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn direction_defaults_to_asc() {
        assert_eq!(parse_sort("name").direction, "asc");
        assert_eq!(parse_sort("name:").direction, "asc");
    }

    #[test]
    fn explicit_direction() {
        let spec = parse_sort("created_at:DESC");
        assert_eq!(spec.attribute, "created_at");
        assert_eq!(spec.direction, "desc");
        assert_eq!(spec.field, None);
    }

    #[test]
    fn sub_field() {
        let spec = parse_sort("name.last_name:desc");
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({ "attribute": "name", "field": "last_name", "direction": "desc" })
        );
    }

    #[test]
    fn field_is_omitted_when_absent() {
        assert_eq!(
            serde_json::to_value(parse_sort("domains")).unwrap(),
            json!({ "attribute": "domains", "direction": "asc" })
        );
    }
}
