use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Record cannot be serialized - {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Record is not an object: {0}")]
    NotAnObject(Value),
}

type RecordResult<T> = anyhow::Result<T, RecordError>;

/// Fields of a record in declaration order.
pub fn fields<T: Serialize>(record: &T) -> RecordResult<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(RecordError::NotAnObject(other)),
    }
}

/// Text of a field value as it appears on the page. Strings lose their quotes.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn entry_line(key: &str, value: &Value) -> String {
    format!("<strong>{key}:</strong> {}", display_value(value))
}

/// One `<strong>key:</strong> value` line per field, joined with `<br>`.
pub fn list_entries<T: Serialize>(record: &T) -> RecordResult<String> {
    let lines: Vec<String> = fields(record)?
        .iter()
        .map(|(key, value)| entry_line(key, value))
        .collect();

    Ok(lines.join("<br>"))
}

pub fn get_key<T: Serialize>(record: &T, key: &str) -> RecordResult<String> {
    let report = match fields(record)?.get(key) {
        Some(value) => format!("<strong>{key} exists:</strong> {}", display_value(value)),
        None => format!("<strong>{key} not found.</strong>"),
    };

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[derive(Serialize)]
    struct Empty {}

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Branch {
        branch_name: &'static str,
        open: bool,
        tellers: u8,
    }

    fn branch() -> Branch {
        Branch {
            branch_name: "Uptown",
            open: true,
            tellers: 3,
        }
    }

    #[test]
    fn lists_fields_in_declaration_order() {
        let listed = list_entries(&branch()).unwrap();

        assert_eq!(
            listed,
            "<strong>branchName:</strong> Uptown<br><strong>open:</strong> true<br><strong>tellers:</strong> 3"
        );
    }

    #[test]
    fn empty_record_lists_nothing() {
        assert_eq!(list_entries(&Empty {}).unwrap(), "");
    }

    #[test]
    fn non_object_is_rejected() {
        let result = list_entries(&vec![1, 2, 3]);

        assert!(matches!(result, Err(RecordError::NotAnObject(_))));
    }

    #[test_case("tellers", "<strong>tellers exists:</strong> 3" ; "number")]
    #[test_case("branchName", "<strong>branchName exists:</strong> Uptown" ; "string without quotes")]
    #[test_case("vault", "<strong>vault not found.</strong>" ; "absent key")]
    fn reports_key_existence(key: &str, expected: &str) {
        assert_eq!(get_key(&branch(), key).unwrap(), expected);
    }

    #[test_case(json!(null), "null" ; "null")]
    #[test_case(json!(12.5), "12.5" ; "fraction")]
    #[test_case(json!("ABC"), "ABC" ; "text")]
    fn displays_values_like_the_page(value: Value, expected: &str) {
        assert_eq!(display_value(&value), expected);
    }
}
