//! Wire format of customer exchange files.
//!
//! A file is a bare JSON array of customer objects. On the way in, object keys
//! are lower-cased before lookup so `Name`, `name` and `NAME` all address the
//! same field. On the way out, field names are always lower camel case.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::domain::customer::{CustomerDraft, CustomerRecord};
use crate::errors::ImportError;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Decodes an exchange file into one entry per array element.
///
/// `null` elements decode to `None`; they still count as parsed records.
/// A top-level `null` is an absent array and yields no entries.
pub fn parse_drafts(bytes: &[u8]) -> Result<Vec<Option<CustomerDraft>>, ImportError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|error| ImportError::InvalidFormat(format!("file is not valid UTF-8: {error}")))?;
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    let document: Value = serde_json::from_str(text)
        .map_err(|error| ImportError::InvalidFormat(error.to_string()))?;

    match document {
        Value::Null => Ok(Vec::new()),
        Value::Array(elements) => elements
            .into_iter()
            .enumerate()
            .map(|(position, element)| match element {
                Value::Null => Ok(None),
                Value::Object(object) => draft_from_object(position, object).map(Some),
                other => Err(ImportError::InvalidFormat(format!(
                    "element {position} must be an object, found {}",
                    kind_of(&other)
                ))),
            })
            .collect(),
        other => Err(ImportError::InvalidFormat(format!(
            "top-level value must be an array, found {}",
            kind_of(&other)
        ))),
    }
}

/// Renders records as an indented JSON array.
pub fn render_document(records: &[CustomerRecord]) -> Result<Vec<u8>, serde_json::Error> {
    let exchange: Vec<ExchangeRecord<'_>> = records.iter().map(ExchangeRecord::from).collect();
    serde_json::to_vec_pretty(&exchange)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeRecord<'a> {
    id: &'a str,
    name: &'a str,
    surname: &'a str,
    username: &'a str,
    email: &'a str,
    shipping_address: &'a str,
}

impl<'a> From<&'a CustomerRecord> for ExchangeRecord<'a> {
    fn from(record: &'a CustomerRecord) -> Self {
        Self {
            id: record.id.as_str(),
            name: &record.name,
            surname: &record.surname,
            username: &record.username,
            email: &record.email,
            shipping_address: &record.shipping_address,
        }
    }
}

fn draft_from_object(
    position: usize,
    object: serde_json::Map<String, Value>,
) -> Result<CustomerDraft, ImportError> {
    let mut fields = normalize_keys(object);

    let mut take = |key: &str| -> Result<Option<String>, ImportError> {
        match fields.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(other) => Err(ImportError::InvalidFormat(format!(
                "field `{key}` of element {position} must be a string, found {}",
                kind_of(&other)
            ))),
        }
    };

    Ok(CustomerDraft {
        id: take("id")?,
        name: take("name")?,
        surname: take("surname")?,
        username: take("username")?,
        email: take("email")?,
        shipping_address: take("shippingaddress")?,
    })
}

/// Lower-cases every key. Among keys that differ only by case the all-lower-case
/// spelling wins; otherwise the first one iterated is kept.
fn normalize_keys(object: serde_json::Map<String, Value>) -> HashMap<String, Value> {
    let mut fields = HashMap::with_capacity(object.len());
    for (key, value) in object {
        let lowered = key.to_lowercase();
        if lowered == key {
            fields.insert(lowered, value);
        } else {
            fields.entry(lowered).or_insert(value);
        }
    }
    fields
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::domain::customer::{CustomerId, CustomerRecord};
    use crate::errors::ImportError;

    use super::{normalize_keys, parse_drafts, render_document};

    #[test]
    fn keys_are_matched_case_insensitively() {
        let drafts = parse_drafts(
            br#"[{"ID":"c-1","Name":"Ada","SURNAME":"Lovelace","userName":"ada","eMail":"a@b.c","ShippingAddress":"X"}]"#,
        )
        .expect("document parses");

        let draft = drafts[0].as_ref().expect("element is an object");
        assert_eq!(draft.id.as_deref(), Some("c-1"));
        assert_eq!(draft.name.as_deref(), Some("Ada"));
        assert_eq!(draft.surname.as_deref(), Some("Lovelace"));
        assert_eq!(draft.username.as_deref(), Some("ada"));
        assert_eq!(draft.email.as_deref(), Some("a@b.c"));
        assert_eq!(draft.shipping_address.as_deref(), Some("X"));
    }

    #[test]
    fn lower_case_spelling_wins_on_key_collision() {
        let drafts =
            parse_drafts(br#"[{"name":"lower","Name":"title","NAME":"upper"}]"#).expect("parses");

        assert_eq!(drafts[0].as_ref().and_then(|d| d.name.as_deref()), Some("lower"));
    }

    #[test]
    fn lower_case_key_wins_whichever_spelling_is_inserted_first() {
        for keys in [["name", "NAME"], ["NAME", "name"]] {
            let mut object = serde_json::Map::new();
            for key in keys {
                object.insert(key.to_string(), Value::String(key.to_string()));
            }

            let fields = normalize_keys(object);

            assert_eq!(fields.len(), 1);
            assert_eq!(fields.get("name"), Some(&Value::String("name".to_string())));
        }
    }

    #[test]
    fn unknown_keys_are_ignored_and_nulls_are_absent() {
        let drafts = parse_drafts(br#"[{"phone":"555","name":null,"partitionKey":"Customer"}]"#)
            .expect("parses");

        let draft = drafts[0].as_ref().expect("element is an object");
        assert_eq!(draft.name, None);
        assert_eq!(draft.missing_fields().len(), 5);
    }

    #[test]
    fn top_level_null_is_an_absent_array() {
        assert_eq!(parse_drafts(b"null").expect("parses"), Vec::new());
    }

    #[test]
    fn null_elements_are_kept_as_records() {
        let drafts = parse_drafts(b"[null, {}]").expect("parses");

        assert_eq!(drafts.len(), 2);
        assert!(drafts[0].is_none());
        assert!(drafts[1].is_some());
    }

    #[test]
    fn leading_byte_order_mark_is_skipped() {
        let mut bytes = "\u{feff}".as_bytes().to_vec();
        bytes.extend_from_slice(b"[]");

        assert_eq!(parse_drafts(&bytes).expect("parses"), Vec::new());
    }

    #[test]
    fn malformed_documents_are_format_errors() {
        for input in [
            &b"[{\"name\":\"A\"},"[..],
            b"{\"name\":\"A\"}",
            b"[1, 2]",
            b"[{\"name\": 7}]",
            b"\xff\xfe[]",
        ] {
            let result = parse_drafts(input);
            assert!(
                matches!(result, Err(ImportError::InvalidFormat(_))),
                "expected format error for {:?}",
                String::from_utf8_lossy(input)
            );
        }
    }

    #[test]
    fn rendered_document_is_indented_lower_camel_case() {
        let records = vec![CustomerRecord {
            id: CustomerId("c-1".to_string()),
            name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            shipping_address: "London".to_string(),
        }];

        let bytes = render_document(&records).expect("renders");
        let text = String::from_utf8(bytes).expect("utf-8");

        assert!(text.starts_with("[\n  {\n    \"id\": \"c-1\""));
        assert!(text.contains("\"shippingAddress\": \"London\""));
        assert!(!text.contains("shipping_address"));
    }

    #[test]
    fn empty_record_set_renders_as_empty_array() {
        let bytes = render_document(&[]).expect("renders");
        let value: Value = serde_json::from_slice(&bytes).expect("valid json");

        assert_eq!(value, Value::Array(Vec::new()));
    }
}
