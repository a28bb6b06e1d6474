//! Response coercion: turns a free-text model reply into a `ParsedResumeRecord`.
//!
//! Nothing in the reply is trusted: the JSON may be wrapped in prose or code fences,
//! keys may drift in casing and punctuation, and any field may be missing or mistyped.
//! Every field of the output is populated regardless.

use serde_json::{Deserializer, Map, Value};

use crate::resume::models::{ParsedResumeRecord, SequenceField};
use crate::resume::ParseError;

/// Locates and parses the JSON object embedded in `reply`, then normalizes it.
pub fn coerce_reply(reply: &str) -> Result<ParsedResumeRecord, ParseError> {
    let value = extract_json_object(reply)?;
    Ok(normalize(&value))
}

/// Parses the span from the leftmost `{` to the last `}`. If that span is not
/// valid JSON, the first complete value starting at the same `{` is tried
/// before giving up, so trailing prose with stray braces is ignored.
pub fn extract_json_object(reply: &str) -> Result<Value, ParseError> {
    let start = reply.find('{').ok_or(ParseError::NoJsonFound)?;
    let end = reply.rfind('}').filter(|&end| end > start).ok_or(ParseError::NoJsonFound)?;

    serde_json::from_str::<Value>(&reply[start..=end]).or_else(|err| {
        Deserializer::from_str(&reply[start..])
            .into_iter::<Value>()
            .next()
            .and_then(Result::ok)
            .ok_or(ParseError::MalformedJson(err))
    })
}

/// Builds a record from any JSON value. Non-objects yield the all-default record.
/// The derived average is always recomputed, never taken from the input.
pub fn normalize(value: &Value) -> ParsedResumeRecord {
    let empty = Map::new();
    let obj = value.as_object().unwrap_or(&empty);
    let get = |key: &str| lookup(obj, key);

    let mut record = ParsedResumeRecord {
        ug_institute_name: text(get("UG_InstituteName")),
        pg_institute_name: text(get("PG_InstituteName")),
        phd_institute_name: text(get("PHD_InstituteName")),
        longevity_years: non_negative(get("Longevity_Years")),
        achievements_no: count(get("Achievements_No")),
        skills_no: count(get("Skills_No")),
        projects_no: count(get("Projects_No")),
        total_papers: count(get("Total_Papers")),
        total_patents: count(get("Total_Patents")),
        books: count(get("Books")),
        state_jk: flag(get("State_JK")),
        no_of_jobs: count(get("No_of_Jobs")),
        best_fit_for: text(get("Best_Fit_For")),
        ..Default::default()
    };
    for field in SequenceField::ALL {
        *record.list_mut(field) = text_list(get(field.key()));
    }
    record.refresh_derived();
    record
}

/// Exact key first, then a match ignoring case and every non-alphanumeric character.
fn lookup<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).or_else(|| {
        let wanted = fold_key(key);
        obj.iter()
            .find(|(k, _)| fold_key(k) == wanted)
            .map(|(_, v)| v)
    })
}

fn fold_key(key: &str) -> String {
    key.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn text(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn non_negative(value: Option<&Value>) -> f64 {
    value
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .map(|n| n.max(0.0))
        .unwrap_or(0.0)
}

fn count(value: Option<&Value>) -> u32 {
    // float-to-int `as` saturates
    non_negative(value).trunc() as u32
}

fn flag(value: Option<&Value>) -> u8 {
    u8::from(non_negative(value) > 0.0)
}

fn text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
