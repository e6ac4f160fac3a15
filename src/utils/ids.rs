use serde_json::Value;

/// Reads an identifier that clients send either as a JSON integer or as a
/// numeric string (`2`, `"2"`, `" 2 "`). Anything else yields `None`.
pub fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => parse_id_str(s),
        _ => None,
    }
}

/// Parses a query-string identifier.
pub fn parse_id_str(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}
