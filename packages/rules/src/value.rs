use serde_json::Value;

/// Whether a field value counts as present.
///
/// `Null`, `false`, zero, non-finite numbers and `""` are falsy. Arrays and
/// objects are truthy regardless of their contents; `required` handles the
/// empty-array case through [`length`].
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && f.is_finite()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Length of a value that has one: chars for strings, elements for arrays.
pub fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// String view used by the pattern rules. Anything else fails the pattern.
pub fn as_text(value: &Value) -> Option<&str> {
    value.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));

        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        assert_eq!(length(&json!("héllo")), Some(5));
        assert_eq!(length(&json!([1, 2, 3])), Some(3));
        assert_eq!(length(&json!(12345)), None);
        assert_eq!(length(&Value::Null), None);
    }
}
