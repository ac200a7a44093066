use std::rc::Rc;

use serde_json::Value;

use crate::value::is_truthy;

/// Outcome of a single rule: `Ok(())` passes, `Err` carries the message to show.
pub type Decision = Result<(), String>;

/// A rule ready to be evaluated against a field's current value.
pub type DecisionFn = Rc<dyn Fn(&Value) -> Decision>;

/// Ordered rules for one field. Order decides which message is shown first.
pub type RuleSet = Vec<DecisionFn>;

/// Wrap a closure as a [`DecisionFn`].
pub fn decision<F>(f: F) -> DecisionFn
where
    F: Fn(&Value) -> Decision + 'static,
{
    Rc::new(f)
}

/// Skip `rule` while the field is empty. Useful for pattern rules on
/// optional fields, which otherwise reject an absent value.
pub fn optional(rule: DecisionFn) -> DecisionFn {
    decision(move |value| if is_truthy(value) { rule(value) } else { Ok(()) })
}

/// Evaluate `rules` in order and return the first failing message, if any.
pub fn first_failure(rules: &[DecisionFn], value: &Value) -> Option<String> {
    rules.iter().find_map(|rule| rule(value).err())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fails_with(message: &'static str) -> DecisionFn {
        decision(move |_| Err(message.to_string()))
    }

    #[test]
    fn test_first_failure_respects_order() {
        let rules: RuleSet = vec![decision(|_| Ok(())), fails_with("first"), fails_with("second")];

        assert_eq!(first_failure(&rules, &json!("x")), Some("first".to_string()));
    }

    #[test]
    fn test_optional_skips_empty_values() {
        let rule = optional(fails_with("bad"));

        assert_eq!(rule(&Value::Null), Ok(()));
        assert_eq!(rule(&json!("")), Ok(()));
        assert_eq!(rule(&json!("x")), Err("bad".to_string()));
    }

    #[test]
    fn test_empty_rule_set_passes() {
        assert_eq!(first_failure(&[], &Value::Null), None);
    }
}
