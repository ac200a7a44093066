use std::cell::RefCell;
use std::rc::Rc;

use rules::{first_failure, FormAdapter, RuleSet};
use serde_json::{Map, Value};

use crate::errors::{ValidationErrors, ValidationErrorsExt};

struct Field {
    name: String,
    rules: RuleSet,
}

/// In-memory form host: ordered fields, their current values, and the
/// messages produced by the last validation.
pub struct Form {
    fields: Vec<Field>,
    values: Rc<RefCell<Map<String, Value>>>,
    errors: ValidationErrors,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            values: Rc::new(RefCell::new(Map::new())),
            errors: ValidationErrors::new(),
        }
    }

    /// Register a field. Registering a name twice replaces its rules.
    pub fn field(mut self, name: &str, rules: RuleSet) -> Self {
        self.values.borrow_mut().entry(name.to_string()).or_insert(Value::Null);
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.rules = rules,
            None => self.fields.push(Field { name: name.to_string(), rules }),
        }
        self
    }

    pub fn set_value(&self, name: &str, value: Value) {
        self.values.borrow_mut().insert(name.to_string(), value);
    }

    /// Copy every key of `values` into the form.
    pub fn fill(&self, values: Map<String, Value>) {
        self.values.borrow_mut().extend(values);
    }

    pub fn value(&self, name: &str) -> Value {
        self.values.borrow().get(name).cloned().unwrap_or(Value::Null)
    }

    /// Shared handle to the current values, for rules that compare against
    /// a sibling field.
    pub fn values(&self) -> Rc<RefCell<Map<String, Value>>> {
        Rc::clone(&self.values)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Messages recorded by the last [`FormAdapter::validate`] call.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).and_then(|messages| messages.first()).map(String::as_str)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Evaluate every field against its current value without recording
    /// anything. Only the first failing rule of each field is reported.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let values = self.values.borrow();
        let mut errors = ValidationErrors::new();

        for field in &self.fields {
            let value = values.get(&field.name).cloned().unwrap_or(Value::Null);
            if let Some(message) = first_failure(&field.rules, &value) {
                errors.add_error(&field.name, message);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Recorded messages joined in field order.
    pub fn summary(&self) -> String {
        self.fields
            .iter()
            .filter_map(|f| self.error(&f.name))
            .collect::<Vec<&str>>()
            .join(", ")
    }
}

impl FormAdapter for Form {
    fn validate(&mut self) -> bool {
        self.errors = match self.check() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        tracing::debug!(
            fields = self.fields.len(),
            failed = self.errors.len(),
            "form validated"
        );
        self.errors.is_empty()
    }
}
