//! Request validation.
//!
//! A [`Validator`] walks a JSON object field by field and records one
//! [`FieldError`] per failing rule, in declaration order. The error `code` is
//! the name of the failed rule (`required`, `email`, `alpha`, ...).

pub mod schemas;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("valid email regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub code: String,
    pub field: Option<String>,
    pub message: String,
}

impl FieldError {
    pub fn rule(code: &str, field: &str) -> Self {
        let message = match code {
            "unique" | "exists" => format!("{code} validation failure"),
            _ => format!("{code} validation failed"),
        };
        Self {
            code: code.to_string(),
            field: Some(field.to_string()),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed on {} field(s)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn single(code: &str, field: &str) -> Self {
        Self(vec![FieldError::rule(code, field)])
    }
}

pub struct Validator<'a> {
    body: Option<&'a Map<String, Value>>,
    errors: Vec<FieldError>,
}

impl<'a> Validator<'a> {
    /// Non-object bodies validate like an empty object.
    pub fn new(body: &'a Value) -> Self {
        Self {
            body: body.as_object(),
            errors: Vec::new(),
        }
    }

    fn raw(&self, field: &str) -> Option<&'a Value> {
        self.body
            .and_then(|m| m.get(field))
            .filter(|v| !v.is_null())
    }

    fn fail(&mut self, code: &str, field: &str) {
        self.errors.push(FieldError::rule(code, field));
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors
            .iter()
            .any(|e| e.field.as_deref() == Some(field))
    }

    fn string(&mut self, field: &str, trim: bool) -> Option<String> {
        match self.raw(field) {
            None => None,
            Some(Value::String(s)) => {
                let s = if trim { s.trim() } else { s.as_str() };
                if s.is_empty() {
                    None
                } else {
                    Some(s.to_string())
                }
            }
            Some(_) => {
                self.fail("string", field);
                Some(String::new())
            }
        }
    }

    /// Missing, null and empty strings fail with `required`. The returned value
    /// is empty whenever the field failed.
    pub fn required_string(&mut self, field: &str) -> String {
        match self.string(field, false) {
            Some(s) => s,
            None => {
                self.fail("required", field);
                String::new()
            }
        }
    }

    pub fn required_trimmed(&mut self, field: &str) -> String {
        match self.string(field, true) {
            Some(s) => s,
            None => {
                self.fail("required", field);
                String::new()
            }
        }
    }

    pub fn optional_string(&mut self, field: &str) -> Option<String> {
        self.string(field, false).filter(|s| !s.is_empty())
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if !self.has_error(field) && !EMAIL_RE.is_match(value) {
            self.fail("email", field);
        }
    }

    pub fn alpha(&mut self, field: &str, value: &str) {
        if !self.has_error(field) && !value.chars().all(char::is_alphabetic) {
            self.fail("alpha", field);
        }
    }

    /// Optional array of positive integer ids. Numeric strings are accepted.
    pub fn optional_ids(&mut self, field: &str) -> Option<Vec<i64>> {
        let Some(raw) = self.raw(field) else {
            return None;
        };
        let Some(items) = raw.as_array() else {
            self.fail("array", field);
            return None;
        };
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            let id = match item {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            match id {
                Some(id) if id > 0 => ids.push(id),
                _ => {
                    self.fail("number", field);
                    return None;
                }
            }
        }
        Some(ids)
    }

    pub fn reject(&mut self, code: &str, field: &str) {
        self.fail(code, field);
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_are_reported_in_declaration_order() {
        let body = json!({});
        let mut v = Validator::new(&body);
        v.required_string("street1");
        v.required_string("city");
        let errors = v.finish().unwrap_err().0;
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], FieldError::rule("required", "street1"));
        assert_eq!(errors[0].message, "required validation failed");
        assert_eq!(errors[1].field.as_deref(), Some("city"));
    }

    #[test]
    fn empty_and_null_values_count_as_missing() {
        let body = json!({"a": "", "b": null});
        let mut v = Validator::new(&body);
        v.required_string("a");
        v.required_string("b");
        assert_eq!(v.finish().unwrap_err().0.len(), 2);
    }

    #[test]
    fn wrong_type_fails_with_string_rule() {
        let body = json!({"zip": 75000});
        let mut v = Validator::new(&body);
        v.required_string("zip");
        let errors = v.finish().unwrap_err().0;
        assert_eq!(errors, vec![FieldError::rule("string", "zip")]);
    }

    #[test]
    fn email_and_alpha_rules() {
        let body = json!({"email": "not-an-email", "name": "J0hn"});
        let mut v = Validator::new(&body);
        let email = v.required_trimmed("email");
        v.email("email", &email);
        let name = v.required_string("name");
        v.alpha("name", &name);
        let errors = v.finish().unwrap_err().0;
        assert_eq!(errors[0].code, "email");
        assert_eq!(errors[1].code, "alpha");
    }

    #[test]
    fn email_rule_is_skipped_when_field_already_failed() {
        let body = json!({});
        let mut v = Validator::new(&body);
        let email = v.required_trimmed("email");
        v.email("email", &email);
        assert_eq!(v.finish().unwrap_err().0.len(), 1);
    }

    #[test]
    fn ids_accept_numbers_and_numeric_strings() {
        let body = json!({"categories": [1, "2"]});
        let mut v = Validator::new(&body);
        assert_eq!(v.optional_ids("categories"), Some(vec![1, 2]));
        assert!(v.finish().is_ok());

        let body = json!({"categories": "1"});
        let mut v = Validator::new(&body);
        assert_eq!(v.optional_ids("categories"), None);
        assert_eq!(v.finish().unwrap_err().0[0].code, "array");
    }

    #[test]
    fn unique_failures_use_failure_wording() {
        assert_eq!(
            ValidationErrors::single("unique", "email").0[0].message,
            "unique validation failure"
        );
    }
}
