//! Persisted value of one property for one form.

use serde::Serialize;

use super::template::FormProperty;
use super::validator::{run_validators, ValidatorRule};
use crate::types::DbId;

/// One `(form, property)` value, loaded from the side table or created on
/// first write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormValue {
    pub id: Option<DbId>,
    pub form_id: Option<DbId>,
    pub property_id: DbId,
    value: Option<String>,
    #[serde(skip)]
    old_value: Option<String>,
    #[serde(skip)]
    written: bool,
    #[serde(skip)]
    errors: Vec<String>,
}

impl FormValue {
    /// A fresh value carrying the property default. Dirty once written, or
    /// right away when the default is not null so that it gets stored.
    pub fn new(property_id: DbId, default_value: Option<String>) -> Self {
        Self {
            id: None,
            form_id: None,
            property_id,
            value: default_value,
            old_value: None,
            written: false,
            errors: Vec::new(),
        }
    }

    /// A value as read from storage.
    pub fn persisted(id: DbId, form_id: DbId, property_id: DbId, value: Option<String>) -> Self {
        Self {
            id: Some(id),
            form_id: Some(form_id),
            property_id,
            old_value: value.clone(),
            value,
            written: false,
            errors: Vec::new(),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Value as last read from or written to storage.
    pub fn old_value(&self) -> Option<&str> {
        self.old_value.as_deref()
    }

    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
        self.written = true;
    }

    pub fn is_new_record(&self) -> bool {
        self.id.is_none()
    }

    /// Whether saving would change storage. A new value counts once it has
    /// been written to or when it carries a default.
    pub fn is_dirty(&self) -> bool {
        if self.is_new_record() {
            self.written || self.value.is_some()
        } else {
            self.value != self.old_value
        }
    }

    /// Run the property's validators against the current value. A property
    /// flagged required without a `required` rule gets an implicit one that
    /// runs first.
    pub fn validate(&mut self, property: &FormProperty) -> bool {
        let mut errors = Vec::new();
        if property.required && !property.validators.iter().any(|v| v.rule.is_required()) {
            let implicit = ValidatorRule::Required { message: None };
            errors.extend(implicit.check(self.value(), &property.title));
        }
        errors.extend(run_validators(&property.validators, self.value(), &property.title));
        self.errors = errors;
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Record a successful write.
    pub fn mark_saved(&mut self, id: DbId, form_id: DbId) {
        self.id = Some(id);
        self.form_id = Some(form_id);
        self.old_value = self.value.clone();
        self.written = false;
    }
}
