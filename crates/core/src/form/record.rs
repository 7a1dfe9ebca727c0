//! The form record and its property overlay.
//!
//! Reads and writes by name go to the template's properties first and fall
//! back to the native columns. Property values are fetched lazily from a
//! [`FormValueStore`] and cached (hits and misses alike), so each property
//! costs at most one lookup per record instance. Writes create a fresh
//! [`FormValue`] when none exists; nothing is persisted here, the
//! repository layer drains [`Form::dirty_values`] and
//! [`Form::removed_property_ids`] after writing the form row.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde_json::{json, Map, Value};

use super::status::FormStatus;
use super::template::FormTemplate;
use super::value::FormValue;
use super::FormValueStore;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Entity name used in unknown-property errors.
const ENTITY: &str = "Form";

/// Columns of the `forms` table reachable by name.
pub const NATIVE_ATTRIBUTES: [&str; 6] = [
    "id",
    "user_id",
    "template_id",
    "status",
    "created_at",
    "updated_at",
];

/// The native columns of a stored form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub template_id: DbId,
    pub status: FormStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Property writes a save must apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormChanges {
    /// `(property_id, value)` pairs to insert or update.
    pub upserts: Vec<(DbId, Option<String>)>,
    /// Property ids whose stored row must be deleted.
    pub removals: Vec<DbId>,
}

impl FormChanges {
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.removals.is_empty()
    }
}

/// A user questionnaire: native columns plus template-defined properties.
#[derive(Debug, Clone)]
pub struct Form {
    id: Option<DbId>,
    user_id: Option<DbId>,
    status: FormStatus,
    /// Status as last persisted; `None` for a new record.
    saved_status: Option<FormStatus>,
    created_at: Option<Timestamp>,
    updated_at: Option<Timestamp>,
    template: Arc<FormTemplate>,
    /// Slug → value. `None` means looked up (or unset) and absent.
    values: BTreeMap<String, Option<FormValue>>,
    /// Property ids whose stored row must be deleted on save.
    removed: BTreeSet<DbId>,
    /// Errors on native columns.
    errors: BTreeMap<String, Vec<String>>,
}

impl Form {
    /// A new, unsaved form.
    pub fn new(template: Arc<FormTemplate>, user_id: Option<DbId>) -> Self {
        Self {
            id: None,
            user_id,
            status: FormStatus::default(),
            saved_status: None,
            created_at: None,
            updated_at: None,
            template,
            values: BTreeMap::new(),
            removed: BTreeSet::new(),
            errors: BTreeMap::new(),
        }
    }

    /// Rebuild a stored form from its row.
    pub fn restore(template: Arc<FormTemplate>, record: FormRecord) -> Result<Self, CoreError> {
        if record.template_id != template.id {
            return Err(CoreError::Internal(format!(
                "Form {} uses template {} but template {} was supplied",
                record.id, record.template_id, template.id
            )));
        }
        let mut form = Self::new(template, Some(record.user_id));
        form.apply_record(record);
        Ok(form)
    }

    pub fn id(&self) -> Option<DbId> {
        self.id
    }

    pub fn user_id(&self) -> Option<DbId> {
        self.user_id
    }

    pub fn template_id(&self) -> DbId {
        self.template.id
    }

    pub fn template(&self) -> &Arc<FormTemplate> {
        &self.template
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn set_status(&mut self, status: FormStatus) {
        self.status = status;
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    pub fn is_new_record(&self) -> bool {
        self.id.is_none()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.template.has_property(name)
    }

    // -----------------------------------------------------------------------
    // Property access
    // -----------------------------------------------------------------------

    /// Current value of a property, loading it on first access. A property
    /// without a value reads as its default.
    pub async fn property(
        &mut self,
        store: &dyn FormValueStore,
        slug: &str,
    ) -> Result<Option<String>, CoreError> {
        self.ensure_looked_up(store, slug).await?;
        if let Some(Some(value)) = self.values.get(slug) {
            return Ok(value.value().map(str::to_string));
        }
        Ok(self
            .template
            .property_by_slug(slug)
            .and_then(|p| p.default_value.clone()))
    }

    /// Write a property, creating its value on first write.
    pub async fn set_property(
        &mut self,
        store: &dyn FormValueStore,
        slug: &str,
        value: Option<String>,
    ) -> Result<(), CoreError> {
        let form_value = self.value(store, slug).await?;
        let property_id = form_value.property_id;
        form_value.set_value(value);
        self.removed.remove(&property_id);
        Ok(())
    }

    /// The value object of a property; a default one is created (but not
    /// marked for saving) when none exists.
    pub async fn value(
        &mut self,
        store: &dyn FormValueStore,
        slug: &str,
    ) -> Result<&mut FormValue, CoreError> {
        self.ensure_looked_up(store, slug).await?;
        let property = self
            .template
            .property_by_slug(slug)
            .ok_or_else(|| unknown(slug))?;
        let (property_id, default_value) = (property.id, property.default_value.clone());
        let slot = self.values.entry(slug.to_string()).or_insert(None);
        Ok(slot.get_or_insert_with(|| FormValue::new(property_id, default_value)))
    }

    /// Values touched so far, keyed by slug.
    pub fn form_values(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.values
            .iter()
            .filter_map(|(slug, value)| value.as_ref().map(|v| (slug.as_str(), v)))
    }

    async fn ensure_looked_up(
        &mut self,
        store: &dyn FormValueStore,
        slug: &str,
    ) -> Result<(), CoreError> {
        if self.values.contains_key(slug) {
            return Ok(());
        }
        let property_id = self
            .template
            .property_by_slug(slug)
            .map(|p| p.id)
            .ok_or_else(|| unknown(slug))?;

        let found = match self.id {
            Some(form_id) => {
                let found = store.find_value(form_id, property_id).await?;
                tracing::debug!(form_id, property_id, found = found.is_some(), "Form value lookup");
                found
            }
            None => None,
        };
        self.values.insert(slug.to_string(), found);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Generic access by name
    // -----------------------------------------------------------------------

    /// Read a property or native column by name.
    pub async fn get(&mut self, store: &dyn FormValueStore, name: &str) -> Result<Value, CoreError> {
        if self.has_property(name) {
            let value = self.property(store, name).await?;
            return Ok(value.map_or(Value::Null, Value::String));
        }
        self.native_attribute(name).ok_or_else(|| unknown(name))
    }

    /// Write a property or native column by name.
    pub async fn set(
        &mut self,
        store: &dyn FormValueStore,
        name: &str,
        value: Value,
    ) -> Result<(), CoreError> {
        if self.has_property(name) {
            let text = scalar_to_text(name, value)?;
            return self.set_property(store, name, text).await;
        }
        match name {
            "user_id" => {
                self.user_id = match value {
                    Value::Null => None,
                    Value::Number(n) => Some(n.as_i64().ok_or_else(|| invalid(name))?),
                    Value::String(s) => Some(s.trim().parse().map_err(|_| invalid(name))?),
                    _ => return Err(invalid(name)),
                };
                Ok(())
            }
            "status" => {
                self.status = match value {
                    Value::String(s) => s.parse()?,
                    _ => return Err(invalid(name)),
                };
                Ok(())
            }
            "template_id" if value.as_i64() == Some(self.template.id) => Ok(()),
            "template_id" => Err(CoreError::Validation(
                "template_id cannot be changed".to_string(),
            )),
            "id" | "created_at" | "updated_at" => {
                Err(CoreError::Validation(format!("{name} is read-only")))
            }
            _ => Err(unknown(name)),
        }
    }

    /// Clear a property or nullable native column.
    ///
    /// A cleared property reads as null; its stored row stays until the form
    /// is saved. A property with a default stores an explicit null instead,
    /// so the default does not come back on reload.
    pub fn unset(&mut self, name: &str) -> Result<(), CoreError> {
        if let Some(property) = self.template.property_by_slug(name) {
            let property_id = property.id;
            if property.default_value.is_some() {
                let slot = self.values.entry(name.to_string()).or_insert(None);
                slot.get_or_insert_with(|| FormValue::new(property_id, None))
                    .set_value(None);
                self.removed.remove(&property_id);
                return Ok(());
            }
            self.values.insert(name.to_string(), None);
            if self.id.is_some() {
                self.removed.insert(property_id);
            }
            return Ok(());
        }
        match name {
            "user_id" => {
                self.user_id = None;
                Ok(())
            }
            "status" => {
                self.status = FormStatus::default();
                Ok(())
            }
            n if NATIVE_ATTRIBUTES.contains(&n) => {
                Err(CoreError::Validation(format!("{n} cannot be unset")))
            }
            _ => Err(unknown(name)),
        }
    }

    /// Assign several attributes; properties and native columns may be mixed.
    pub async fn set_attributes(
        &mut self,
        store: &dyn FormValueStore,
        attributes: &Map<String, Value>,
    ) -> Result<(), CoreError> {
        for (name, value) in attributes {
            self.set(store, name, value.clone()).await?;
        }
        Ok(())
    }

    /// Read several attributes. With `None`, every template property
    /// followed by the native columns.
    pub async fn attributes(
        &mut self,
        store: &dyn FormValueStore,
        names: Option<&[&str]>,
    ) -> Result<Map<String, Value>, CoreError> {
        let names: Vec<String> = match names {
            Some(names) => names.iter().map(|n| n.to_string()).collect(),
            None => self
                .template
                .properties()
                .iter()
                .map(|p| p.slug.clone())
                .chain(NATIVE_ATTRIBUTES.iter().map(|n| n.to_string()))
                .collect(),
        };

        let mut out = Map::new();
        for name in names {
            let value = self.get(store, &name).await?;
            out.insert(name, value);
        }
        Ok(out)
    }

    fn native_attribute(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(json!(self.id)),
            "user_id" => Some(json!(self.user_id)),
            "template_id" => Some(json!(self.template.id)),
            "status" => Some(json!(self.status.as_str())),
            "created_at" => Some(json!(self.created_at)),
            "updated_at" => Some(json!(self.updated_at)),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Labels
    // -----------------------------------------------------------------------

    /// Native column labels merged with property titles.
    pub fn labels(&self) -> BTreeMap<String, String> {
        let mut labels = self.template.property_labels();
        for name in NATIVE_ATTRIBUTES {
            labels.insert(name.to_string(), native_label(name).to_string());
        }
        labels
    }

    /// Label of one attribute, generated from the name when unknown.
    pub fn attribute_label(&self, name: &str) -> String {
        if let Some(property) = self.template.property_by_slug(name) {
            return property.title.clone();
        }
        if NATIVE_ATTRIBUTES.contains(&name) {
            return native_label(name).to_string();
        }
        generate_label(name)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Validate native columns and property values.
    ///
    /// Required and file properties are initialised first so that untouched
    /// required properties are reported and defaults are stored. New forms
    /// must start as draft or submitted; saved ones follow the transitions. Every property in scope is checked
    /// even after a failure; the result is `true` only if all pass.
    pub async fn validate(
        &mut self,
        store: &dyn FormValueStore,
        only: Option<&[&str]>,
    ) -> Result<bool, CoreError> {
        self.clear_errors();
        self.init_required_values(store).await?;

        let in_scope = |name: &str| only.map_or(true, |names| names.contains(&name));
        let mut valid = true;

        if in_scope("user_id") && self.user_id.is_none() {
            let message = format!("{} cannot be blank.", self.attribute_label("user_id"));
            self.add_error("user_id", message);
            valid = false;
        }

        if in_scope("status") {
            let message = match self.saved_status {
                Some(saved) if !saved.can_transition_to(self.status) => {
                    Some(format!("Status cannot change from {saved} to {}.", self.status))
                }
                None if !self.status.is_initial() => {
                    Some(format!("A new form cannot start as {}.", self.status))
                }
                _ => None,
            };
            if let Some(message) = message {
                self.add_error("status", message);
                valid = false;
            }
        }

        let template = Arc::clone(&self.template);
        for property in template.properties() {
            if !in_scope(&property.slug) {
                continue;
            }
            if let Some(Some(value)) = self.values.get_mut(&property.slug) {
                let ok = value.validate(property);
                valid = valid && ok;
            }
        }

        if !valid {
            tracing::debug!(form_id = ?self.id, errors = ?self.first_errors(), "Form validation failed");
        }
        Ok(valid)
    }

    async fn init_required_values(&mut self, store: &dyn FormValueStore) -> Result<(), CoreError> {
        let template = Arc::clone(&self.template);
        for property in template.properties() {
            if property.is_required() || property.is_file() {
                self.value(store, &property.slug).await?;
            }
        }
        Ok(())
    }

    pub fn add_error(&mut self, name: &str, message: String) {
        self.errors.entry(name.to_string()).or_default().push(message);
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
        for value in self.values.values_mut().flatten() {
            value.clear_errors();
        }
    }

    /// All errors, native columns and properties together.
    pub fn errors(&self) -> BTreeMap<String, Vec<String>> {
        let mut errors = self.errors.clone();
        for (slug, value) in self.form_values() {
            if value.has_errors() {
                errors.insert(slug.to_string(), value.errors().to_vec());
            }
        }
        errors
    }

    /// Errors of one attribute.
    pub fn errors_for(&self, name: &str) -> Vec<String> {
        if self.has_property(name) {
            return self
                .values
                .get(name)
                .and_then(Option::as_ref)
                .map(|v| v.errors().to_vec())
                .unwrap_or_default();
        }
        self.errors.get(name).cloned().unwrap_or_default()
    }

    pub fn first_error(&self, name: &str) -> Option<String> {
        self.errors_for(name).into_iter().next()
    }

    /// First error of every attribute that has one.
    pub fn first_errors(&self) -> BTreeMap<String, String> {
        self.errors()
            .into_iter()
            .filter_map(|(name, errors)| errors.into_iter().next().map(|e| (name, e)))
            .collect()
    }

    pub fn has_errors(&self, name: Option<&str>) -> bool {
        match name {
            Some(name) => !self.errors_for(name).is_empty(),
            None => !self.errors().is_empty(),
        }
    }

    // -----------------------------------------------------------------------
    // Persistence hand-off
    // -----------------------------------------------------------------------

    /// Values that must be written on save.
    pub fn dirty_values(&self) -> impl Iterator<Item = &FormValue> {
        self.form_values()
            .map(|(_, value)| value)
            .filter(|value| value.is_dirty())
    }

    /// Properties whose stored row must be deleted on save.
    pub fn removed_property_ids(&self) -> impl Iterator<Item = DbId> + '_ {
        self.removed.iter().copied()
    }

    /// Everything a save has to write for the property side table.
    pub fn changes(&self) -> FormChanges {
        FormChanges {
            upserts: self
                .dirty_values()
                .map(|v| (v.property_id, v.value().map(str::to_string)))
                .collect(),
            removals: self.removed_property_ids().collect(),
        }
    }

    /// Record a completed save: the stored row and the `(property_id,
    /// value_id)` pairs written for it.
    pub fn mark_saved(&mut self, record: FormRecord, saved_values: &[(DbId, DbId)]) {
        let form_id = record.id;
        self.apply_record(record);
        for value in self.values.values_mut().flatten() {
            if let Some((_, value_id)) = saved_values
                .iter()
                .find(|(property_id, _)| *property_id == value.property_id)
            {
                value.mark_saved(*value_id, form_id);
            }
        }
        self.removed.clear();
    }

    fn apply_record(&mut self, record: FormRecord) {
        self.id = Some(record.id);
        self.user_id = Some(record.user_id);
        self.status = record.status;
        self.saved_status = Some(record.status);
        self.created_at = Some(record.created_at);
        self.updated_at = Some(record.updated_at);
    }
}

fn unknown(name: &str) -> CoreError {
    CoreError::UnknownProperty {
        entity: ENTITY,
        name: name.to_string(),
    }
}

fn invalid(name: &str) -> CoreError {
    CoreError::Validation(format!("Invalid value for {name}"))
}

/// Property values are stored as text.
fn scalar_to_text(name: &str, value: Value) -> Result<Option<String>, CoreError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(if b { "1" } else { "0" }.to_string())),
        Value::Array(_) | Value::Object(_) => Err(CoreError::Validation(format!(
            "{name} must be a scalar value"
        ))),
    }
}

fn native_label(name: &str) -> &'static str {
    match name {
        "id" => "ID",
        "user_id" => "User id",
        "template_id" => "Template id",
        "status" => "Status",
        "created_at" => "Created at",
        "updated_at" => "Updated at",
        _ => "",
    }
}

/// `"first_name"` → `"First Name"`.
fn generate_label(name: &str) -> String {
    name.split(['_', '-', '.'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
