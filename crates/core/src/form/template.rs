//! Form templates: the runtime schema of a form.
//!
//! A template lists the properties a form exposes, in display order, with
//! their titles, kinds and validators. Forms consult it to decide whether a
//! name is a property or must fall through to a native column.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::record::Form;
use super::validator::PropertyValidator;
use crate::error::CoreError;
use crate::types::DbId;

/// The only template currently in use; new forms default to it.
pub const DEFAULT_TEMPLATE_ID: DbId = 1;

/// Value kind of a property. Values are always stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    String,
    Text,
    Number,
    Date,
    File,
}

impl PropertyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::File => "file",
        }
    }
}

impl FromStr for PropertyKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "file" => Ok(Self::File),
            other => Err(CoreError::Validation(format!(
                "Unknown property kind: {other}"
            ))),
        }
    }
}

/// A template-defined form field that is not a native column.
#[derive(Debug, Clone, Serialize)]
pub struct FormProperty {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub kind: PropertyKind,
    /// Explicit required flag. Enforced as an implicit `required` rule when
    /// no validator already is one.
    pub required: bool,
    pub default_value: Option<String>,
    pub sort_order: i32,
    pub validators: Vec<PropertyValidator>,
}

impl FormProperty {
    pub fn is_required(&self) -> bool {
        self.required || self.validators.iter().any(|v| v.rule.is_required())
    }

    pub fn is_file(&self) -> bool {
        self.kind == PropertyKind::File
    }
}

/// Runtime schema shared by every form created from it.
#[derive(Debug, Clone)]
pub struct FormTemplate {
    pub id: DbId,
    pub name: String,
    properties: Vec<FormProperty>,
    by_slug: HashMap<String, usize>,
}

impl FormTemplate {
    /// Build a template. Properties are ordered by `(sort_order, id)` and
    /// their validators by `(priority, id)`.
    pub fn new(id: DbId, name: impl Into<String>, mut properties: Vec<FormProperty>) -> Self {
        properties.sort_by_key(|p| (p.sort_order, p.id));
        for property in &mut properties {
            property.validators.sort_by_key(|v| (v.priority, v.id));
        }
        let by_slug = properties
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.slug.clone(), idx))
            .collect();
        Self {
            id,
            name: name.into(),
            properties,
            by_slug,
        }
    }

    pub fn has_property(&self, slug: &str) -> bool {
        self.by_slug.contains_key(slug)
    }

    pub fn property_by_slug(&self, slug: &str) -> Option<&FormProperty> {
        self.by_slug.get(slug).map(|&idx| &self.properties[idx])
    }

    /// Properties in display order.
    pub fn properties(&self) -> &[FormProperty] {
        &self.properties
    }

    /// Slug → title for every property.
    pub fn property_labels(&self) -> BTreeMap<String, String> {
        self.properties
            .iter()
            .map(|p| (p.slug.clone(), p.title.clone()))
            .collect()
    }

    /// Create a new, unsaved form bound to this template.
    pub fn create_form(self: &Arc<Self>, user_id: Option<DbId>) -> Form {
        Form::new(Arc::clone(self), user_id)
    }
}
