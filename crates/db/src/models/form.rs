//! Rows behind forms, their templates and property values.

use cabinet_core::error::CoreError;
use cabinet_core::form::FormRecord;
use cabinet_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `forms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormRow {
    pub id: DbId,
    pub user_id: DbId,
    pub template_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FormRow {
    pub fn into_record(self) -> Result<FormRecord, CoreError> {
        Ok(FormRecord {
            id: self.id,
            user_id: self.user_id,
            template_id: self.template_id,
            status: self.status.parse()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// A row from the `form_values` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormValueRow {
    pub id: DbId,
    pub form_id: DbId,
    pub property_id: DbId,
    pub value: Option<String>,
}

/// A row from the `form_templates` table.
#[derive(Debug, Clone, FromRow)]
pub struct FormTemplateRow {
    pub id: DbId,
    pub name: String,
}

/// A row from the `form_properties` table.
#[derive(Debug, Clone, FromRow)]
pub struct FormPropertyRow {
    pub id: DbId,
    pub template_id: DbId,
    pub slug: String,
    pub title: String,
    pub kind: String,
    pub is_required: bool,
    pub default_value: Option<String>,
    pub sort_order: i32,
}

/// A row from the `property_validators` table.
#[derive(Debug, Clone, FromRow)]
pub struct PropertyValidatorRow {
    pub id: DbId,
    pub property_id: DbId,
    pub title: Option<String>,
    pub class: String,
    pub params: serde_json::Value,
    pub priority: i32,
}
