//! Loads form templates with their properties and validators.

use std::collections::HashMap;

use cabinet_core::form::{FormProperty, FormTemplate, PropertyKind, PropertyValidator, ValidatorRule};
use cabinet_core::types::DbId;
use sqlx::PgPool;

use crate::models::form::{FormPropertyRow, FormTemplateRow, PropertyValidatorRow};

const PROPERTY_COLUMNS: &str =
    "id, template_id, slug, title, kind, is_required, default_value, sort_order";

const VALIDATOR_COLUMNS: &str = "id, property_id, title, class, params, priority";

pub struct FormTemplateRepo;

impl FormTemplateRepo {
    /// Build the template with its ordered properties and validators.
    ///
    /// Returns `None` if the template does not exist. Validators with an
    /// unknown class or malformed params are skipped with a warning, as are
    /// unknown property kinds (read as plain strings).
    pub async fn load(pool: &PgPool, template_id: DbId) -> Result<Option<FormTemplate>, sqlx::Error> {
        let Some(template) = sqlx::query_as::<_, FormTemplateRow>(
            "SELECT id, name FROM form_templates WHERE id = $1",
        )
        .bind(template_id)
        .fetch_optional(pool)
        .await?
        else {
            return Ok(None);
        };

        let query = format!(
            "SELECT {PROPERTY_COLUMNS} FROM form_properties \
             WHERE template_id = $1 \
             ORDER BY sort_order, id"
        );
        let property_rows = sqlx::query_as::<_, FormPropertyRow>(&query)
            .bind(template_id)
            .fetch_all(pool)
            .await?;

        let property_ids: Vec<DbId> = property_rows.iter().map(|p| p.id).collect();
        let query = format!(
            "SELECT {VALIDATOR_COLUMNS} FROM property_validators \
             WHERE property_id = ANY($1) \
             ORDER BY priority, id"
        );
        let validator_rows = sqlx::query_as::<_, PropertyValidatorRow>(&query)
            .bind(&property_ids)
            .fetch_all(pool)
            .await?;

        let mut validators: HashMap<DbId, Vec<PropertyValidator>> = HashMap::new();
        for row in validator_rows {
            match ValidatorRule::from_parts(&row.class, &row.params) {
                Ok(rule) => validators.entry(row.property_id).or_default().push(PropertyValidator {
                    id: row.id,
                    property_id: row.property_id,
                    title: row.title,
                    priority: row.priority,
                    rule,
                }),
                Err(e) => {
                    tracing::warn!(
                        validator_id = row.id,
                        class = %row.class,
                        error = %e,
                        "Skipping unsupported property validator",
                    );
                }
            }
        }

        let properties = property_rows
            .into_iter()
            .map(|row| {
                let kind = row.kind.parse().unwrap_or_else(|_| {
                    tracing::warn!(property_id = row.id, kind = %row.kind, "Unknown property kind");
                    PropertyKind::String
                });
                FormProperty {
                    id: row.id,
                    validators: validators.remove(&row.id).unwrap_or_default(),
                    slug: row.slug,
                    title: row.title,
                    kind,
                    required: row.is_required,
                    default_value: row.default_value,
                    sort_order: row.sort_order,
                }
            })
            .collect();

        tracing::debug!(template_id, "Loaded form template");
        Ok(Some(FormTemplate::new(template.id, template.name, properties)))
    }
}
