//! Postgres-backed lookup of form property values.

use async_trait::async_trait;
use cabinet_core::error::CoreError;
use cabinet_core::form::{FormValue, FormValueStore};
use cabinet_core::types::DbId;

use crate::repositories::FormValueRepo;
use crate::DbPool;

/// Reads `form_values` rows for the form overlay.
#[derive(Clone)]
pub struct PgFormValueStore {
    pool: DbPool,
}

impl PgFormValueStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FormValueStore for PgFormValueStore {
    async fn find_value(
        &self,
        form_id: DbId,
        property_id: DbId,
    ) -> Result<Option<FormValue>, CoreError> {
        let row = FormValueRepo::find(&self.pool, form_id, property_id)
            .await
            .map_err(|e| CoreError::Internal(format!("Form value lookup failed: {e}")))?;
        Ok(row.map(|r| FormValue::persisted(r.id, r.form_id, r.property_id, r.value)))
    }
}
