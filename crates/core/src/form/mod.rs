//! Dynamic form records.
//!
//! A [`Form`] has a handful of native columns and an open set of
//! properties defined by its [`FormTemplate`]. Property values live in a
//! side table and are reached through a [`FormValueStore`]; the form keeps
//! an in-memory map of the values it has touched so each one is fetched at
//! most once.

pub mod presentation;
pub mod record;
pub mod status;
pub mod template;
pub mod validator;
pub mod value;

use async_trait::async_trait;

pub use record::{Form, FormChanges, FormRecord, NATIVE_ATTRIBUTES};
pub use status::FormStatus;
pub use template::{FormProperty, FormTemplate, PropertyKind, DEFAULT_TEMPLATE_ID};
pub use self::validator::{PropertyValidator, ValidatorRule};
pub use value::FormValue;

use crate::error::CoreError;
use crate::types::DbId;

/// Lookup of persisted property values.
#[async_trait]
pub trait FormValueStore: Send + Sync {
    /// The stored value of `property_id` for `form_id`, if a row exists.
    async fn find_value(
        &self,
        form_id: DbId,
        property_id: DbId,
    ) -> Result<Option<FormValue>, CoreError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;

    /// In-memory store that counts lookups.
    #[derive(Default)]
    pub struct MemoryStore {
        rows: Mutex<HashMap<(DbId, DbId), FormValue>>,
        lookups: AtomicUsize,
    }

    impl MemoryStore {
        pub fn insert(&self, id: DbId, form_id: DbId, property_id: DbId, value: &str) {
            self.rows.lock().unwrap().insert(
                (form_id, property_id),
                FormValue::persisted(id, form_id, property_id, Some(value.to_string())),
            );
        }

        pub fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FormValueStore for MemoryStore {
        async fn find_value(
            &self,
            form_id: DbId,
            property_id: DbId,
        ) -> Result<Option<FormValue>, CoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.lock().unwrap().get(&(form_id, property_id)).cloned())
        }
    }

    pub fn property(id: DbId, slug: &str, title: &str) -> FormProperty {
        FormProperty {
            id,
            slug: slug.to_string(),
            title: title.to_string(),
            kind: PropertyKind::String,
            required: false,
            default_value: None,
            sort_order: id as i32,
            validators: Vec::new(),
        }
    }

    pub fn required(property_id: DbId, validator_id: DbId, priority: i32) -> PropertyValidator {
        PropertyValidator {
            id: validator_id,
            property_id,
            title: Some("Test required validator".to_string()),
            priority,
            rule: ValidatorRule::from_parts("required", &json!({"skipOnError": false})).unwrap(),
        }
    }

    /// Template with `last_name` (1), `first_name` (2), `middle_name` (3)
    /// and a file property `self_photo_file` (4).
    pub fn template() -> Arc<FormTemplate> {
        let mut photo = property(4, "self_photo_file", "Photo");
        photo.kind = PropertyKind::File;
        Arc::new(FormTemplate::new(
            DEFAULT_TEMPLATE_ID,
            "Default",
            vec![
                property(1, "last_name", "Last name"),
                property(2, "first_name", "First name"),
                property(3, "middle_name", "Middle name"),
                photo,
            ],
        ))
    }

    pub fn template_with(properties: Vec<FormProperty>) -> Arc<FormTemplate> {
        Arc::new(FormTemplate::new(DEFAULT_TEMPLATE_ID, "Default", properties))
    }
}
