//! Integration tests for form persistence through the property overlay.

use std::sync::Arc;

use assert_matches::assert_matches;
use cabinet_core::form::{Form, FormStatus, FormTemplate, DEFAULT_TEMPLATE_ID};
use cabinet_db::models::user::{CreateUser, User};
use cabinet_db::repositories::{FormRepo, FormTemplateRepo, FormValueRepo, UserRepo};
use cabinet_db::PgFormValueStore;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
            role: "user".to_string(),
        },
    )
    .await
    .unwrap()
}

async fn template(pool: &PgPool) -> Arc<FormTemplate> {
    Arc::new(
        FormTemplateRepo::load(pool, DEFAULT_TEMPLATE_ID)
            .await
            .unwrap()
            .expect("default template is seeded"),
    )
}

async fn reload(pool: &PgPool, id: i64) -> Form {
    let row = FormRepo::find_by_id(pool, id).await.unwrap().unwrap();
    Form::restore(template(pool).await, row.into_record().unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Template loading
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn default_template_loads_ordered_properties(pool: PgPool) {
    let template = template(&pool).await;

    let slugs: Vec<&str> = template.properties().iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs[..3], ["last_name", "first_name", "middle_name"]);
    assert!(template.property_by_slug("last_name").unwrap().is_required());
    assert!(template.property_by_slug("self_photo_file").unwrap().is_file());
    assert!(FormTemplateRepo::load(&pool, 999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_validator_classes_are_skipped(pool: PgPool) {
    sqlx::query(
        "INSERT INTO property_validators (property_id, class, params, priority) \
         VALUES (3, 'captcha', '{}', 5)",
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO property_validators (property_id, class, params, priority) \
         VALUES (3, 'match', '{\"pattern\": \"(unclosed\"}', 6)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let template = template(&pool).await;
    let middle = template.property_by_slug("middle_name").unwrap();
    assert_eq!(middle.validators.len(), 1, "bad class and bad pattern are both dropped");
    assert_eq!(middle.validators[0].rule.class(), "string");
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_written_properties_get_rows(pool: PgPool) {
    let user = create_user(&pool, "bayer.hudson").await;
    let store = PgFormValueStore::new(pool.clone());
    let mut form = template(&pool).await.create_form(Some(user.id));

    form.set(&store, "last_name", json!("Bayer")).await.unwrap();
    form.set(&store, "first_name", json!("Hudson")).await.unwrap();
    form.get(&store, "middle_name").await.unwrap();
    assert!(form.validate(&store, None).await.unwrap());

    let row = FormRepo::save(&pool, &mut form).await.unwrap();

    let values = FormValueRepo::list_for_form(&pool, row.id).await.unwrap();
    assert_eq!(values.len(), 2, "untouched properties must not be stored");
    assert_eq!(form.id(), Some(row.id));
    assert!(form.changes().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn required_default_is_stored_and_survives_reload(pool: PgPool) {
    sqlx::query(
        "UPDATE form_properties SET is_required = true, default_value = 'Ivanovich' \
         WHERE slug = 'middle_name'",
    )
    .execute(&pool)
    .await
    .unwrap();

    let user = create_user(&pool, "defaulted").await;
    let store = PgFormValueStore::new(pool.clone());
    let mut form = template(&pool).await.create_form(Some(user.id));
    form.set(&store, "last_name", json!("Bayer")).await.unwrap();
    form.set(&store, "first_name", json!("Hudson")).await.unwrap();

    assert_eq!(form.get(&store, "middle_name").await.unwrap(), json!("Ivanovich"));
    assert!(form.validate(&store, None).await.unwrap());
    let row = FormRepo::save(&pool, &mut form).await.unwrap();

    let stored = FormValueRepo::find(&pool, row.id, 3).await.unwrap().unwrap();
    assert_eq!(stored.value.as_deref(), Some("Ivanovich"));
    let mut loaded = reload(&pool, row.id).await;
    assert_eq!(loaded.get(&store, "middle_name").await.unwrap(), json!("Ivanovich"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stored_values_load_lazily(pool: PgPool) {
    let user = create_user(&pool, "reader").await;
    let store = PgFormValueStore::new(pool.clone());
    let mut form = template(&pool).await.create_form(Some(user.id));
    form.set(&store, "last_name", json!("Bayer")).await.unwrap();
    let row = FormRepo::save(&pool, &mut form).await.unwrap();

    let mut loaded = reload(&pool, row.id).await;

    assert_eq!(loaded.get(&store, "last_name").await.unwrap(), json!("Bayer"));
    assert_eq!(loaded.get(&store, "first_name").await.unwrap(), json!(null));
    assert_eq!(loaded.get(&store, "status").await.unwrap(), json!("draft"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unset_deletes_row_only_on_save(pool: PgPool) {
    let user = create_user(&pool, "unsetter").await;
    let store = PgFormValueStore::new(pool.clone());
    let mut form = template(&pool).await.create_form(Some(user.id));
    form.set(&store, "last_name", json!("Bayer")).await.unwrap();
    let row = FormRepo::save(&pool, &mut form).await.unwrap();

    let mut loaded = reload(&pool, row.id).await;
    loaded.get(&store, "last_name").await.unwrap();
    loaded.unset("last_name").unwrap();

    assert_eq!(loaded.get(&store, "last_name").await.unwrap(), json!(null));
    assert!(FormValueRepo::find(&pool, row.id, 1).await.unwrap().is_some());

    FormRepo::save(&pool, &mut loaded).await.unwrap();
    assert!(FormValueRepo::find(&pool, row.id, 1).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_keeps_one_row_per_property(pool: PgPool) {
    let user = create_user(&pool, "updater").await;
    let store = PgFormValueStore::new(pool.clone());
    let mut form = template(&pool).await.create_form(Some(user.id));
    form.set(&store, "last_name", json!("Bayer")).await.unwrap();
    let row = FormRepo::save(&pool, &mut form).await.unwrap();

    form.set(&store, "last_name", json!("Hudson")).await.unwrap();
    form.set_status(FormStatus::Submitted);
    FormRepo::save(&pool, &mut form).await.unwrap();

    let values = FormValueRepo::list_for_form(&pool, row.id).await.unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].value.as_deref(), Some("Hudson"));
    let stored = FormRepo::find_by_id(&pool, row.id).await.unwrap().unwrap();
    assert_eq!(stored.status, "submitted");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn one_form_per_user(pool: PgPool) {
    let user = create_user(&pool, "twice").await;
    let template = template(&pool).await;

    FormRepo::save(&pool, &mut template.create_form(Some(user.id))).await.unwrap();
    let err = FormRepo::save(&pool, &mut template.create_form(Some(user.id)))
        .await
        .unwrap_err();

    assert_matches!(
        err,
        sqlx::Error::Database(ref db) if db.constraint() == Some("uq_forms_user_id")
    );
    assert!(FormRepo::find_by_user(&pool, user.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_form_removes_its_values(pool: PgPool) {
    let user = create_user(&pool, "leaver").await;
    let store = PgFormValueStore::new(pool.clone());
    let mut form = template(&pool).await.create_form(Some(user.id));
    form.set(&store, "last_name", json!("Bayer")).await.unwrap();
    let row = FormRepo::save(&pool, &mut form).await.unwrap();

    assert!(FormRepo::delete(&pool, row.id).await.unwrap());
    assert!(FormRepo::find_by_id(&pool, row.id).await.unwrap().is_none());
    assert!(FormValueRepo::list_for_form(&pool, row.id).await.unwrap().is_empty());
    assert!(!FormRepo::delete(&pool, row.id).await.unwrap());
}
