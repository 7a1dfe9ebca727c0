//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or a connection inside a caller's transaction) as the
//! first argument.

pub mod currency_code_repo;
pub mod currency_repo;
pub mod event_repo;
pub mod form_repo;
pub mod form_template_repo;
pub mod form_value_repo;
pub mod sms_notification_repo;
pub mod user_repo;

pub use currency_code_repo::CurrencyCodeRepo;
pub use currency_repo::CurrencyRepo;
pub use event_repo::EventRepo;
pub use form_repo::FormRepo;
pub use form_template_repo::FormTemplateRepo;
pub use form_value_repo::FormValueRepo;
pub use sms_notification_repo::SmsNotificationRepo;
pub use user_repo::UserRepo;
