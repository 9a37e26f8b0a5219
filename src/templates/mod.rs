pub mod defaults;
pub mod registry;
pub mod store;
mod transfer;
pub mod types;

pub use defaults::{DEFAULT_TEMPLATE_ID, LANGUAGES};
pub use registry::{SubscriptionId, TemplateEvent, TemplateObserver, TemplateRegistry};
pub use store::{JsonFileTemplateStore, MemoryTemplateStore, StoredTemplates, TemplateStore};
pub use types::{RatingField, Template, TemplateStats, rating_field_id};
