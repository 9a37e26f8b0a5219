#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod community;
pub mod config;
pub mod error;
pub mod form;
pub mod gateway;
pub mod history;
pub mod prompt;
pub mod providers;
pub mod session;
pub mod templates;
pub mod usage;

pub use config::Config;
pub use error::{EngineError, ReportError, SessionError, TemplateError};
pub use history::ArtifactKind;
pub use session::ReportSession;
