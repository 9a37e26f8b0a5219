pub mod snapshot;
pub mod state;

pub use snapshot::{NOT_AVAILABLE, serialize};
pub use state::{
    FormState, OutputLength, Perspective, ReportSettings, Salutation, StudentForm, Tone, Trimester,
};
