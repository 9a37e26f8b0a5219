pub mod builder;
pub mod engine;
pub mod system;

pub use builder::{ComposedPrompt, PromptComposer, PromptKind};
pub use engine::TeraEngine;
