//! Structured (JSON) output from a model that only returns free text.
//!
//! [`extract_json`] finds the JSON span in a reply; [`StructuredClient`] drives
//! the model, parses and validates the span, and reprompts with the schema and
//! the rejected reply when anything is wrong.

mod extract;
mod repair;

pub use extract::extract_json;
pub use repair::StructuredClient;

/// Structural checks applied after a reply parses as the target type.
///
/// A violation is reported as a message and routed into the same repair
/// cycle as a parse failure.
pub trait Validate {
    fn validate(&self) -> std::result::Result<(), String>;
}

impl Validate for serde_json::Value {
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}
