//! Envelope de argumentos y metadatos de tipo.

mod envelope;
mod type_tag;

pub use envelope::{Args, ArgsMismatch, ArgsSummary, Payload};
pub use type_tag::{InputKind, TypeTag};
