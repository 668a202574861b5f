//! Entity structs for all stored PMO objects.

mod chunk;
mod document;
mod email;

pub use chunk::Chunk;
pub use document::Document;
pub use email::{AllowedSender, ProcessedMessage, normalize_address};
