mod allowlist;
mod documents;
mod messages;

pub use allowlist::AllowlistCommands;
pub use documents::DocumentCommands;
pub use messages::MessageCommands;
