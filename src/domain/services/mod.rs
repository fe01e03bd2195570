pub mod clipboard;
pub mod events;
mod exports;
mod gallery;
mod session;
mod settings_store;
mod transcript_store;

pub use exports::*;
pub use gallery::*;
pub use session::*;
pub use settings_store::*;
pub use transcript_store::*;
