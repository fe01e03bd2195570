mod action;
mod backend;
mod event;
mod message;
mod persona;
mod prompt;
mod role;
mod settings;

pub use action::*;
pub use backend::*;
pub use event::*;
pub use message::*;
pub use persona::*;
pub use prompt::*;
pub use role::*;
pub use settings::*;
