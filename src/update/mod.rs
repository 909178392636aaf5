pub mod command;
pub use command::*;

pub mod message;
pub use message::*;

pub mod reducer;
pub use reducer::*;
