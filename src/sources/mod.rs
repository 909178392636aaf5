pub mod replay;
pub use replay::*;

pub mod scripted;
pub use scripted::*;

pub mod source;
pub use source::*;

pub mod strategy;
pub use strategy::*;
