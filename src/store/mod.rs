pub mod effects;
pub use effects::*;

pub mod rules;
pub use rules::*;

pub mod store;
pub use store::*;
