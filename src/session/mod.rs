pub mod descriptor;
pub use descriptor::*;

pub mod record;
pub use record::*;
