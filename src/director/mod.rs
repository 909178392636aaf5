pub mod director;
pub use director::*;

pub mod playback;
pub use playback::*;
