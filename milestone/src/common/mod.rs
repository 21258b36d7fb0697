mod constants;
mod lock;

pub use constants::*;
pub use lock::*;
