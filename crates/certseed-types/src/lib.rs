#![forbid(unsafe_code)]
#![doc = "Shared model types for certseed: errors and timestamps."]

mod error;
mod timestamp;

pub use error::ModelError;
pub use timestamp::Timestamp;
