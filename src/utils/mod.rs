// Utilities
pub mod error;
pub mod formatter;
pub mod path;
pub mod pattern;

pub use error::{IgcError, Result};
pub use path::DriveId;
