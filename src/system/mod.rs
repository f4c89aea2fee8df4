// System Layer
pub mod filesystem;
pub mod memory;

pub use filesystem::{FileSystem, LocalFileSystem};
pub use memory::{MemoryFileSystem, RenameFault};
