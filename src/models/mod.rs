// Data Models
pub mod file_entry;
pub mod operation;
pub mod snapshot;

pub use file_entry::{Entry, FileAttributes, RawEntry};
pub use operation::{EntryOutcome, JobReport, JobState, OperationJob, OperationKind, OverwritePolicy};
pub use snapshot::{DirectorySnapshot, Navigation};
