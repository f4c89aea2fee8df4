// Core
pub mod actions;
pub mod engine;
pub mod interaction;

pub use actions::Action;
pub use engine::{MoveFallback, OperationEngine, DEFAULT_BUFFER_SIZE};
pub use interaction::{
    CancelFlag, CancelSignal, Collaborators, NoProgress, OverwriteDecision, ProgressSink,
    UserPrompt,
};
