pub mod command;
pub mod runtime;
pub mod snapshot;

pub use command::Command;
pub use runtime::{Engine, EngineHandle};
pub use snapshot::SeriesSnapshot;
