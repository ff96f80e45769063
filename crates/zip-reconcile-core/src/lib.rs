pub mod config;
pub mod engine;
pub mod error;
pub mod hasher;
pub mod identity;
pub mod merge;
pub mod model;
pub mod progress;
pub mod reader;
pub mod report;
pub mod resolver;
pub mod response;

pub use config::AppConfig;
pub use engine::{ArchiveInput, ReconcileEngine, ReconcileResult};
pub use error::Error;
pub use model::{ArchiveListing, FileEntry, Origin};
pub use progress::{ProgressReporter, SilentReporter};
pub use report::Summary;
pub use response::{CompareResponse, ErrorResponse};
