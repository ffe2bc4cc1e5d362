//! Engine module: compression backends, content reading, job scheduling and the CLI handler

pub mod arg_parser;
pub mod backend;
pub mod handlers;
pub mod jobs;
pub mod reader;
pub mod recorder;
pub mod scheduler;
pub mod tools;

// Re-export commonly used items
pub use arg_parser::Cli;
pub use backend::{CompressionBackend, DefaultBackend};
pub use handlers::handle_run;
pub use jobs::{enumerate_jobs, pending_jobs, track_default_sizes};
pub use reader::{ContentCache, FileContent, FileReader, FsReader};
pub use recorder::{ResultRecorder, SnapshotFn};
pub use scheduler::BoundedScheduler;
pub use tools::{parse_size, path_relative_to, pretty_bytes};
