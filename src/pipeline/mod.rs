//! Sizing pipeline: directory workers expand the tree into a work queue and a result channel, a
//! single aggregator measures files, and a termination coordinator decides when it is all over.
//!
//! ```text
//!            +-------- subdirs --------+
//!            v                         |
//! root -> [work queue] -> N x DirWorker --files--> [result channel] -> aggregator -> SizeResult
//!                              |                                         |
//!                              +------- Termination (counters + gate) ---+
//! ```

pub mod context;
pub mod error_handler;
pub mod metadata;
pub mod orchestrator;
pub mod termination;
pub mod walk;

pub use context::{PipelineChannels, PipelineState, create_pipeline_channels};
pub use error_handler::FirstError;
pub use metadata::file_aggregator_loop;
pub use orchestrator::Sizer;
pub use termination::{FinishOnPanic, Outcome, Termination};
pub use walk::DirWorker;
