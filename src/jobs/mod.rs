//! Build job pipeline module for assetbuild
//!
//! Provides the core pipeline for turning source script assets into
//! per-platform build jobs and typed outcomes.
//!
//! # Overview
//!
//! The pipeline consists of:
//! - **Creation**: Fan a source asset out into one job per enabled
//!   platform, using the worker's capability table
//! - **Execution**: Run each job to a terminal outcome, compiling through
//!   the asset compiler or copying the source bytes
//! - **Reporting**: Aggregate exactly one outcome per dispatched job into
//!   a batch response
//!
//! # Example
//!
//! ```ignore
//! use assetbuild::jobs::{JobDispatcher, JobExecutor, JobPolicy, JobRequest, NullProgress, ShutdownGate};
//!
//! let policy = JobPolicy::from_config(&config);
//! let request = JobRequest::new("assets/walk.lua", platforms);
//! let jobs = policy.create_jobs(&request);
//!
//! let executor = JobExecutor::new(compiler, store, gate);
//! let response = JobDispatcher::new(executor).dispatch(&jobs, &NullProgress::new());
//! println!("{}", response.summary());
//! ```

pub mod descriptor;
pub mod dispatch;
pub mod executor;
pub mod outcome;
pub mod policy;
pub mod product;
pub mod progress;
pub mod report;
pub mod shutdown;

pub use descriptor::*;
pub use dispatch::*;
pub use executor::*;
pub use outcome::*;
pub use policy::*;
pub use product::*;
pub use progress::*;
pub use report::*;
pub use shutdown::*;
