//! Assetbuild - Library for fanning out and running per-asset build jobs
//!
//! This library provides functionality to:
//! - Turn asset build requests into one job per target platform
//! - Run compile or copy jobs against a shared artifact cache
//! - Report a typed outcome for every dispatched job
//! - Stop a batch cooperatively without losing outcome reports

pub mod cli;
pub mod compiler;
pub mod config;
pub mod jobs;
pub mod store;
