//! `virtbench` runs KubeVirt benchmark workloads.
//!
//! Each workload is a static descriptor. The command line is built from the
//! descriptors, parsed values are marshalled into flags, and the workload's
//! executor script is launched from the repository root.

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
pub mod workloads;
