//! # System Interaction Layer
//!
//! This module is the boundary between workload logic and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: Locates a workload's executor script under the repository root,
//!   launches it through a pluggable [`executor::Spawner`] with the parent's streams
//!   (or captured ones, in tests), and maps its exit status to a result.

pub mod executor;
