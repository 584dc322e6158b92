// src/core/mod.rs

//! Root and file resolution, argument marshalling and log naming.

pub mod log_name;
pub mod marshal;
pub mod paths;
