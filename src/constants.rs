// src/constants.rs

//! Fixed names, defaults and formats used across the crate.

/// The interpreter used to run executor scripts when nothing else is configured.
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Directory suffix of the binary when it is run from its nested build location.
/// The repository root sits two levels above it.
pub const NESTED_BINARY_SUFFIX: &str = "cmd/virtbench";

/// Directory suffix of the binary when it is installed under a `bin/` folder.
/// The repository root sits one level above it.
pub const BIN_SUFFIX: &str = "bin";

/// Environment variable carrying the cluster-access credential path.
pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

/// Environment variable that overrides the executor interpreter.
pub const INTERPRETER_ENV: &str = "VIRTBENCH_PYTHON";

/// Environment variable that points at an explicit settings file.
pub const CONFIG_PATH_ENV: &str = "VIRTBENCH_CONFIG";

/// Name of the directory holding virtbench settings (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "virtbench";

/// Name of the optional settings file.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Log verbosity forwarded to executors when none is configured.
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Log verbosities accepted by every executor script.
pub const LOG_LEVELS: &[&str] = &["DEBUG", "INFO", "WARNING", "ERROR"];

/// Second-resolution, lexicographically sortable timestamp used in log names.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Width of the `=` rules printed around banners.
pub const BANNER_WIDTH: usize = 80;

/// Exit code used when the executor was interrupted with Ctrl+C.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;
