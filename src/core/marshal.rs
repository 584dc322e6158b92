// src/core/marshal.rs

//! Turns a [`ConfigMap`] into executor command-line arguments.

use crate::models::{ConfigMap, ConfigValue};

/// Flattens a configuration map into the argument vector understood by executors.
///
/// # Emission rules
/// - `Text`: `--flag value`, only when the text is non-empty.
/// - `Integer`: `--flag N`, only when `N` is strictly positive.
/// - `Boolean`: a bare `--flag`, only when `true`.
/// - `TextList`: `--flag item` once per item, in item order.
///
/// Anything else emits nothing. The function never fails.
pub fn marshal(config: &ConfigMap) -> Vec<String> {
    let mut args = Vec::new();
    for (flag, value) in config.iter() {
        emit(&mut args, flag, value);
    }
    args
}

fn emit(args: &mut Vec<String>, flag: &str, value: &ConfigValue) {
    match value {
        ConfigValue::Text(text) => {
            if !text.is_empty() {
                args.push(format!("--{}", flag));
                args.push(text.clone());
            }
        }
        ConfigValue::Integer(number) => {
            if *number > 0 {
                args.push(format!("--{}", flag));
                args.push(number.to_string());
            }
        }
        ConfigValue::Boolean(enabled) => {
            if *enabled {
                args.push(format!("--{}", flag));
            }
        }
        ConfigValue::TextList(items) => {
            for item in items {
                args.push(format!("--{}", flag));
                args.push(item.clone());
            }
        }
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;

    // --- Helper: split an argument vector into `--flag [value]` groups ---
    fn groups(args: &[String]) -> Vec<Vec<String>> {
        let mut out: Vec<Vec<String>> = Vec::new();
        for token in args {
            if token.starts_with("--") {
                out.push(vec![token.clone()]);
            } else {
                out.last_mut().unwrap().push(token.clone());
            }
        }
        out.sort();
        out
    }

    fn group(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_text_emits_flag_and_value() {
        let config: ConfigMap = [("storage-class", "fada-raw-sc")].into_iter().collect();
        assert_eq!(marshal(&config), vec!["--storage-class", "fada-raw-sc"]);
    }

    #[test]
    fn test_integer_emits_decimal_value() {
        let config: ConfigMap = [("vms", 50i64)].into_iter().collect();
        assert_eq!(marshal(&config), vec!["--vms", "50"]);
    }

    #[test]
    fn test_true_boolean_emits_bare_flag() {
        let config: ConfigMap = [("cleanup", true)].into_iter().collect();
        assert_eq!(marshal(&config), vec!["--cleanup"]);
    }

    #[test]
    fn test_list_repeats_flag_per_item_in_order() {
        let mut config = ConfigMap::new();
        config.insert(
            "node",
            vec!["worker-2".to_string(), "worker-1".to_string(), "worker-3".to_string()],
        );
        assert_eq!(
            marshal(&config),
            vec!["--node", "worker-2", "--node", "worker-1", "--node", "worker-3"]
        );
    }

    #[test]
    fn test_zero_values_are_never_emitted() {
        let mut config = ConfigMap::new();
        config.insert("log-file", "");
        config.insert("vms", 0i64);
        config.insert("namespaces", -3i64);
        config.insert("cleanup", false);
        config.insert("node", Vec::<String>::new());
        assert!(marshal(&config).is_empty());
    }

    #[test]
    fn test_empty_map_yields_empty_vector() {
        assert!(marshal(&ConfigMap::new()).is_empty());
    }

    #[test]
    fn test_mixed_config_emits_every_group_exactly_once() {
        let mut config = ConfigMap::new();
        config.insert("storage-class", "sc");
        config.insert("vms", 20i64);
        config.insert("vm-cpu-cores", 0i64);
        config.insert("cleanup", true);
        config.insert("cleanup-only", false);
        config.insert("node", vec!["a".to_string(), "b".to_string()]);

        let args = marshal(&config);
        assert_eq!(args.len(), 2 + 2 + 1 + 4);
        assert_eq!(
            groups(&args),
            vec![
                group(&["--cleanup"]),
                group(&["--node", "a"]),
                group(&["--node", "b"]),
                group(&["--storage-class", "sc"]),
                group(&["--vms", "20"]),
            ]
        );
    }

    #[test]
    fn test_marshalling_twice_yields_same_groups() {
        let mut config = ConfigMap::new();
        config.insert("datasource-name", "rhel9");
        config.insert("poll-interval", 5i64);
        config.insert("yes", true);

        assert_eq!(groups(&marshal(&config)), groups(&marshal(&config)));
    }

    #[test]
    fn test_value_token_follows_its_flag() {
        let mut config = ConfigMap::new();
        config.insert("vm-memory", "2048M");
        config.insert("concurrency", 10i64);

        let args = marshal(&config);
        let memory = args.iter().position(|a| a == "--vm-memory").unwrap();
        assert_eq!(args[memory + 1], "2048M");
        let concurrency = args.iter().position(|a| a == "--concurrency").unwrap();
        assert_eq!(args[concurrency + 1], "10");
    }
}
