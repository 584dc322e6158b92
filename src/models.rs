// src/models.rs

//! Plain data shared by every layer: executor configuration values and the
//! static schema that describes each workload's flags.

use std::collections::BTreeMap;

// --- CONFIGURATION VALUES ---

/// A single typed value destined for the executor's command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// Emitted as `--flag value` when non-empty.
    Text(String),
    /// Emitted as `--flag N` when strictly positive.
    Integer(i64),
    /// Emitted as a bare `--flag` when `true`.
    Boolean(bool),
    /// Emitted as one `--flag item` pair per item.
    TextList(Vec<String>),
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(value: Vec<String>) -> Self {
        Self::TextList(value)
    }
}

/// Flag name to value mapping built fresh for every workload invocation.
///
/// Flag names are unique; inserting an existing name replaces its value.
/// Iteration order is by flag name, which callers must not rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    entries: BTreeMap<String, ConfigValue>,
}

impl ConfigMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `flag` to `value`, returning the previous value if there was one.
    pub fn insert(
        &mut self,
        flag: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        self.entries.insert(flag.into(), value.into())
    }

    /// The value set for `flag`, if any.
    pub fn get(&self, flag: &str) -> Option<&ConfigValue> {
        self.entries.get(flag)
    }

    /// True when `flag` is set to the boolean `true`.
    pub fn is_enabled(&self, flag: &str) -> bool {
        matches!(self.get(flag), Some(ConfigValue::Boolean(true)))
    }

    /// Iterates over `(flag, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (flag, value) in iter {
            map.insert(flag, value);
        }
        map
    }
}

// --- WORKLOAD SCHEMA ---

/// The kind of a workload flag together with its default, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Free text. `None` means the flag is absent unless the operator sets it.
    Text(Option<&'static str>),
    /// A whole number with its default.
    Integer(i64),
    /// A switch, always `false` unless given.
    Boolean,
    /// Repeatable text flag, empty by default.
    TextList,
    /// A file path relative to the repository root, forwarded as an absolute path.
    RepoFile {
        /// Path used when the flag is not given.
        default: &'static str,
        /// Boolean flag that must be enabled for the file to be required.
        /// `None` means the file must always exist.
        checked_when: Option<&'static str>,
    },
}

/// Declares one command-line flag of a workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    /// Long name, without the leading `--`.
    pub name: &'static str,
    /// Optional single-letter alias.
    pub short: Option<char>,
    /// One-line help shown by `--help`.
    pub help: &'static str,
    /// Value kind and default.
    pub kind: FlagKind,
}

impl FlagSpec {
    /// A text flag with a default value.
    pub const fn text(name: &'static str, default: &'static str, help: &'static str) -> Self {
        Self {
            name,
            short: None,
            help,
            kind: FlagKind::Text(Some(default)),
        }
    }

    /// A text flag that stays unset unless given.
    pub const fn optional_text(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            short: None,
            help,
            kind: FlagKind::Text(None),
        }
    }

    /// An integer flag with a default value.
    pub const fn integer(name: &'static str, default: i64, help: &'static str) -> Self {
        Self {
            name,
            short: None,
            help,
            kind: FlagKind::Integer(default),
        }
    }

    /// A switch that is off unless given.
    pub const fn boolean(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            short: None,
            help,
            kind: FlagKind::Boolean,
        }
    }

    /// A repository file that must exist before the executor starts.
    pub const fn repo_file(name: &'static str, default: &'static str, help: &'static str) -> Self {
        Self {
            name,
            short: None,
            help,
            kind: FlagKind::RepoFile {
                default,
                checked_when: None,
            },
        }
    }

    /// Only requires the file to exist when the `switch` flag is enabled.
    /// Has no effect on flags that are not repository files.
    pub const fn checked_when(mut self, switch: &'static str) -> Self {
        if let FlagKind::RepoFile { default, .. } = self.kind {
            self.kind = FlagKind::RepoFile {
                default,
                checked_when: Some(switch),
            };
        }
        self
    }

    /// Adds a single-letter alias.
    pub const fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }
}

/// A titled set of flags, shown together under one help heading.
#[derive(Debug, Clone, Copy)]
pub struct FlagGroup {
    /// Help heading.
    pub heading: &'static str,
    /// Flags in display order.
    pub flags: &'static [FlagSpec],
}

/// Everything needed to register and run one benchmark workload.
#[derive(Debug, Clone, Copy)]
pub struct WorkloadDescriptor {
    /// Subcommand name, e.g. `datasource-clone`.
    pub name: &'static str,
    /// One-line summary for the command list.
    pub about: &'static str,
    /// Description shown by `virtbench <workload> --help`.
    pub long_about: &'static str,
    /// Usage examples appended to the help text.
    pub examples: &'static str,
    /// Title printed before the executor starts.
    pub banner: &'static str,
    /// Executor script, relative to the repository root.
    pub executor: &'static str,
    /// Prefix of the generated log file name.
    pub log_prefix: &'static str,
    /// Flags, grouped by help heading.
    pub groups: &'static [FlagGroup],
    /// Names of flags that must be supplied on the command line.
    pub required: &'static [&'static str],
}

impl WorkloadDescriptor {
    /// Iterates over every flag of every group, in declaration order.
    pub fn flags(&self) -> impl Iterator<Item = (&'static str, &'static FlagSpec)> {
        self.groups
            .iter()
            .flat_map(|group| group.flags.iter().map(move |flag| (group.heading, flag)))
    }

    /// Looks up a declared flag by name.
    pub fn find_flag(&self, name: &str) -> Option<&'static FlagSpec> {
        self.flags()
            .map(|(_, flag)| flag)
            .find(|flag| flag.name == name)
    }

    /// True when `name` must be supplied on the command line.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static GROUPS: &[FlagGroup] = &[
        FlagGroup {
            heading: "Required",
            flags: &[FlagSpec::optional_text("storage-class", "storage class name")],
        },
        FlagGroup {
            heading: "Execution",
            flags: &[
                FlagSpec::integer("concurrency", 10, "parallelism").with_short('c'),
                FlagSpec::boolean("cleanup", "cleanup afterwards"),
                FlagSpec::repo_file("vm-template", "templates/vm.yaml", "VM template")
                    .checked_when("create-vms"),
            ],
        },
    ];

    fn descriptor() -> WorkloadDescriptor {
        WorkloadDescriptor {
            name: "sample",
            about: "",
            long_about: "",
            examples: "",
            banner: "Sample",
            executor: "sample/run.py",
            log_prefix: "sample",
            groups: GROUPS,
            required: &["storage-class"],
        }
    }

    #[test]
    fn test_config_map_insert_replaces_existing_value() {
        let mut map = ConfigMap::new();
        assert!(map.insert("vms", 5i64).is_none());
        assert_eq!(map.insert("vms", 10i64), Some(ConfigValue::Integer(5)));
        assert_eq!(map.iter().count(), 1);
        assert_eq!(map.get("vms"), Some(&ConfigValue::Integer(10)));
    }

    #[test]
    fn test_config_map_from_iterator() {
        let map: ConfigMap = [("vm-name", "test-vm"), ("vm-memory", "2048M")]
            .into_iter()
            .collect();
        assert_eq!(map.get("vm-name"), Some(&ConfigValue::from("test-vm")));
        assert_eq!(map.get("vm-memory"), Some(&ConfigValue::from("2048M")));
    }

    #[test]
    fn test_descriptor_flag_lookup() {
        let descriptor = descriptor();
        let flags: Vec<_> = descriptor.flags().map(|(_, f)| f.name).collect();
        assert_eq!(flags, vec!["storage-class", "concurrency", "cleanup", "vm-template"]);

        let concurrency = descriptor.find_flag("concurrency").unwrap();
        assert_eq!(concurrency.short, Some('c'));
        assert_eq!(concurrency.kind, FlagKind::Integer(10));
        assert!(descriptor.find_flag("missing").is_none());
        assert!(descriptor.is_required("storage-class"));
        assert!(!descriptor.is_required("cleanup"));
    }

    #[test]
    fn test_checked_when_only_applies_to_repo_files() {
        let template = FlagSpec::repo_file("vm-template", "a.yaml", "").checked_when("create-vms");
        assert_eq!(
            template.kind,
            FlagKind::RepoFile {
                default: "a.yaml",
                checked_when: Some("create-vms"),
            }
        );

        let vms = FlagSpec::integer("vms", 5, "").checked_when("create-vms");
        assert_eq!(vms.kind, FlagKind::Integer(5));
    }

    #[test]
    fn test_is_enabled_requires_boolean_true() {
        let mut map = ConfigMap::new();
        map.insert("create-vms", true);
        map.insert("cleanup", false);
        map.insert("vm-name", "true");

        assert!(map.is_enabled("create-vms"));
        assert!(!map.is_enabled("cleanup"));
        assert!(!map.is_enabled("vm-name"));
        assert!(!map.is_enabled("missing"));
    }
}
