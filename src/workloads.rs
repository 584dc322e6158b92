// src/workloads.rs

//! The benchmark workloads known to `virtbench`.
//!
//! Each workload is pure data. Adding a benchmark means adding a descriptor to
//! [`WORKLOADS`]; registration, parsing and dispatch are generic.

use crate::models::{FlagGroup, FlagSpec, WorkloadDescriptor};

// --- Shared flag groups ---

const STORAGE_CLASS: FlagGroup = FlagGroup {
    heading: "Required",
    flags: &[FlagSpec::optional_text("storage-class", "Storage class name")],
};

const VM_TEMPLATE: FlagGroup = FlagGroup {
    heading: "VM template",
    flags: &[
        FlagSpec::text("vm-name", "test-vm", "VM name prefix"),
        FlagSpec::text("datasource-name", "rhel9", "DataSource name"),
        FlagSpec::text(
            "datasource-namespace",
            "openshift-virtualization-os-images",
            "DataSource namespace",
        ),
        FlagSpec::text("storage-size", "30Gi", "Storage size for the VM disk"),
        FlagSpec::text("vm-memory", "2048M", "VM memory"),
        FlagSpec::integer("vm-cpu-cores", 1, "Number of CPU cores"),
    ],
};

const EXECUTION: FlagGroup = FlagGroup {
    heading: "Execution",
    flags: &[
        FlagSpec::integer("concurrency", 10, "Number of concurrent operations").with_short('c'),
        FlagSpec::integer("poll-interval", 5, "Polling interval in seconds"),
    ],
};

const CLEANUP: FlagGroup = FlagGroup {
    heading: "Cleanup",
    flags: &[
        FlagSpec::boolean("cleanup", "Clean up resources after the test"),
        FlagSpec::boolean("cleanup-only", "Only clean up resources from a previous run"),
    ],
};

/// VM template shipped with the suite, relative to the repository root.
const DEFAULT_VM_TEMPLATE: &str = "examples/vm-templates/rhel9-vm-datasource.yaml";

// --- Workloads ---

/// VM creation time when cloning from a DataSource.
pub const DATASOURCE_CLONE: WorkloadDescriptor = WorkloadDescriptor {
    name: "datasource-clone",
    about: "Run DataSource clone benchmark",
    long_about: "Benchmark VM creation time from DataSource cloning.

This workload tests the performance of creating VMs by cloning from a DataSource,
which is the recommended approach for VM provisioning in KubeVirt.",
    examples: "Examples:
  # Run with 50 VMs across 10 namespaces
  virtbench datasource-clone --storage-class fada-raw-sc --vms 50 --namespaces 10

  # Run with custom DataSource
  virtbench datasource-clone --storage-class fada-raw-sc --datasource-name rhel9 --datasource-namespace openshift-virtualization-os-images

  # Run with cleanup after test
  virtbench datasource-clone --storage-class fada-raw-sc --vms 20 --cleanup",
    banner: "DataSource Clone Benchmark",
    executor: "datasource-clone/measure-vm-creation-time.py",
    log_prefix: "datasource-clone",
    groups: &[
        STORAGE_CLASS,
        FlagGroup {
            heading: "Test configuration",
            flags: &[
                FlagSpec::integer("vms", 50, "Number of VMs to create"),
                FlagSpec::integer("namespaces", 10, "Number of namespaces to create"),
                FlagSpec::text("namespace-prefix", "datasource-clone", "Namespace prefix"),
            ],
        },
        VM_TEMPLATE,
        EXECUTION,
        CLEANUP,
    ],
    required: &["storage-class"],
};

/// Live migration time between nodes.
pub const MIGRATION: WorkloadDescriptor = WorkloadDescriptor {
    name: "migration",
    about: "Run VM migration benchmark",
    long_about: "Benchmark VM live migration performance.

This workload tests the performance of live migrating VMs between nodes,
measuring migration time, downtime, and throughput.",
    examples: "Examples:
  # Run migration test with 10 namespaces
  virtbench migration --storage-class fada-raw-sc --namespaces 10

  # Run with custom VM name
  virtbench migration --storage-class fada-raw-sc --vm-name rhel-9-vm --namespaces 5

  # Migrate every VM off worker-1 in parallel
  virtbench migration --storage-class fada-raw-sc --source-node worker-1 --parallel

  # Create VMs first, then migrate namespaces 1-5
  virtbench migration --storage-class fada-raw-sc --start 1 --end 5 --create-vms

  # Run with cleanup after test
  virtbench migration --storage-class fada-raw-sc --namespaces 10 --cleanup",
    banner: "VM Migration Benchmark",
    executor: "migration/measure-vm-migration-time.py",
    log_prefix: "migration",
    groups: &[
        STORAGE_CLASS,
        FlagGroup {
            heading: "Test configuration",
            flags: &[
                FlagSpec::integer("namespaces", 10, "Number of namespaces to create"),
                FlagSpec::text("namespace-prefix", "migration-test", "Namespace prefix"),
                FlagSpec::integer("start", 1, "Start index for test namespaces").with_short('s'),
                FlagSpec::integer("end", 10, "End index for test namespaces").with_short('e'),
            ],
        },
        VM_TEMPLATE,
        FlagGroup {
            heading: "VM creation",
            flags: &[
                FlagSpec::boolean("create-vms", "Create VMs before migrating them"),
                FlagSpec::repo_file("vm-template", DEFAULT_VM_TEMPLATE, "Path to the VM template YAML")
                    .checked_when("create-vms"),
            ],
        },
        FlagGroup {
            heading: "Migration",
            flags: &[
                FlagSpec::optional_text("source-node", "Node to migrate VMs from"),
                FlagSpec::optional_text("target-node", "Node to migrate VMs to"),
                FlagSpec::boolean("parallel", "Migrate all VMs in parallel"),
                FlagSpec::boolean("evacuate", "Evacuate all VMs from the source node"),
                FlagSpec::integer("migration-timeout", 600, "Timeout for a migration in seconds"),
            ],
        },
        EXECUTION,
        FlagGroup {
            heading: "Results",
            flags: &[
                FlagSpec::boolean("save-results", "Save detailed results to the results folder"),
                FlagSpec::text("results-folder", "../results", "Base directory for test results"),
                FlagSpec::optional_text("storage-version", "Storage version to include in the results path"),
            ],
        },
        FlagGroup {
            heading: "Cleanup",
            flags: &[
                FlagSpec::boolean("cleanup", "Clean up resources after the test"),
                FlagSpec::boolean("cleanup-only", "Only clean up resources from a previous run"),
                FlagSpec::boolean("yes", "Skip confirmation prompts").with_short('y'),
            ],
        },
    ],
    required: &["storage-class"],
};

/// Iterative VM creation until the cluster runs out of capacity.
pub const CAPACITY_BENCHMARK: WorkloadDescriptor = WorkloadDescriptor {
    name: "capacity-benchmark",
    about: "Run capacity benchmark",
    long_about: "Benchmark cluster capacity.

This workload tests cluster capacity by iteratively creating VMs until
resource limits are reached or the maximum number of iterations is hit.",
    examples: "Examples:
  # Run capacity test with 5 VMs per iteration
  virtbench capacity-benchmark --storage-class fada-raw-sc --vms 5

  # Run with custom max iterations
  virtbench capacity-benchmark --storage-class fada-raw-sc --vms 5 --max-iterations 20

  # Run with cleanup after test
  virtbench capacity-benchmark --storage-class fada-raw-sc --vms 5 --cleanup",
    banner: "Capacity Benchmark",
    executor: "capacity-benchmark/measure-capacity.py",
    log_prefix: "capacity-benchmark",
    groups: &[
        STORAGE_CLASS,
        FlagGroup {
            heading: "Test configuration",
            flags: &[
                FlagSpec::integer("vms", 5, "Number of VMs to create per iteration"),
                FlagSpec::integer("max-iterations", 10, "Maximum number of iterations"),
                FlagSpec::text("namespace-prefix", "capacity-test", "Namespace prefix"),
                FlagSpec::repo_file("vm-template", DEFAULT_VM_TEMPLATE, "Path to the VM template YAML"),
            ],
        },
        EXECUTION,
        FlagGroup {
            heading: "Connectivity",
            flags: &[
                FlagSpec::integer("ping-timeout", 300, "Timeout for ping tests in seconds"),
                FlagSpec::text("ssh-pod", "ssh-test-pod", "Pod name for ping tests"),
                FlagSpec::text("ssh-pod-ns", "default", "Namespace of the SSH test pod"),
            ],
        },
        FlagGroup {
            heading: "Results",
            flags: &[
                FlagSpec::boolean("save-results", "Save detailed results to the results folder"),
                FlagSpec::text("results-folder", "../results", "Base directory for test results"),
                FlagSpec::optional_text("px-version", "Portworx version (auto-detected if omitted)"),
                FlagSpec::text("px-namespace", "portworx", "Portworx namespace"),
            ],
        },
        FlagGroup {
            heading: "Cleanup",
            flags: &[
                FlagSpec::boolean("cleanup", "Clean up resources after the test"),
                FlagSpec::boolean("yes", "Skip confirmation prompts").with_short('y'),
            ],
        },
    ],
    required: &["storage-class"],
};

/// Recovery time of VMs after a node failure.
pub const FAILURE_RECOVERY: WorkloadDescriptor = WorkloadDescriptor {
    name: "failure-recovery",
    about: "Run VM failure recovery benchmark",
    long_about: "Benchmark VM recovery time after a node failure.

This workload monitors VMI state transitions and network connectivity
restoration after a node failure has been triggered.",
    examples: "Examples:
  # Monitor recovery for VMs in namespaces 1-60
  virtbench failure-recovery --start 1 --end 60 --vm-name rhel-9-vm --ssh-pod ssh-test-pod --ssh-pod-ns default",
    banner: "Failure Recovery Benchmark",
    executor: "failure-recovery/measure-recovery-time.py",
    log_prefix: "failure-recovery",
    groups: &[
        FlagGroup {
            heading: "Required",
            flags: &[
                FlagSpec::optional_text("vm-name", "VMI resource name to monitor"),
                FlagSpec::optional_text("ssh-pod", "Pod name for ping tests"),
                FlagSpec::optional_text("ssh-pod-ns", "Namespace of the SSH pod"),
            ],
        },
        FlagGroup {
            heading: "Test configuration",
            flags: &[
                FlagSpec::integer("start", 1, "Start namespace index").with_short('s'),
                FlagSpec::integer("end", 5, "End namespace index, inclusive").with_short('e'),
                FlagSpec::text("namespace-prefix", "kubevirt-perf-test", "Namespace prefix"),
            ],
        },
        FlagGroup {
            heading: "Execution",
            flags: &[
                FlagSpec::integer("concurrency", 10, "Max parallel monitoring threads").with_short('c'),
                FlagSpec::integer("poll-interval", 1, "Seconds between status checks"),
            ],
        },
    ],
    required: &["vm-name", "ssh-pod", "ssh-pod-ns"],
};

/// Every registered workload, in the order they appear in `--help`.
pub static WORKLOADS: &[WorkloadDescriptor] = &[
    DATASOURCE_CLONE,
    MIGRATION,
    CAPACITY_BENCHMARK,
    FAILURE_RECOVERY,
];

/// Finds a workload by its subcommand name.
pub fn find_workload(name: &str) -> Option<&'static WorkloadDescriptor> {
    WORKLOADS.iter().find(|w| w.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlagKind;
    use std::collections::HashSet;

    #[test]
    fn test_workload_names_are_unique() {
        let mut seen = HashSet::new();
        for workload in WORKLOADS {
            assert!(seen.insert(workload.name), "duplicate workload {}", workload.name);
        }
    }

    #[test]
    fn test_required_flags_are_declared() {
        for workload in WORKLOADS {
            assert!(!workload.required.is_empty(), "{} has no required flag", workload.name);
            for name in workload.required {
                assert!(
                    workload.find_flag(name).is_some(),
                    "{} requires undeclared flag {}",
                    workload.name,
                    name
                );
            }
        }
    }

    #[test]
    fn test_flags_and_shorts_are_unique_per_workload() {
        for workload in WORKLOADS {
            let mut names = HashSet::new();
            let mut shorts = HashSet::new();
            for (_, flag) in workload.flags() {
                assert!(names.insert(flag.name), "{} declares {} twice", workload.name, flag.name);
                if let Some(short) = flag.short {
                    assert!(shorts.insert(short), "{} reuses -{}", workload.name, short);
                }
            }
        }
    }

    #[test]
    fn test_workloads_do_not_shadow_global_flags() {
        for workload in WORKLOADS {
            for global in ["log-file", "log-level", "kubeconfig", "python", "config"] {
                assert!(
                    workload.find_flag(global).is_none(),
                    "{} redeclares --{}",
                    workload.name,
                    global
                );
            }
        }
    }

    #[test]
    fn test_executors_are_relative_python_scripts() {
        for workload in WORKLOADS {
            assert!(!workload.executor.starts_with('/'));
            assert!(workload.executor.ends_with(".py"));
        }
    }

    #[test]
    fn test_vm_template_requirements() {
        let template = |workload: &WorkloadDescriptor| workload.find_flag("vm-template").map(|f| f.kind);

        assert_eq!(
            template(&MIGRATION),
            Some(FlagKind::RepoFile {
                default: DEFAULT_VM_TEMPLATE,
                checked_when: Some("create-vms"),
            })
        );
        assert!(MIGRATION.find_flag("create-vms").is_some());
        assert_eq!(
            template(&CAPACITY_BENCHMARK),
            Some(FlagKind::RepoFile {
                default: DEFAULT_VM_TEMPLATE,
                checked_when: None,
            })
        );
        assert_eq!(template(&DATASOURCE_CLONE), None);
    }

    #[test]
    fn test_repo_file_switches_are_declared_booleans() {
        for workload in WORKLOADS {
            for (_, flag) in workload.flags() {
                if let FlagKind::RepoFile {
                    checked_when: Some(switch),
                    ..
                } = flag.kind
                {
                    let declared = workload.find_flag(switch).map(|f| f.kind);
                    assert_eq!(declared, Some(FlagKind::Boolean), "{}: --{}", workload.name, flag.name);
                }
            }
        }
    }

    #[test]
    fn test_find_workload() {
        assert_eq!(
            find_workload("migration").map(|w| w.executor),
            Some("migration/measure-vm-migration-time.py")
        );
        assert!(find_workload("unknown").is_none());
    }
}
