//! Schema and parsing for the cluster status document.
//!
//! Only the fields the dashboard displays are modeled; everything else in
//! the (large) status json is ignored. Every metric sub-structure is
//! optional — a process that is just starting up, or a cluster in a
//! degraded state, reports entries with missing sections, and those must
//! degrade to "unknown" cells rather than parse failures.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::Error;

/// Top-level status document.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterStatus {
    pub cluster: Cluster,
}

/// The `cluster` section.
///
/// Processes are keyed by an arbitrary identifier. A `BTreeMap` keeps the
/// projection order deterministic across runs, which the stable sort and
/// the one-shot idempotence guarantee rely on.
#[derive(Debug, Clone, Deserialize)]
pub struct Cluster {
    #[serde(default)]
    pub processes: BTreeMap<String, ProcessStatus>,
}

/// One worker process entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessStatus {
    pub address: String,
    #[serde(default)]
    pub cpu: Option<CpuStats>,
    #[serde(default)]
    pub memory: Option<MemoryStats>,
    #[serde(default)]
    pub disk: Option<DiskStats>,
    #[serde(default)]
    pub network: Option<NetworkStats>,
    #[serde(default)]
    pub class_type: String,
    #[serde(default)]
    pub roles: Vec<RoleInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CpuStats {
    /// Fraction of one core in use.
    pub usage_cores: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryStats {
    #[serde(default)]
    pub used_bytes: Option<u64>,
    #[serde(default)]
    pub limit_bytes: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiskStats {
    #[serde(default)]
    pub reads: Option<RateStats>,
    #[serde(default)]
    pub writes: Option<RateStats>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkStats {
    #[serde(default)]
    pub megabits_sent: Option<RateStats>,
    #[serde(default)]
    pub megabits_received: Option<RateStats>,
}

/// A counter reported as a rate.
#[derive(Debug, Clone, Deserialize)]
pub struct RateStats {
    pub hz: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleInfo {
    pub role: String,
}

/// Parses a status document.
pub fn parse_status(input: &str) -> Result<ClusterStatus, Error> {
    serde_json::from_str(input).map_err(|e| Error::MalformedSnapshot(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let input = r#"{
            "cluster": {
                "processes": {
                    "abc123": {
                        "address": "10.0.0.1:4500",
                        "class_type": "storage",
                        "roles": [{"role": "storage"}],
                        "cpu": {"usage_cores": 0.25},
                        "memory": {"used_bytes": 1073741824, "limit_bytes": 8589934592},
                        "disk": {"reads": {"hz": 10.2}, "writes": {"hz": 4.8}},
                        "network": {"megabits_sent": {"hz": 1.5}, "megabits_received": {"hz": 2.5}}
                    }
                }
            }
        }"#;

        let status = parse_status(input).unwrap();
        assert_eq!(status.cluster.processes.len(), 1);
        let p = &status.cluster.processes["abc123"];
        assert_eq!(p.address, "10.0.0.1:4500");
        assert_eq!(p.class_type, "storage");
        assert_eq!(p.roles[0].role, "storage");
        assert_eq!(p.cpu.as_ref().unwrap().usage_cores, 0.25);
    }

    #[test]
    fn missing_metric_sections_parse_as_none() {
        let input = r#"{
            "cluster": {
                "processes": {
                    "p": {"address": "10.0.0.2:4500", "class_type": "stateless", "roles": []}
                }
            }
        }"#;

        let status = parse_status(input).unwrap();
        let p = &status.cluster.processes["p"];
        assert!(p.cpu.is_none());
        assert!(p.memory.is_none());
        assert!(p.disk.is_none());
        assert!(p.network.is_none());
    }

    #[test]
    fn invalid_json_is_malformed_snapshot() {
        let err = parse_status("not json at all").unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot(_)));
    }

    #[test]
    fn missing_cluster_section_is_malformed_snapshot() {
        let err = parse_status(r#"{"client": {}}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot(_)));
    }

    #[test]
    fn process_order_is_deterministic() {
        let input = r#"{
            "cluster": {
                "processes": {
                    "zzz": {"address": "10.0.0.9:4500"},
                    "aaa": {"address": "10.0.0.1:4500"}
                }
            }
        }"#;

        let status = parse_status(input).unwrap();
        let keys: Vec<&String> = status.cluster.processes.keys().collect();
        assert_eq!(keys, vec!["aaa", "zzz"]);
    }
}
