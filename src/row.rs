//! Projection of status entries into display rows.

use std::fmt;

use tracing::warn;

use crate::error::Error;
use crate::status::{ClusterStatus, ProcessStatus};

/// A numeric cell that may be missing from the status document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Value(i64),
    /// The entry did not report this metric.
    Unknown,
    /// Suppressed for this process (stateless iops with the default config).
    /// Renders like a dash but must stay distinguishable from `Unknown`.
    NotApplicable,
}

impl Metric {
    /// The numeric value, if this cell has one.
    pub fn value(&self) -> Option<i64> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::Unknown | Metric::NotApplicable => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{}", v),
            Metric::Unknown => write!(f, "???"),
            Metric::NotApplicable => write!(f, "-"),
        }
    }
}

/// One worker process's display-ready facts at a point in time.
///
/// Built fresh from every snapshot; nothing survives across refreshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRow {
    pub host: String,
    pub port: String,
    pub cpu_pct: Metric,
    pub mem_pct: Metric,
    pub iops: Metric,
    pub net: Metric,
    pub class: String,
    /// Role labels, sorted lexicographically, comma-joined.
    pub roles: String,
}

/// Projects one status entry into a row.
///
/// Returns `Error::MalformedAddress` when the address has no `host:port`
/// separator. The port is everything after the first `:`, so a TLS-suffixed
/// address keeps its suffix in the port column.
pub fn project_one(entry: &ProcessStatus, show_all_iops: bool) -> Result<ProcessRow, Error> {
    let Some((host, port)) = entry.address.split_once(':') else {
        return Err(Error::MalformedAddress(entry.address.clone()));
    };

    let cpu_pct = match &entry.cpu {
        Some(cpu) => Metric::Value((cpu.usage_cores * 100.0).round() as i64),
        None => Metric::Unknown,
    };

    let mem_pct = match &entry.memory {
        Some(mem) => match (mem.used_bytes, mem.limit_bytes) {
            (Some(used), Some(limit)) if limit > 0 => {
                Metric::Value((used as f64 / limit as f64 * 100.0).round() as i64)
            }
            _ => Metric::Unknown,
        },
        None => Metric::Unknown,
    };

    let mut iops = match &entry.disk {
        Some(disk) => match (&disk.reads, &disk.writes) {
            (Some(reads), Some(writes)) => Metric::Value((reads.hz + writes.hz).round() as i64),
            _ => Metric::Unknown,
        },
        None => Metric::Unknown,
    };

    let net = match &entry.network {
        Some(network) => match (&network.megabits_sent, &network.megabits_received) {
            (Some(sent), Some(received)) => Metric::Value((sent.hz + received.hz).round() as i64),
            _ => Metric::Unknown,
        },
        None => Metric::Unknown,
    };

    let mut roles: Vec<&str> = entry.roles.iter().map(|r| r.role.as_str()).collect();
    roles.sort_unstable();

    // Disk iops only mean something for processes that own a disk.
    if !show_all_iops && !roles.iter().any(|r| *r == "log" || *r == "storage") {
        iops = Metric::NotApplicable;
    }

    Ok(ProcessRow {
        host: host.to_string(),
        port: port.to_string(),
        cpu_pct,
        mem_pct,
        iops,
        net,
        class: entry.class_type.clone(),
        roles: roles.join(","),
    })
}

/// Projects every process entry of a snapshot.
///
/// Policy for malformed addresses: the record is skipped with a warning.
/// One bad entry never aborts a refresh.
pub fn project(status: &ClusterStatus, show_all_iops: bool) -> Vec<ProcessRow> {
    status
        .cluster
        .processes
        .iter()
        .filter_map(|(id, entry)| match project_one(entry, show_all_iops) {
            Ok(row) => Some(row),
            Err(err) => {
                warn!("skipping process {}: {}", id, err);
                None
            }
        })
        .collect()
}
