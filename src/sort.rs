//! Selectable sort modes and the ordering rules applied per refresh.

use std::cmp::Ordering;

use crate::row::{Metric, ProcessRow};

/// The column a sort mode orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Compound key: host, then port, both ascending.
    Host,
    Port,
    Cpu,
    Mem,
    Iops,
    Net,
    Class,
    Roles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// One selectable sort mode.
#[derive(Debug, Clone, Copy)]
pub struct SortSpec {
    /// Display name; matches the header it marks.
    pub name: &'static str,
    pub field: SortField,
    pub direction: Direction,
    /// Numeric comparison with the sentinel-last rule.
    pub numeric: bool,
    /// Blank repeated hosts and separate host groups in the rendered table.
    pub group: bool,
}

/// The fixed, ordered set of sort modes. Index 0 is the startup default.
pub const SORT_SPECS: &[SortSpec] = &[
    SortSpec {
        name: "host",
        field: SortField::Host,
        direction: Direction::Ascending,
        numeric: false,
        group: true,
    },
    SortSpec {
        name: "port",
        field: SortField::Port,
        direction: Direction::Ascending,
        numeric: false,
        group: false,
    },
    SortSpec {
        name: "cpu%",
        field: SortField::Cpu,
        direction: Direction::Descending,
        numeric: true,
        group: false,
    },
    SortSpec {
        name: "mem%",
        field: SortField::Mem,
        direction: Direction::Descending,
        numeric: true,
        group: false,
    },
    SortSpec {
        name: "iops",
        field: SortField::Iops,
        direction: Direction::Descending,
        numeric: true,
        group: false,
    },
    SortSpec {
        name: "net",
        field: SortField::Net,
        direction: Direction::Descending,
        numeric: true,
        group: false,
    },
    SortSpec {
        name: "class",
        field: SortField::Class,
        direction: Direction::Ascending,
        numeric: false,
        group: false,
    },
    SortSpec {
        name: "roles",
        field: SortField::Roles,
        direction: Direction::Ascending,
        numeric: false,
        group: false,
    },
];

/// Cursor over [`SORT_SPECS`]. Process-lifetime state, mutated only by the
/// input handler through `advance`/`retreat`.
#[derive(Debug, Clone, Default)]
pub struct SortState {
    index: usize,
}

impl SortState {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    /// Moves the cursor forward, wrapping to 0 past the end.
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % SORT_SPECS.len();
    }

    /// Moves the cursor backward, wrapping to the last index from 0.
    pub fn retreat(&mut self) {
        self.index = (self.index + SORT_SPECS.len() - 1) % SORT_SPECS.len();
    }

    /// The currently active sort mode.
    pub fn active(&self) -> &'static SortSpec {
        &SORT_SPECS[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Sorts rows in place under the given spec. `sort_by` is stable, so rows
/// with equal keys keep their projection order and don't flicker between
/// refreshes.
pub fn sort_rows(rows: &mut [ProcessRow], spec: &SortSpec) {
    rows.sort_by(|a, b| compare(a, b, spec));
}

fn compare(a: &ProcessRow, b: &ProcessRow, spec: &SortSpec) -> Ordering {
    match spec.field {
        SortField::Host => a.host.cmp(&b.host).then_with(|| a.port.cmp(&b.port)),
        SortField::Port => compare_text(&a.port, &b.port, spec.direction),
        SortField::Cpu => compare_metric(a.cpu_pct, b.cpu_pct, spec.direction),
        SortField::Mem => compare_metric(a.mem_pct, b.mem_pct, spec.direction),
        SortField::Iops => compare_metric(a.iops, b.iops, spec.direction),
        SortField::Net => compare_metric(a.net, b.net, spec.direction),
        SortField::Class => compare_text(&a.class, &b.class, spec.direction),
        SortField::Roles => compare_text(&a.roles, &b.roles, spec.direction),
    }
}

/// Numeric ordering: sentinel cells (`Unknown`/`NotApplicable`) go to the
/// very end regardless of direction, and compare equal to each other.
fn compare_metric(a: Metric, b: Metric, direction: Direction) -> Ordering {
    match (a.value(), b.value()) {
        (Some(x), Some(y)) => apply(x.cmp(&y), direction),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// String ordering: empty values go last, overriding the lexicographic rule
/// that would put them first.
fn compare_text(a: &str, b: &str, direction: Direction) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
        (false, false) => apply(a.cmp(b), direction),
    }
}

fn apply(ord: Ordering, direction: Direction) -> Ordering {
    match direction {
        Direction::Ascending => ord,
        Direction::Descending => ord.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(host: &str, port: &str, cpu: Metric, roles: &str) -> ProcessRow {
        ProcessRow {
            host: host.to_string(),
            port: port.to_string(),
            cpu_pct: cpu,
            mem_pct: Metric::Unknown,
            iops: Metric::Unknown,
            net: Metric::Unknown,
            class: String::new(),
            roles: roles.to_string(),
        }
    }

    fn spec(name: &str) -> &'static SortSpec {
        SORT_SPECS.iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn cursor_wraps_in_both_directions() {
        let mut state = SortState::new();
        assert_eq!(state.index(), 0);

        state.retreat();
        assert_eq!(state.index(), SORT_SPECS.len() - 1);

        state.advance();
        assert_eq!(state.index(), 0);

        for _ in 0..SORT_SPECS.len() {
            state.advance();
        }
        assert_eq!(state.index(), 0);
    }

    #[test]
    fn default_spec_groups_by_host() {
        let state = SortState::new();
        assert_eq!(state.active().name, "host");
        assert!(state.active().group);
    }

    #[test]
    fn host_mode_orders_by_host_then_port() {
        let mut rows = vec![
            row("10.0.0.2", "4500", Metric::Unknown, ""),
            row("10.0.0.1", "4501", Metric::Unknown, ""),
            row("10.0.0.1", "4500", Metric::Unknown, ""),
        ];
        sort_rows(&mut rows, spec("host"));
        let order: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.host.as_str(), r.port.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("10.0.0.1", "4500"),
                ("10.0.0.1", "4501"),
                ("10.0.0.2", "4500"),
            ]
        );
    }

    #[test]
    fn numeric_descending_puts_highest_first() {
        let mut rows = vec![
            row("a", "1", Metric::Value(10), ""),
            row("b", "1", Metric::Value(90), ""),
            row("c", "1", Metric::Value(50), ""),
        ];
        sort_rows(&mut rows, spec("cpu%"));
        let cpus: Vec<Metric> = rows.iter().map(|r| r.cpu_pct).collect();
        assert_eq!(
            cpus,
            vec![Metric::Value(90), Metric::Value(50), Metric::Value(10)]
        );
    }

    #[test]
    fn sentinels_order_last_and_tie() {
        let mut rows = vec![
            row("a", "1", Metric::Unknown, ""),
            row("b", "1", Metric::Value(5), ""),
            row("c", "1", Metric::NotApplicable, ""),
            row("d", "1", Metric::Value(80), ""),
        ];
        sort_rows(&mut rows, spec("cpu%"));
        let hosts: Vec<&str> = rows.iter().map(|r| r.host.as_str()).collect();
        // Values first (descending), then the sentinels in input order:
        // Unknown and NotApplicable compare equal, stability keeps a before c.
        assert_eq!(hosts, vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn sentinel_position_is_deterministic() {
        let build = || {
            vec![
                row("a", "1", Metric::NotApplicable, ""),
                row("b", "1", Metric::Value(1), ""),
                row("c", "1", Metric::Unknown, ""),
            ]
        };
        let mut first = build();
        let mut second = build();
        sort_rows(&mut first, spec("cpu%"));
        sort_rows(&mut second, spec("cpu%"));
        assert_eq!(first, second);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let mut rows = vec![
            row("x", "1", Metric::Value(50), "storage"),
            row("y", "1", Metric::Value(50), "storage"),
            row("z", "1", Metric::Value(50), "storage"),
        ];
        sort_rows(&mut rows, spec("cpu%"));
        let hosts: Vec<&str> = rows.iter().map(|r| r.host.as_str()).collect();
        assert_eq!(hosts, vec!["x", "y", "z"]);
    }

    #[test]
    fn empty_strings_sort_last() {
        let mut rows = vec![
            row("a", "1", Metric::Unknown, ""),
            row("b", "1", Metric::Unknown, "log"),
            row("c", "1", Metric::Unknown, "storage"),
        ];
        sort_rows(&mut rows, spec("roles"));
        let hosts: Vec<&str> = rows.iter().map(|r| r.host.as_str()).collect();
        assert_eq!(hosts, vec!["b", "c", "a"]);
    }
}
