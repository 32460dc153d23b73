//! fdbtop - display and update sorted information about FoundationDB processes.
//!
//! This library provides the data pipeline behind the `fdbtop` binary:
//! - `status`: parsing of the `fdbcli --exec "status json"` document
//! - `row`: projection of process entries into display rows
//! - `sort`: selectable sort modes and the ordering rules
//! - `table` / `view`: plain-text table layout, rendering and cropping
//! - `collector`: invocation of the external status command
//! - `tui`: the interactive refresh loop

pub mod collector;
pub mod error;
pub mod row;
pub mod sort;
pub mod status;
pub mod table;
pub mod tui;
pub mod view;

pub use error::Error;
