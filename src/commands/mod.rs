//! Command entry points invoked by the CLI.

mod check;
pub mod config;
mod paths;
mod scan;
mod services;

pub use check::{check, render_report, run_check};
pub use config::{Config, DEFAULT_TIMEOUT, Settings};
pub use paths::{default_mods_dir, resolve_mods_dir};
pub use scan::{ScanReport, render_scan, run_scan, scan};
pub use services::{build_catalog, build_http_client};
