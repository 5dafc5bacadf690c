//! # authscan - find PHP files that are missing an auth guard
//!
//! authscan walks one or more directories and reports every `.php` file whose
//! content never references one of a set of authentication keywords in a
//! recognized shape (`$_SESSION`, `extends AdminBase`, `checkAuth(` and so on).
//!
//! ## Quick Start
//!
//! ```bash
//! # Scan two application directories with the default keywords
//! authscan scan app/admin app/api
//!
//! # Use custom keywords and save a report
//! authscan scan app --keywords "session checkLogin" -o scan_results.txt
//!
//! # Show the generated pattern
//! authscan pattern -k session,auth
//! ```
//!
//! ## Library use
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use authscan::scanner::{CompiledMatcher, DirectoryScanner, ScanSession, ScannerConfig};
//!
//! # fn main() -> authscan::Result<()> {
//! let matcher = CompiledMatcher::from_keywords(["session", "auth"])?;
//! let scanner = DirectoryScanner::new(&matcher, ScannerConfig::default())?;
//! let roots = [PathBuf::from("app/admin"), PathBuf::from("app/api")];
//! let session = ScanSession::run(&scanner, &roots)?;
//! for finding in session.findings() {
//!     println!("{finding}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod scanner;

pub use cli::{Cli, Output};
pub use config::AuthScanConfig;
pub use error::{AuthScanError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
