pub mod directory;
pub mod pattern;
pub mod session;
pub mod types;

// Re-export main types for easier access
pub use directory::{DirectoryScanner, FileVerdict, ScanIter, decode_lenient, is_trivial, read_lenient};
pub use pattern::{CompiledMatcher, DEFAULT_KEYWORDS, KeywordSet, build_pattern};
pub use session::ScanSession;
pub use types::{Finding, ScanError, ScanEvent, ScanStats, ScannerConfig};
