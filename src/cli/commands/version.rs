//! Version command implementation

use anyhow::Result;

use crate::cli::Output;

/// Execute the version command
pub fn execute(output: &Output) -> Result<()> {
    output.banner(&format!("{} v{}", crate::PKG_NAME, crate::VERSION));
    output.field("Description:", crate::PKG_DESCRIPTION);
    output.field("Authors:", env!("CARGO_PKG_AUTHORS"));
    if let Some(repository) = option_env!("CARGO_PKG_REPOSITORY").filter(|r| !r.is_empty()) {
        output.field("Repository:", repository);
    }

    output.section("Build");
    output.field("Target:", std::env::consts::ARCH);
    output.field("Profile:", if cfg!(debug_assertions) { "debug" } else { "release" });

    output.blank_line();
    output.info("Run 'authscan --help' for usage information");

    Ok(())
}
