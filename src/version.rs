//! Build-time metadata helpers used by the CLI.

/// Short git hash determined at compile time when available.
#[must_use]
pub fn commit_hash() -> &'static str {
    option_env!("MIMIC_GIT_HASH").unwrap_or("unknown")
}

/// Unix timestamp (seconds since epoch) recorded at build time.
#[must_use]
pub fn build_timestamp() -> &'static str {
    option_env!("MIMIC_BUILD_UNIX").unwrap_or("unknown")
}

/// Render a scripting-friendly version string.
#[must_use]
pub fn formatted() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let commit = commit_hash();
    let built = build_timestamp();
    format!("mimic {version}\ncommit: {commit}\nbuilt: {built}")
}
