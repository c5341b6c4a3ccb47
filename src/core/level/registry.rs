use std::path::{Path, PathBuf};

/// Level used when nothing else selects one (and as the fallback for unknown ids).
pub const DEFAULT_LEVEL_ID: &str = "test_currents";

/// Flow file names probed inside a level directory, in order.
pub const FLOW_FILE_NAMES: [&str; 2] = ["flows.ron", "flows.json"];

/// Determine requested level id via (precedence):
///  1. CLI args: --level <id>
///  2. Env var: LEVEL_ID
pub fn resolve_requested_level_id() -> Option<String> {
    let mut args = std::env::args().skip(1);
    while let Some(a) = args.next() {
        if a == "--level" {
            if let Some(id) = args.next() {
                if !id.trim().is_empty() {
                    return Some(id);
                }
            }
        }
    }
    if let Ok(val) = std::env::var("LEVEL_ID") {
        if !val.trim().is_empty() {
            return Some(val);
        }
    }
    None
}

/// `<crate root>/assets/levels`, falling back to the working directory outside cargo.
pub fn levels_dir() -> PathBuf {
    let crate_root = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
    PathBuf::from(crate_root).join("assets").join("levels")
}

/// First existing flow file for `id` under `base`.
pub fn flow_file_path(base: &Path, id: &str) -> Option<PathBuf> {
    FLOW_FILE_NAMES
        .iter()
        .map(|name| base.join(id).join(name))
        .find(|p| p.is_file())
}

/// Selection precedence: requested (CLI/env) > config default > `DEFAULT_LEVEL_ID`.
/// An id that `exists` rejects falls back to `DEFAULT_LEVEL_ID`.
pub fn select_level_id(
    requested: Option<&str>,
    config_default: &str,
    exists: impl Fn(&str) -> bool,
) -> (String, bool) {
    let wanted = requested
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| Some(config_default.trim()).filter(|s| !s.is_empty()))
        .unwrap_or(DEFAULT_LEVEL_ID);
    if exists(wanted) {
        (wanted.to_string(), false)
    } else {
        (DEFAULT_LEVEL_ID.to_string(), wanted != DEFAULT_LEVEL_ID)
    }
}
