//! Embeds a build identifier for `deckconf --version`.
//!
//! Packagers building from a tarball set `DECKCONF_GIT_HASH` themselves;
//! otherwise the short commit hash is taken from git, or "unknown".

use std::env;
use std::path::Path;
use std::process::Command;

const HASH_VAR: &str = "DECKCONF_GIT_HASH";

fn main() {
    println!("cargo:rerun-if-env-changed={HASH_VAR}");

    let hash = env::var(HASH_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(git_short_hash)
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env={HASH_VAR}={hash}");

    // A checkout or commit moves HEAD (or the branch ref it points at).
    let head = Path::new(".git/HEAD");
    if head.is_file() {
        println!("cargo:rerun-if-changed=.git/HEAD");
        if let Ok(contents) = std::fs::read_to_string(head)
            && let Some(reference) = contents.strip_prefix("ref:")
        {
            let reference = Path::new(".git").join(reference.trim());
            if reference.is_file() {
                println!("cargo:rerun-if-changed={}", reference.display());
            }
        }
    }
}

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!hash.is_empty()).then_some(hash)
}
