//! Best-effort source revision lookup
//!
//! The revision is informational metadata in the manifest. Lookups never
//! fail: any problem (git missing, not a repository) collapses to a
//! sentinel.

use std::path::Path;
use tokio::process::Command;

/// Sentinel recorded when no revision can be determined
pub const UNKNOWN: &str = "unknown";

/// Short revision of the working directory
pub async fn current() -> String {
    lookup(None).await
}

async fn lookup(dir: Option<&Path>) -> String {
    let mut cmd = Command::new("git");
    cmd.args(["rev-parse", "--short=7", "HEAD"]);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    match cmd.output().await {
        Ok(output) if output.status.success() => {
            let rev = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if rev.is_empty() {
                UNKNOWN.to_string()
            } else {
                rev
            }
        }
        _ => UNKNOWN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn never_empty() {
        let rev = current().await;
        assert!(!rev.is_empty());
    }

    #[tokio::test]
    async fn outside_a_repository_is_unknown() {
        let temp = TempDir::new().unwrap();
        assert_eq!(lookup(Some(temp.path())).await, UNKNOWN);
    }
}
