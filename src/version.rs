//! Build identifier reported by the `version` command

use crate::log_warn;

const VERSION_ENV: &str = "GIT_COMMIT";

/// Shown when no build identifier could be found
pub const UNKNOWN_VERSION: &str = "?";

/// `git describe --always` if run from a checkout, else `$GIT_COMMIT`, else `?`.
pub async fn detect() -> String {
    let git = tokio::process::Command::new("git")
        .args(["describe", "--always"])
        .output()
        .await
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).into_owned());

    let version = pick(git, std::env::var(VERSION_ENV).ok());
    if version == UNKNOWN_VERSION {
        log_warn!("Could not get Git hash");
    }
    version
}

fn pick(git: Option<String>, env: Option<String>) -> String {
    [git, env]
        .into_iter()
        .flatten()
        .map(|candidate| candidate.trim().to_owned())
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_else(|| UNKNOWN_VERSION.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_git() {
        assert_eq!(
            pick(Some("v1.2-3-gabc\n".to_owned()), Some("def".to_owned())),
            "v1.2-3-gabc"
        );
    }

    #[test]
    fn falls_back_to_environment() {
        assert_eq!(pick(None, Some("def".to_owned())), "def");
        assert_eq!(pick(Some("  ".to_owned()), Some("def".to_owned())), "def");
    }

    #[test]
    fn unknown_without_either() {
        assert_eq!(pick(None, None), "?");
        assert_eq!(pick(None, Some(String::new())), "?");
    }
}
