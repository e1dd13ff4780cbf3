use std::path::{Path, PathBuf};

/// Name of the per-user library folder inside the home directory.
const LIBRARY_DIR: &str = "Library";

/// Returns the current user's home directory.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Returns the user-domain library folders for `home`.
pub fn library_dirs(home: &Path) -> Vec<PathBuf> {
    vec![home.join(LIBRARY_DIR)]
}

/// Expands a leading `~` or `~/` against `home`. Other input is returned unchanged.
pub fn expand_tilde(raw: &str, home: Option<&Path>) -> PathBuf {
    match home {
        Some(home) if raw == "~" => home.to_path_buf(),
        Some(home) => match raw.strip_prefix("~/") {
            Some(rest) => home.join(rest),
            None => PathBuf::from(raw),
        },
        None => PathBuf::from(raw),
    }
}

/// Collapses `home` at the start of `path` to `~`.
///
/// Only whole path segments are collapsed: with home `/Users/me`,
/// `/Users/me2/x` is returned unchanged.
pub fn abbreviate_home(path: &str, home: &str) -> String {
    let home = home.trim_end_matches('/');
    if home.is_empty() {
        return path.to_string();
    }
    match path.strip_prefix(home) {
        Some("") => "~".to_string(),
        Some(rest) if rest.starts_with('/') => format!("~{}", rest),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviate_home() {
        assert_eq!(
            abbreviate_home("/Users/me/Documents/report.pdf", "/Users/me"),
            "~/Documents/report.pdf"
        );
        assert_eq!(abbreviate_home("/Users/me", "/Users/me/"), "~");
        assert_eq!(abbreviate_home("/Users/me2/x", "/Users/me"), "/Users/me2/x");
        assert_eq!(abbreviate_home("/etc/hosts", "/Users/me"), "/etc/hosts");
        assert_eq!(abbreviate_home("/etc/hosts", "/"), "/etc/hosts");
    }

    #[test]
    fn test_expand_tilde() {
        let home = Path::new("/Users/me");
        assert_eq!(expand_tilde("~", Some(home)), PathBuf::from("/Users/me"));
        assert_eq!(
            expand_tilde("~/Desktop", Some(home)),
            PathBuf::from("/Users/me/Desktop")
        );
        assert_eq!(expand_tilde("~other/x", Some(home)), PathBuf::from("~other/x"));
        assert_eq!(expand_tilde("~/Desktop", None), PathBuf::from("~/Desktop"));
    }

    #[test]
    fn test_library_dirs() {
        assert_eq!(
            library_dirs(Path::new("/Users/me")),
            vec![PathBuf::from("/Users/me/Library")]
        );
    }
}
