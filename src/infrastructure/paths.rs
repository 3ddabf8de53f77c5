//! Filesystem locations and path expansion.
//!
//! Preferences files live in a per-user data directory. The directory is
//! resolved from the environment in this order:
//!
//! 1. `TABLESTATE_DATA_DIR`
//! 2. `$XDG_DATA_HOME/tablestate`
//! 3. `~/.local/share/tablestate`
//! 4. `./.tablestate` when no home directory is known

use std::path::PathBuf;

/// Directory name under the XDG data directory.
pub const APP_DIR_NAME: &str = "tablestate";

/// File name of the default preferences store.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Returns the data directory for stored preferences.
///
/// # Examples
///
/// ```
/// use tablestate::infrastructure::data_dir;
///
/// let dir = data_dir();
/// assert!(dir.ends_with("tablestate") || dir.ends_with(".tablestate") || dir.is_absolute());
/// ```
#[must_use]
pub fn data_dir() -> PathBuf {
    resolve_data_dir(|name| std::env::var(name).ok())
}

/// Default location of the JSON preferences store.
#[must_use]
pub fn default_preferences_file() -> PathBuf {
    data_dir().join(PREFERENCES_FILE_NAME)
}

/// Expands a leading `~` to the current user's home directory.
///
/// Paths without a leading tilde, and every path when `HOME` is unset, are
/// returned unchanged.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, std::env::var("HOME").ok().as_deref())
}

fn resolve_data_dir(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());

    if let Some(dir) = non_empty("TABLESTATE_DATA_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(xdg) = non_empty("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join(APP_DIR_NAME);
    }
    match non_empty("HOME") {
        Some(home) => PathBuf::from(home).join(".local").join("share").join(APP_DIR_NAME),
        None => PathBuf::from(format!(".{APP_DIR_NAME}")),
    }
}

fn expand_tilde_with(path: &str, home: Option<&str>) -> PathBuf {
    let Some(home) = home.filter(|h| !h.is_empty()) else {
        return PathBuf::from(path);
    };
    if path == "~" {
        PathBuf::from(home)
    } else if let Some(rest) = path.strip_prefix("~/") {
        PathBuf::from(home).join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn explicit_dir_wins() {
        let dir = resolve_data_dir(env(&[
            ("TABLESTATE_DATA_DIR", "/srv/prefs"),
            ("XDG_DATA_HOME", "/xdg"),
            ("HOME", "/home/ana"),
        ]));
        assert_eq!(dir, PathBuf::from("/srv/prefs"));
    }

    #[test]
    fn xdg_then_home() {
        let dir = resolve_data_dir(env(&[("XDG_DATA_HOME", "/xdg"), ("HOME", "/home/ana")]));
        assert_eq!(dir, PathBuf::from("/xdg/tablestate"));

        let dir = resolve_data_dir(env(&[("XDG_DATA_HOME", ""), ("HOME", "/home/ana")]));
        assert_eq!(dir, PathBuf::from("/home/ana/.local/share/tablestate"));
    }

    #[test]
    fn no_home_falls_back_to_relative_dir() {
        assert_eq!(resolve_data_dir(env(&[])), PathBuf::from(".tablestate"));
    }

    #[test]
    fn tilde_expansion() {
        let home = Some("/home/ana");
        assert_eq!(expand_tilde_with("~/prefs.json", home), PathBuf::from("/home/ana/prefs.json"));
        assert_eq!(expand_tilde_with("~", home), PathBuf::from("/home/ana"));
        assert_eq!(expand_tilde_with("/etc/prefs.json", home), PathBuf::from("/etc/prefs.json"));
        assert_eq!(expand_tilde_with("~other/x", home), PathBuf::from("~other/x"));
        assert_eq!(expand_tilde_with("~/x", None), PathBuf::from("~/x"));
    }
}
