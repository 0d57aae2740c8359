// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Path string handling for directory completion.
//!
//! Everything here is a pure string transformation. Paths typed into the
//! input field are kept as `/`-separated strings so that the completed text
//! echoes exactly what the user will see; nothing in this module touches the
//! filesystem.

/// Path separator used in typed paths.
pub const SEPARATOR: char = '/';

/// Root directory.
pub const ROOT: &str = "/";

/// The current user's home directory as a string, if known.
pub fn home_directory() -> Option<String> {
    dirs::home_dir().map(|home| home.to_string_lossy().into_owned())
}

/// Turn a typed path into an absolute one.
///
/// - `~` and `~/...` are rewritten against the home directory
/// - absolute paths are returned unchanged
/// - anything else is appended to `base_directory`
///
/// An empty `path` yields `base_directory` with a trailing separator so that
/// [`split`] lists the base directory itself.
pub fn expand(path: &str, base_directory: &str) -> String {
    expand_with_home(path, base_directory, home_directory().as_deref())
}

pub(crate) fn expand_with_home(path: &str, base_directory: &str, home: Option<&str>) -> String {
    if let Some(home) = home {
        if path == "~" {
            return home.to_string();
        }
        if let Some(rest) = path.strip_prefix("~/") {
            return join(home, rest);
        }
    }

    if path.starts_with(SEPARATOR) {
        return path.to_string();
    }

    if path.is_empty() {
        let mut dir = base_directory.to_string();
        if !dir.ends_with(SEPARATOR) {
            dir.push(SEPARATOR);
        }
        return dir;
    }

    join(base_directory, path)
}

/// Split a path into the directory to list and the prefix to match.
///
/// A path that is empty or ends with the separator is all directory; otherwise
/// the last component is the prefix. An empty directory part becomes the root.
pub fn split(path: &str) -> (String, String) {
    if path.is_empty() {
        return (ROOT.to_string(), String::new());
    }
    if path.ends_with(SEPARATOR) {
        return (path.to_string(), String::new());
    }

    match path.rfind(SEPARATOR) {
        Some(idx) => {
            let directory = path[..idx].trim_end_matches(SEPARATOR);
            let prefix = &path[idx + 1..];
            let directory = if directory.is_empty() { ROOT } else { directory };
            (directory.to_string(), prefix.to_string())
        }
        None => (ROOT.to_string(), path.to_string()),
    }
}

/// Join a directory and a name with exactly one separator between them.
pub fn join(directory: &str, name: &str) -> String {
    if directory.is_empty() {
        return name.to_string();
    }
    let name = name.trim_start_matches(SEPARATOR);
    if directory.ends_with(SEPARATOR) {
        format!("{}{}", directory, name)
    } else {
        format!("{}{}{}", directory, SEPARATOR, name)
    }
}

/// Normalize a path: collapse `.` and `..` segments and repeated separators,
/// and drop any trailing separator.
///
/// `..` never climbs above the root of an absolute path. Leading `..`
/// segments of a relative path are kept.
pub fn standardize(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }

    let absolute = path.starts_with(SEPARATOR);
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if absolute {
        format!("{}{}", SEPARATOR, joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_absolute_unchanged() {
        assert_eq!(expand_with_home("/usr/lo", "/home/me", Some("/home/me")), "/usr/lo");
    }

    #[test]
    fn test_expand_tilde() {
        let home = Some("/home/me");
        assert_eq!(expand_with_home("~/src", "/tmp", home), "/home/me/src");
        assert_eq!(expand_with_home("~/", "/tmp", home), "/home/me/");
        assert_eq!(expand_with_home("~", "/tmp", home), "/home/me");
    }

    #[test]
    fn test_expand_tilde_without_home_is_relative() {
        assert_eq!(expand_with_home("~/src", "/tmp", None), "/tmp/~/src");
    }

    #[test]
    fn test_expand_relative() {
        assert_eq!(expand_with_home("src", "/home/me", None), "/home/me/src");
        assert_eq!(expand_with_home("src", "/home/me/", None), "/home/me/src");
        assert_eq!(expand_with_home("../x", "/home/me", None), "/home/me/../x");
    }

    #[test]
    fn test_expand_empty_lists_base() {
        assert_eq!(expand_with_home("", "/home/me", None), "/home/me/");
        assert_eq!(expand_with_home("", "/", None), "/");
    }

    #[test]
    fn test_split() {
        assert_eq!(split("/usr/lo"), ("/usr".to_string(), "lo".to_string()));
        assert_eq!(split("/usr/"), ("/usr/".to_string(), String::new()));
        assert_eq!(split("/us"), ("/".to_string(), "us".to_string()));
        assert_eq!(split(""), ("/".to_string(), String::new()));
        assert_eq!(split("/"), ("/".to_string(), String::new()));
        assert_eq!(split("/a//b"), ("/a".to_string(), "b".to_string()));
    }

    #[test]
    fn test_join() {
        assert_eq!(join("/", "usr"), "/usr");
        assert_eq!(join("/usr", "local"), "/usr/local");
        assert_eq!(join("/usr/", "local"), "/usr/local");
        assert_eq!(join("/usr", "/local"), "/usr/local");
    }

    #[test]
    fn test_standardize() {
        assert_eq!(standardize("/usr//local/./bin/"), "/usr/local/bin");
        assert_eq!(standardize("/usr/local/../lib"), "/usr/lib");
        assert_eq!(standardize("/.."), "/");
        assert_eq!(standardize("/../../etc"), "/etc");
        assert_eq!(standardize("/"), "/");
        assert_eq!(standardize("a/../../b"), "../b");
        assert_eq!(standardize("./"), ".");
        assert_eq!(standardize(""), "");
    }
}
