//! Logical path handling
//!
//! Logical paths always use `/` regardless of host OS. They are converted to
//! native paths only at the point where they are joined onto an access root.

use std::path::{Component, Path, PathBuf};

/// The only separator recognised in logical paths.
pub const SEPARATOR: char = '/';

/// Concatenate a base path and a suffix with exactly one separator at the join.
///
/// A trailing separator on `base` and a leading separator on `suffix` collapse
/// into one. When neither side carries a separator nothing is inserted, so
/// callers must supply well-formed suffixes.
pub fn compose(base: &str, suffix: &str) -> String {
    if base.ends_with(SEPARATOR) && suffix.starts_with(SEPARATOR) {
        format!("{}{}", base, &suffix[1..])
    } else {
        format!("{}{}", base, suffix)
    }
}

/// Iterate the non-empty segments of a logical path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty())
}

/// Join a logical path onto a native root, segment by segment.
///
/// A leading separator never makes the result absolute: `/a/b` under `root`
/// is `root/a/b`. Dot segments are kept as-is; containment checks run on the
/// [`normalize`]d result.
pub fn join_under(root: &Path, logical: &str) -> PathBuf {
    let mut joined = root.to_path_buf();
    for segment in segments(&logical.replace('\\', "/")) {
        joined.push(segment);
    }
    joined
}

/// Lexically resolve `.` and `..` components without touching the filesystem.
///
/// Returns `None` when a `..` would climb above the root of an absolute path,
/// or above the start of a relative one.
pub fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                out.pop();
                depth -= 1;
            }
            Component::Normal(segment) => {
                out.push(segment);
                depth += 1;
            }
        }
    }
    Some(out)
}

/// Lexically resolve `.` and `..` segments of a logical path.
///
/// The result always starts with `/`. Returns `None` when a `..` climbs above
/// the logical root.
pub fn normalize_logical(path: &str) -> Option<String> {
    let mut resolved: Vec<&str> = Vec::new();
    for segment in segments(path) {
        match segment {
            "." => {}
            ".." => {
                resolved.pop()?;
            }
            other => resolved.push(other),
        }
    }
    Some(format!("{SEPARATOR}{}", resolved.join("/")))
}

/// Whether `candidate` lies at or below `base` once both are normalized.
///
/// Comparison is component-wise, so `/plugins/cde` does not contain
/// `/plugins/cdex`.
pub fn is_within(base: &Path, candidate: &Path) -> bool {
    match (normalize(base), normalize(candidate)) {
        (Some(base), Some(candidate)) => candidate.starts_with(base),
        _ => false,
    }
}

/// Express `target` relative to `root` as a logical path with a leading `/`.
///
/// The root itself relativizes to `/`. A target outside the root falls back to
/// its own forward-slash form.
pub fn relativize(root: &Path, target: &Path) -> String {
    match target.strip_prefix(root) {
        Ok(rest) => {
            let mut logical = String::from(SEPARATOR);
            logical.push_str(&to_unix(rest));
            logical
        }
        Err(_) => to_unix(target),
    }
}

/// Render a native path with forward slashes.
pub fn to_unix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// The extension of a file name: everything after the last `.`.
///
/// Names without a dot, and dot-files such as `.gitignore`, have no extension.
pub fn extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &name[idx + 1..],
    }
}

/// The last segment of a logical path, or `""` for the root.
pub fn file_name(path: &str) -> &str {
    segments(path).last().unwrap_or("")
}

/// Whether any segment of the logical path is hidden (dot-prefixed).
pub fn has_hidden_segment(path: &str) -> bool {
    segments(path).any(|s| s.starts_with('.') && s != "." && s != "..")
}
