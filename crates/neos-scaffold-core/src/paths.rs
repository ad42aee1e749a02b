//! Path composition for generated files
//!
//! Paths are handled as `/`-separated strings until they are written so that
//! `resource://<Package.Key>/...` locations can be composed like any other path.

/// Scheme prefix of package resource paths
pub const RESOURCE_SCHEME: &str = "resource://";

/// Segments that mark the start of a package-relative path when shortening
/// absolute paths for display
const SOURCE_ROOT_SEGMENTS: &[&str] = &["Configuration", "Resources", "Classes", "Tests"];

/// Join path segments, dropping empty ones and collapsing duplicate separators
///
/// Leading separators and a scheme on the first segment are kept.
pub fn concatenate<S: AsRef<str>>(segments: &[S]) -> String {
    let mut result = String::new();
    for (index, segment) in segments.iter().enumerate() {
        let segment = unix_style(segment.as_ref());
        let segment = if index == 0 {
            segment.trim_end_matches('/')
        } else {
            segment.trim_matches('/')
        };
        if !segment.is_empty() {
            result.push_str(segment);
            result.push('/');
        }
    }
    result.trim_end_matches('/').to_string()
}

/// Build the path of a generated file
///
/// With `sub_folder` set, the artifact gets its own folder named after itself.
pub fn compose(
    base_path: &str,
    target_path: &str,
    sub_folder: bool,
    name: &str,
    name_appendix: &str,
    suffix: &str,
) -> String {
    let folder = if sub_folder { name } else { "" };
    let file_name = format!("{}{}{}", name, name_appendix, suffix);
    concatenate(&[base_path, target_path, folder, file_name.as_str()])
}

/// `resource://<Package.Key>/` root of a package
pub fn resource_root(package_key: &str) -> String {
    format!("{}{}/", RESOURCE_SCHEME, package_key)
}

/// Split `resource://<Key>/<rest>` into key and rest
pub fn split_resource_uri(path: &str) -> Option<(&str, &str)> {
    let remainder = path.strip_prefix(RESOURCE_SCHEME)?;
    match remainder.split_once('/') {
        Some((key, rest)) => Some((key, rest)),
        None => Some((remainder, "")),
    }
}

/// Shortened, human-readable form of a generated file path
///
/// Only used for reporting; falls back to the full path.
pub fn display_path(path: &str) -> String {
    if let Some((key, rest)) = split_resource_uri(path) {
        return concatenate(&[key, "Resources", rest]);
    }

    let path = unix_style(path);
    for root in SOURCE_ROOT_SEGMENTS {
        let needle = format!("/{}/", root);
        if let Some(idx) = path.find(&needle) {
            // Keep the package directory in front of the source root
            let start = path[..idx].rfind('/').map(|i| i + 1).unwrap_or(0);
            return path[start..].to_string();
        }
    }
    path
}

/// Normalize separators, collapsing runs of `/` outside a scheme prefix
fn unix_style(path: &str) -> String {
    let path = path.replace('\\', "/");
    let (scheme, rest) = match path.find("://") {
        Some(i) => path.split_at(i + 3),
        None => ("", path.as_str()),
    };

    let mut normalized = String::with_capacity(path.len());
    normalized.push_str(scheme);
    let mut previous_slash = false;
    for c in rest.chars() {
        if c == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        normalized.push(c);
    }
    normalized
}
