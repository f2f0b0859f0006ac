/// Prefix marking a directory as a gist
pub const GIST_PREFIX: &str = "gist-";

/// Path used for the namespace root when a caller needs a directory
pub const ROOT_PATH: &str = "/";

/// Strips every leading and trailing slash
pub fn trim_slashes(path: &str) -> &str {
    path.trim_matches('/')
}

/// Returns the path without its final segment, or `None` when the path has
/// no parent segment (the caller treats that as the root).
pub fn parent_of(path: &str) -> Option<String> {
    trim_slashes(path)
        .rsplit_once('/')
        .map(|(parent, _)| trim_slashes(parent))
        .filter(|parent| !parent.is_empty())
        .map(str::to_string)
}

/// Raw final segment of a path. This is the key a node is stored under.
pub fn last_segment(path: &str) -> &str {
    let trimmed = trim_slashes(path);
    trimmed
        .rsplit_once('/')
        .map(|(_, segment)| segment)
        .unwrap_or(trimmed)
}

/// Display name of a path: its final segment, where a `gist-` prefix keeps
/// only what follows the first hyphen.
pub fn name_of(path: &str) -> String {
    let segment = last_segment(path);
    match segment.strip_prefix(GIST_PREFIX) {
        Some(rest) => rest.to_string(),
        None => segment.to_string(),
    }
}
