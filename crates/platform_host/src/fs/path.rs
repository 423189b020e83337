//! Path resolution for the virtual file system cursor.

/// Resolves `path` against the `base` segment list.
///
/// A leading `/` makes the path absolute. Backslashes count as separators, empty and `.`
/// segments are dropped, and `..` pops one segment (never above the root).
pub fn resolve_segments(base: &[String], path: &str) -> Vec<String> {
    let path = path.trim().replace('\\', "/");
    let mut out: Vec<String> = if path.starts_with('/') {
        Vec::new()
    } else {
        base.to_vec()
    };

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            name => out.push(name.to_string()),
        }
    }
    out
}

/// Joins cursor segments into the display form, `/` for the root.
pub fn join_segments(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}
