/// Produce the canonical form of an extracted reference.
///
/// Query strings and fragments are dropped, backslashes become forward slashes and every leading
/// `.` or `/` character is stripped, so `./img/a.png`, `/img/a.png` and `../img/a.png?ver=2` all
/// normalise to `img/a.png`. Returns `None` when nothing path-like remains.
pub fn normalize_reference(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let without_query = trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .replace('\\', "/");
    let stripped = without_query.trim_start_matches(['.', '/']);

    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}
