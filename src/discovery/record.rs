//! Parsing of the published `dservice` text record.

/// Split a record into endpoint URLs, one per line.
///
/// Lines are trimmed and blank lines dropped. Order and duplicates are kept
/// as published; nothing is validated here.
pub fn parse_endpoints(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
