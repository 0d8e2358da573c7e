/// Extracts the count from a raw message body.
///
/// Takes the first whitespace-delimited token, strips every character that
/// is not an ASCII digit or decimal point, and parses the remainder as a
/// float. Returns `None` when nothing finite is left. A side effect of the
/// stripping rule is that sign characters never survive: negative values
/// are only reachable by counting down through the configured offset.
pub fn parse_count(text: &str) -> Option<f64> {
    let token = text.split_whitespace().next()?;
    let digits: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match digits.parse::<f64>() {
        Ok(count) if count.is_finite() => Some(count),
        _ => None,
    }
}
