use alloc::{string::String, vec::Vec};

/// Parses a symbol list, one symbol per line.
///
/// Lines are trimmed; blank lines and lines starting with `#` are skipped.
///
/// # Examples
///
/// ```
/// # use return_statistics::parse_symbol_list;
/// let text = "# universe\nSPY\n\n  EFA \n#TLT\nEEM\n";
/// assert_eq!(parse_symbol_list(text), ["SPY", "EFA", "EEM"]);
/// ```
pub fn parse_symbol_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
