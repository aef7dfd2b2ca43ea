use regex::RegexBuilder;

/// Opening marker wrapped around every query match
pub const HIGHLIGHT_OPEN: &str = "<mark class=\"search-highlight\">";

/// Closing marker
pub const HIGHLIGHT_CLOSE: &str = "</mark>";

/// Escape the five HTML-significant characters
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape a message, then wrap every case-insensitive occurrence of the
/// query with highlight markers.
///
/// The message is escaped before matching and the query is regex-escaped so
/// it matches literally. The matched text keeps its original casing.
pub fn highlight_matches(message: &str, query: &str) -> String {
    let escaped = escape_html(message);
    if query.is_empty() {
        return escaped;
    }

    let pattern = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(_) => return escaped,
    };

    pattern
        .replace_all(&escaped, |caps: &regex::Captures| {
            format!("{HIGHLIGHT_OPEN}{}{HIGHLIGHT_CLOSE}", &caps[0])
        })
        .into_owned()
}
