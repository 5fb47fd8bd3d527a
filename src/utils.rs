//! Small string helpers used by the locator and for log output.

/// Build the naive URL slug for a company name.
///
/// Lower-cases the name and replaces spaces with hyphens. The result is a
/// best-effort guess and is never checked against the target site.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(company_slug("Acme Corp"), "acme-corp");
/// ```
pub fn company_slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Encode a company name for a search query string: each word is
/// percent-encoded and words are joined with `+`.
pub fn search_query(name: &str) -> String {
    name.split(' ')
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}

/// `true` when the input already names a page rather than a company.
pub fn looks_like_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) and get
/// `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
