//! `Link` response header parsing (RFC 8288 subset used by GitHub pagination).

/// Returns the URL of the `rel="next"` entry, if present.
///
/// Entries are comma-separated `<url>; param=value` groups. The `rel` value may
/// be quoted or bare and may list several space-separated relations.
///
/// # Example
/// ```rust
/// # use image_pin_sync::github::parse_next_link;
/// let header = r#"<https://api.github.com/x?page=2>; rel="next", <https://api.github.com/x?page=5>; rel="last""#;
/// assert_eq!(parse_next_link(header).as_deref(), Some("https://api.github.com/x?page=2"));
/// ```
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let url = target.strip_prefix('<')?.strip_suffix('>')?;

        let is_next = parts.any(|param| {
            let Some((key, value)) = param.split_once('=') else {
                return false;
            };
            key.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case("next"))
        });

        is_next.then(|| url.to_string())
    })
}
