/// Sanitize Module
///
/// HTML escaping for values headed to storage. The five characters
/// significant in HTML text and attribute values are replaced by character
/// references, with `'` written as `&#039;`. Ampersands of existing
/// references are escaped again, so `&amp;` becomes `&amp;amp;`.

/// HTML-escapes `&`, `<`, `>`, `"` and `'`.
pub fn sanitize_data(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Reverses [`sanitize_data`], decoding any HTML character reference.
pub fn decode_entities(value: &str) -> String {
    html_escape::decode_html_entities(value).into_owned()
}
