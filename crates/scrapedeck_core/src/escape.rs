/// Neutralizes `&`, `<` and `>` so untrusted text can be inserted verbatim into markup.
///
/// The ampersand is replaced first; otherwise the `&` introduced by `&lt;` and
/// `&gt;` would be escaped a second time. Absent and empty input both yield `""`.
pub fn escape(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    if !text.contains(['&', '<', '>']) {
        return text.to_string();
    }
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Attribute-context variant: everything `escape` handles plus both quote characters.
pub fn escape_attr(text: &str) -> String {
    escape(Some(text))
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
