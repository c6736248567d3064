//! Title escaping for embedding in generated artifacts.

/// Backslash-escape quotes, backslashes and NUL bytes.
///
/// Titles stored in the navigation tree are embedded verbatim in quoted
/// literals by the rendering tier.
#[must_use]
pub fn escape_quotes(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\'' | '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\0' => escaped.push_str("\\0"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Decode the HTML entities the content store encodes titles with.
///
/// Only `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&#039;` and `&#39;` are decoded;
/// anything else is left as is.
#[must_use]
pub fn decode_html_entities(value: &str) -> String {
    const ENTITIES: [(&str, char); 6] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#039;", '\''),
        ("&#39;", '\''),
    ];

    let mut decoded = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('&') {
        decoded.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES
            .iter()
            .find(|(entity, _)| rest.starts_with(entity))
        {
            Some((entity, c)) => {
                decoded.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_quotes("Rock 'n' roll"), "Rock \\'n\\' roll");
        assert_eq!(escape_quotes(r#"Say "hi""#), r#"Say \"hi\""#);
        assert_eq!(escape_quotes(r"C:\docs"), r"C:\\docs");
        assert_eq!(escape_quotes("a\0b"), "a\\0b");
    }

    #[test]
    fn test_escape_quotes_plain_text_unchanged() {
        assert_eq!(escape_quotes("About us"), "About us");
        assert_eq!(escape_quotes(""), "");
    }

    #[test]
    fn test_decode_html_entities() {
        assert_eq!(decode_html_entities("Q&amp;A"), "Q&A");
        assert_eq!(decode_html_entities("&lt;b&gt;"), "<b>");
        assert_eq!(decode_html_entities("&quot;x&quot; &#039;y&#39;"), "\"x\" 'y'");
    }

    #[test]
    fn test_decode_html_entities_unknown_left_alone() {
        assert_eq!(decode_html_entities("caf&eacute; & co"), "caf&eacute; & co");
        assert_eq!(decode_html_entities("trailing &"), "trailing &");
    }

    #[test]
    fn test_decode_does_not_double_decode() {
        assert_eq!(decode_html_entities("&amp;lt;"), "&lt;");
    }
}
