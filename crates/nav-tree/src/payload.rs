//! Parsing of the per-page metadata and payload blobs.
//!
//! Both blobs are JSON objects. A blob that fails to parse is treated as
//! absent: the page keeps its id-based classification.

use serde::Deserialize;
use serde_json::Value;

use crate::node::Redirect;

/// Redirect status used when the payload omits a usable code.
pub const DEFAULT_REDIRECT_CODE: u16 = 301;

#[derive(Deserialize)]
struct RawMetadata {
    #[serde(default)]
    seo_follow: Option<String>,
}

#[derive(Deserialize)]
struct RawPayload {
    #[serde(default)]
    internal_redirect: Option<RawRedirect>,
    #[serde(default)]
    external_redirect: Option<RawRedirect>,
    #[serde(default)]
    is_action: Value,
}

#[derive(Deserialize)]
struct RawRedirect {
    #[serde(default)]
    page_id: Value,
    #[serde(default)]
    url: Value,
    #[serde(default)]
    code: Value,
}

/// Interpreted page payload.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct PagePayload {
    /// Internal redirect, if the payload names a target page.
    pub internal: Option<Redirect>,
    /// External redirect, if the payload names a target URL.
    pub external: Option<Redirect>,
    /// Payload marks the page as a direct action.
    pub is_action: bool,
}

/// Whether the metadata blob sets `seo_follow` to `nofollow`.
pub(crate) fn parse_no_follow(page_id: u32, meta_data: Option<&str>) -> bool {
    let Some(blob) = meta_data else {
        return false;
    };
    match serde_json::from_str::<RawMetadata>(blob) {
        Ok(meta) => meta.seo_follow.as_deref() == Some("nofollow"),
        Err(e) => {
            tracing::debug!(page_id, error = %e, "Ignoring malformed page metadata");
            false
        }
    }
}

/// Parse the payload blob, `None` when absent or malformed.
pub(crate) fn parse_payload(page_id: u32, data: Option<&str>) -> Option<PagePayload> {
    let raw = match serde_json::from_str::<RawPayload>(data?) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!(page_id, error = %e, "Ignoring malformed page payload");
            return None;
        }
    };

    let internal = raw.internal_redirect.and_then(|redirect| {
        Some(Redirect::Internal {
            page_id: parse_page_id(&redirect.page_id)?,
            code: parse_code(&redirect.code),
        })
    });
    let external = raw.external_redirect.and_then(|redirect| match redirect.url {
        Value::String(url) if !url.is_empty() => Some(Redirect::External {
            url,
            code: parse_code(&redirect.code),
        }),
        _ => None,
    });

    Some(PagePayload {
        internal,
        external,
        is_action: is_truthy(&raw.is_action),
    })
}

/// A page id given as a number or a numeric string; empty or `0` means no target.
fn parse_page_id(value: &Value) -> Option<u32> {
    let page_id = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    page_id.filter(|&page_id| page_id != 0)
}

fn parse_code(value: &Value) -> u16 {
    let code = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    code.unwrap_or(DEFAULT_REDIRECT_CODE)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n.abs() > 0.0),
        Value::String(s) => !matches!(s.as_str(), "" | "0" | "N" | "false"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
        Value::Null => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_follow() {
        assert!(parse_no_follow(2, Some(r#"{"seo_follow": "nofollow"}"#)));
        assert!(!parse_no_follow(2, Some(r#"{"seo_follow": "follow"}"#)));
        assert!(!parse_no_follow(2, Some("{}")));
        assert!(!parse_no_follow(2, None));
    }

    #[test]
    fn test_no_follow_malformed_is_false() {
        assert!(!parse_no_follow(2, Some("a:1:{s:10:\"seo_follow\"")));
    }

    #[test]
    fn test_payload_absent() {
        assert_eq!(parse_payload(2, None), None);
    }

    #[test]
    fn test_payload_malformed_is_absent() {
        assert_eq!(parse_payload(2, Some("not json")), None);
        assert_eq!(parse_payload(2, Some("[1, 2]")), None);
    }

    #[test]
    fn test_payload_internal_redirect() {
        let payload = parse_payload(
            2,
            Some(r#"{"internal_redirect": {"page_id": "7", "code": "302"}}"#),
        )
        .unwrap();

        assert_eq!(
            payload.internal,
            Some(Redirect::Internal {
                page_id: 7,
                code: 302
            })
        );
        assert_eq!(payload.external, None);
        assert!(!payload.is_action);
    }

    #[test]
    fn test_payload_empty_internal_target_ignored() {
        let payload =
            parse_payload(2, Some(r#"{"internal_redirect": {"page_id": "", "code": 301}}"#))
                .unwrap();
        assert_eq!(payload.internal, None);
    }

    #[test]
    fn test_payload_external_redirect_default_code() {
        let payload = parse_payload(
            2,
            Some(r#"{"external_redirect": {"url": "https://example.com"}}"#),
        )
        .unwrap();

        assert_eq!(
            payload.external,
            Some(Redirect::External {
                url: "https://example.com".to_owned(),
                code: DEFAULT_REDIRECT_CODE
            })
        );
    }

    #[test]
    fn test_payload_empty_external_url_ignored() {
        let payload =
            parse_payload(2, Some(r#"{"external_redirect": {"url": "", "code": 301}}"#)).unwrap();
        assert_eq!(payload.external, None);
    }

    #[test]
    fn test_payload_is_action_truthiness() {
        for (blob, expected) in [
            (r#"{"is_action": true}"#, true),
            (r#"{"is_action": 1}"#, true),
            (r#"{"is_action": "Y"}"#, true),
            (r#"{"is_action": false}"#, false),
            (r#"{"is_action": "N"}"#, false),
            (r#"{"is_action": 0}"#, false),
            ("{}", false),
        ] {
            let payload = parse_payload(2, Some(blob)).unwrap();
            assert_eq!(payload.is_action, expected, "blob {blob}");
        }
    }
}
