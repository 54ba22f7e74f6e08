//! Text sanitization and slug helpers.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"<[^>]*>").expect("valid regex")
});

static DANGEROUS_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?is)<(script|style|iframe|object|embed)[^>]*>.*?</(script|style|iframe|object|embed)>")
        .expect("valid regex")
});

static DANGEROUS_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?i)</?(script|style|iframe|object|embed)[^>]*>").expect("valid regex")
});

static EVENT_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r#"(?i)\son\w+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).expect("valid regex")
});

static JS_URL_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r#"(?i)\s(href|src)\s*=\s*(["']?)\s*javascript:[^"'>\s]*(["']?)"#)
        .expect("valid regex")
});

/// Remove every HTML tag, keeping only text content.
#[must_use]
pub fn strip_tags(input: &str) -> String {
    TAG_RE.replace_all(input, "").trim().to_string()
}

/// Sanitize rich text: basic formatting markup survives, active content
/// (scripts, event handlers, javascript: URLs) does not.
#[must_use]
pub fn sanitize_rich_text(input: &str) -> String {
    let out = DANGEROUS_BLOCK_RE.replace_all(input, "");
    let out = DANGEROUS_TAG_RE.replace_all(&out, "");
    let out = EVENT_ATTR_RE.replace_all(&out, "");
    let out = JS_URL_ATTR_RE.replace_all(&out, "");
    out.trim().to_string()
}

/// Lowercase, non-alphanumeric runs collapsed to a single dash.
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_dash = true;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// Deterministic list slug: hashing the owner id keeps two owners who
/// reuse the same display name from colliding.
#[must_use]
pub fn list_slug(owner_id: &str, name: &str) -> String {
    format!("{:x}_{}", md5::compute(owner_id), slugify(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<b>Road</b> Trip"), "Road Trip");
        assert_eq!(strip_tags("plain"), "plain");
        assert_eq!(strip_tags("<script>alert(1)</script>"), "alert(1)");
        assert_eq!(strip_tags("  <i></i>  "), "");
    }

    #[test]
    fn test_sanitize_rich_text_keeps_formatting() {
        let input = "<p>Great <strong>coffee</strong> here</p>";
        assert_eq!(sanitize_rich_text(input), input);
    }

    #[test]
    fn test_sanitize_rich_text_drops_scripts() {
        let input = "before<script>alert(1)</script>after";
        assert_eq!(sanitize_rich_text(input), "beforeafter");
    }

    #[test]
    fn test_sanitize_rich_text_drops_event_handlers() {
        let input = r#"<a href="/x" onclick="steal()">link</a>"#;
        assert_eq!(sanitize_rich_text(input), r#"<a href="/x">link</a>"#);
    }

    #[test]
    fn test_sanitize_rich_text_drops_js_urls() {
        let input = r#"<a href="javascript:alert(1)">link</a>"#;
        assert_eq!(sanitize_rich_text(input), "<a>link</a>");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Road Trip"), "road-trip");
        assert_eq!(slugify("  Cafés & Bars!  "), "caf-s-bars");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_list_slug_owner_scoped() {
        let a = list_slug("user-a", "Road Trip");
        let b = list_slug("user-b", "Road Trip");
        assert_ne!(a, b);
        assert!(a.ends_with("_road-trip"));
        // Deterministic
        assert_eq!(a, list_slug("user-a", "Road Trip"));
    }
}
