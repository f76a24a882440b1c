use once_cell::sync::Lazy;
use regex::Regex;

static RETWEET_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^RT @\S+: ").expect("retweet pattern is valid"));
static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("url pattern is valid"));
static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(amp|lt|gt);").expect("entity pattern is valid"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Clean a free-text message field.
///
/// Passes run in a fixed order: retweet marker, URLs, HTML entities, then
/// whitespace. Each pass assumes the previous ones already ran.
pub fn sanitize_message(text: &str) -> String {
    let text = RETWEET_MARKER.replace(text, "");
    let text = URL.replace_all(&text, "");
    let text = ENTITY.replace_all(&text, |caps: &regex::Captures<'_>| match &caps[1] {
        "amp" => "&",
        "lt" => "<",
        _ => ">",
    });
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_marker_url_and_entities() {
        assert_eq!(
            sanitize_message("RT @alice: Check this out! https://example.com/x &amp; more"),
            "Check this out! & more"
        );
    }

    #[test]
    fn marker_only_removed_at_start() {
        assert_eq!(
            sanitize_message("quoting RT @bob: hello"),
            "quoting RT @bob: hello"
        );
    }

    #[test]
    fn removes_every_url() {
        assert_eq!(
            sanitize_message("a http://one.example b https://two.example/path?q=1 c"),
            "a b c"
        );
    }

    #[test]
    fn decodes_entities_once() {
        assert_eq!(sanitize_message("1 &lt; 2 &gt; 0"), "1 < 2 > 0");
        assert_eq!(sanitize_message("&amp;lt;"), "&lt;");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(sanitize_message("  line one\n\n\tline two  "), "line one line two");
    }

    #[test]
    fn empty_input() {
        assert_eq!(sanitize_message(""), "");
        assert_eq!(sanitize_message("   "), "");
    }
}
