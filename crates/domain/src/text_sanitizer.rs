//! Markup removal for child-submitted text.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_BLOCK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").ok());

static MARKUP_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>").ok());

/// Removes script blocks and markup tags from text, then trims it.
///
/// Script bodies are dropped entirely; other tags are removed and their
/// inner text is kept.
#[must_use]
pub fn sanitize_text_content(content: &str) -> String {
    let (Some(script_block), Some(markup_tag)) = (SCRIPT_BLOCK.as_ref(), MARKUP_TAG.as_ref())
    else {
        return content.replace(['<', '>'], "").trim().to_owned();
    };

    let without_scripts = script_block.replace_all(content, "");
    markup_tag
        .replace_all(&without_scripts, "")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::sanitize_text_content;

    #[test]
    fn plain_text_is_only_trimmed() {
        assert_eq!(
            sanitize_text_content("  The dragon said hello.  "),
            "The dragon said hello."
        );
    }

    #[test]
    fn script_blocks_are_removed_with_their_body() {
        let sanitized =
            sanitize_text_content("Once <SCRIPT type=\"text/javascript\">steal()\n</script>upon");
        assert_eq!(sanitized, "Once upon");
    }

    #[test]
    fn tags_are_removed_but_text_is_kept() {
        assert_eq!(
            sanitize_text_content("<p>A <b>brave</b> knight</p>"),
            "A brave knight"
        );
    }

    #[test]
    fn separate_script_blocks_do_not_swallow_text_between_them() {
        let sanitized =
            sanitize_text_content("<script>a()</script>middle<script>b()</script>");
        assert_eq!(sanitized, "middle");
    }

    #[test]
    fn unclosed_script_tag_is_stripped_as_a_tag() {
        assert_eq!(sanitize_text_content("<script>alert(1)"), "alert(1)");
    }
}
