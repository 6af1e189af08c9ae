//! Cleanup applied to EFetch XML before parsing

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

/// Remove inline formatting tags (`<i>`, `<sup>`, `<sub>`, ...) so that titles
/// and affiliations come through as a single text node.
///
/// Tags carrying attributes (`<sup class="x">`) are removed as well. Structural
/// elements are left untouched.
pub(crate) fn strip_inline_tags(xml: &str) -> Cow<'_, str> {
    static INLINE_TAG: OnceLock<Regex> = OnceLock::new();
    let re = INLINE_TAG.get_or_init(|| {
        Regex::new(r"</?(?:i|b|u|sup|sub|em|strong|italic|bold|sc)(?:\s[^>]*)?/?>")
            .expect("inline tag pattern is valid")
    });

    let cleaned = re.replace_all(xml, "");
    if let Cow::Owned(ref owned) = cleaned {
        debug!(
            removed_bytes = xml.len() - owned.len(),
            "Stripped inline formatting tags"
        );
    }
    cleaned
}
