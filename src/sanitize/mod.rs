//! Allow-list HTML sanitization.
//!
//! The last line of defense for the rendering pipeline: whatever the
//! renderer emitted, only tags and attributes named by the policy
//! survive. Built on ammonia; script/style content is removed outright,
//! unknown structural tags are unwrapped keeping their text.

use ammonia::Builder;
use once_cell::sync::Lazy;

/// Allow-list additions layered over ammonia's conservative baseline.
///
/// The baseline already covers structural markup (paragraphs, lists,
/// tables, blockquotes, code). The additions exist for the rendering
/// pipeline's affordances: the copy button with its payload attribute,
/// task-list checkboxes, and the external-link target/rel pair.
#[derive(Debug, Clone)]
pub struct SanitizePolicy {
    /// Tags allowed beyond the baseline.
    pub extra_tags: Vec<&'static str>,
    /// Per-tag attribute allowances as (tag, attribute) pairs.
    pub tag_attributes: Vec<(&'static str, &'static str)>,
    /// Attributes allowed on every tag.
    pub generic_attributes: Vec<&'static str>,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        Self {
            extra_tags: vec!["button", "input"],
            tag_attributes: vec![
                ("button", "data-code"),
                ("button", "type"),
                ("input", "type"),
                ("input", "checked"),
                ("input", "disabled"),
                ("a", "target"),
                ("a", "rel"),
            ],
            generic_attributes: vec!["class"],
        }
    }
}

impl SanitizePolicy {
    fn builder(&self) -> Builder<'static> {
        let mut builder = Builder::default();
        builder.add_tags(self.extra_tags.iter().copied());
        for (tag, attribute) in self.tag_attributes.iter().copied() {
            builder.add_tag_attributes(tag, [attribute]);
        }
        builder.add_generic_attributes(self.generic_attributes.iter().copied());
        // The renderer decides rel/target per link; ammonia must not
        // rewrite them (and would reject an allowed rel otherwise).
        builder.link_rel(None);
        builder
    }
}

static DEFAULT_BUILDER: Lazy<Builder<'static>> =
    Lazy::new(|| SanitizePolicy::default().builder());

/// Sanitize HTML with the default policy.
///
/// Idempotent: a filtered document contains nothing left to strip, so
/// `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(html: &str) -> String {
    DEFAULT_BUILDER.clean(html).to_string()
}

/// Sanitize HTML with a custom policy.
pub fn sanitize_with(html: &str, policy: &SanitizePolicy) -> String {
    policy.builder().clean(html).to_string()
}
