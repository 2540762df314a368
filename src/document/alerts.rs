//! Alert directive detection for blockquotes.
//!
//! A blockquote whose text opens with a marker like `[!WARNING]` is
//! promoted to a styled alert card. Detection is case-insensitive and
//! tolerates surrounding whitespace; anything short of a full marker
//! (`[!WARN]`, `[!`) is not a directive and the quote renders plain.

/// The recognized alert flavors, each with a fixed presentation triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertKind {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Note => "alert-note",
            Self::Tip => "alert-tip",
            Self::Important => "alert-important",
            Self::Warning => "alert-warning",
            Self::Caution => "alert-caution",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Note => "ℹ",
            Self::Tip => "💡",
            Self::Important => "❗",
            Self::Warning => "⚠",
            Self::Caution => "🛑",
        }
    }

    /// Title shown on the alert card. The lookup is the seam where
    /// localization would plug in.
    pub fn title(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Tip => "Tip",
            Self::Important => "Important",
            Self::Warning => "Warning",
            Self::Caution => "Caution",
        }
    }
}

/// Ordered (marker, kind) pairs, evaluated first-match-wins.
///
/// The markers are mutually exclusive by construction; the ordering
/// documents intended precedence.
const ALERT_DIRECTIVES: &[(&str, AlertKind)] = &[
    ("[!NOTE]", AlertKind::Note),
    ("[!TIP]", AlertKind::Tip),
    ("[!IMPORTANT]", AlertKind::Important),
    ("[!WARNING]", AlertKind::Warning),
    ("[!CAUTION]", AlertKind::Caution),
];

/// A directive found at the start of blockquote text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertMatch {
    pub kind: AlertKind,
    /// Bytes to strip from the start of the matched text, covering
    /// leading whitespace, the marker, and whitespace after it.
    pub strip_len: usize,
}

/// Scan the opening of blockquote text for an alert directive.
pub fn detect(text: &str) -> Option<AlertMatch> {
    let trimmed = text.trim_start();
    let offset = text.len() - trimmed.len();
    for (marker, kind) in ALERT_DIRECTIVES {
        let Some(head) = trimmed.get(..marker.len()) else {
            continue;
        };
        if head.eq_ignore_ascii_case(marker) {
            let rest = &trimmed[marker.len()..];
            let after_ws = rest.len() - rest.trim_start().len();
            return Some(AlertMatch {
                kind: *kind,
                strip_len: offset + marker.len() + after_ws,
            });
        }
    }
    None
}
