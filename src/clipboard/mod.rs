//! Copy affordance binding for rendered HTML.
//!
//! Every rendered code block carries its original source
//! percent-encoded in a `data-code` attribute. After the HTML is
//! inserted, this module finds those affordances, decodes their
//! payloads, and writes them to the system clipboard. Clipboard writes
//! are fire-and-forget: permission may be denied without disrupting
//! the reading experience, so failures are logged, never surfaced.

use std::io::{stdout, Write};

use base64::Engine as _;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("invalid copy payload: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
    #[error("clipboard write failed: {0}")]
    Clipboard(#[from] std::io::Error),
}

/// One copy affordance found in rendered HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTarget {
    encoded: String,
}

impl CopyTarget {
    /// The original, unhighlighted source text.
    pub fn payload(&self) -> Result<String, CopyError> {
        Ok(urlencoding::decode(&self.encoded)?.into_owned())
    }
}

/// Scan rendered HTML for copy affordances in document order.
///
/// Only `data-code` attributes inside a `<button` open tag count.
/// Highlighted code text may contain the attribute string verbatim
/// (span text keeps quotes unescaped), but every `<` in text is
/// escaped, so message content cannot fabricate an open tag. The
/// payload itself is percent-encoded and so never contains `"` or `>`.
pub fn copy_targets(html: &str) -> Vec<CopyTarget> {
    const OPEN_TAG: &str = "<button";
    const ATTR: &str = "data-code=\"";

    let mut targets = Vec::new();
    let mut rest = html;
    while let Some(pos) = rest.find(OPEN_TAG) {
        rest = &rest[pos + OPEN_TAG.len()..];
        let Some(tag_end) = rest.find('>') else {
            break;
        };
        let tag = &rest[..tag_end];
        if let Some(attr_pos) = tag.find(ATTR) {
            let value = &tag[attr_pos + ATTR.len()..];
            if let Some(end) = value.find('"') {
                targets.push(CopyTarget {
                    encoded: value[..end].to_string(),
                });
            }
        }
        rest = &rest[tag_end..];
    }
    targets
}

/// Decode a target's payload and write it to the system clipboard.
///
/// Fire-and-forget per the pipeline's error policy.
pub fn copy_code(target: &CopyTarget) {
    let result = target
        .payload()
        .and_then(|text| copy_to_clipboard(&text).map_err(CopyError::from));
    if let Err(err) = result {
        tracing::warn!(error = %err, "copy to clipboard failed");
    }
}

fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        if copy_to_pbcopy(text).is_ok() {
            return Ok(());
        }
    }
    copy_to_clipboard_osc52(text)
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy failed"))
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
