use crate::toast::ToastQueue;
use std::time::Instant;
use thiserror::Error;
use url::form_urlencoded::byte_serialize;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share was cancelled by the user")]
    Cancelled,
    #[error("share failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub url: String,
}

/// Native share sheet. Platforms without one simply have no target.
pub trait ShareTarget {
    fn share(&mut self, request: &ShareRequest) -> Result<(), ShareError>;
}

pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLink {
    pub network: &'static str,
    pub url: String,
}

/// Manual-share modal shown when the native share is missing or fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareFallback {
    pub url: String,
    pub text: String,
    pub links: Vec<SocialLink>,
}

impl ShareFallback {
    pub fn new(request: &ShareRequest) -> Self {
        let url = encode(&request.url);
        let text = encode(&request.text);
        let links = vec![
            SocialLink {
                network: "X",
                url: format!("https://twitter.com/intent/tweet?text={text}&url={url}"),
            },
            SocialLink {
                network: "Facebook",
                url: format!("https://www.facebook.com/sharer/sharer.php?u={url}"),
            },
            SocialLink {
                network: "LinkedIn",
                url: format!("https://www.linkedin.com/sharing/share-offsite/?url={url}"),
            },
            SocialLink {
                network: "Email",
                url: format!("mailto:?subject={}&body={text}%20{url}", encode(&request.title)),
            },
        ];
        Self {
            url: request.url.clone(),
            text: request.text.clone(),
            links,
        }
    }
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareResult {
    Shared,
    /// The user closed the share sheet. Not an error.
    Cancelled,
    Fallback(ShareFallback),
}

pub fn share_or_fallback(
    target: Option<&mut (dyn ShareTarget + '_)>,
    request: &ShareRequest,
) -> ShareResult {
    let Some(target) = target else {
        return ShareResult::Fallback(ShareFallback::new(request));
    };
    match target.share(request) {
        Ok(()) => ShareResult::Shared,
        Err(ShareError::Cancelled) => {
            log::debug!("Share cancelled by user");
            ShareResult::Cancelled
        }
        Err(e) => {
            log::warn!("Native share failed, showing fallback: {e}");
            ShareResult::Fallback(ShareFallback::new(request))
        }
    }
}

/// Copies `text` and confirms with a toast. Failures are only logged.
pub fn copy_to_clipboard(
    clipboard: &mut dyn ClipboardWriter,
    text: &str,
    toasts: &mut ToastQueue,
    now: Instant,
) -> bool {
    match clipboard.write_text(text) {
        Ok(()) => {
            toasts.success("Link Copied", "The link is on your clipboard", now);
            true
        }
        Err(e) => {
            log::warn!("Failed to copy to clipboard: {e}");
            false
        }
    }
}
