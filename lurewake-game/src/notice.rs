//! Side-effect descriptors handed to the presentation layer.
//!
//! The engine never renders, plays audio, or waits on the UI. Every action
//! returns the notices it produced; hosts drain and display them.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Inline capacity covers a typical catch resolution without allocating.
pub type Notices = SmallVec<[Notice; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Info,
    Success,
    Warning,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Cast,
    Splash,
    Bite,
    Reel,
    Snap,
    Catch,
    Fanfare,
    Coins,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Toast message keyed for localization with an optional detail string.
    Toast {
        key: String,
        tone: Tone,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    /// Floating text spawned over the water (amounts, "PERFECT!", ...).
    FloatingText { text: String },
    Sound(SoundCue),
}

impl Notice {
    #[must_use]
    pub fn toast(key: &str, tone: Tone) -> Self {
        Self::Toast {
            key: key.to_string(),
            tone,
            detail: None,
        }
    }

    #[must_use]
    pub fn toast_with(key: &str, tone: Tone, detail: impl Into<String>) -> Self {
        Self::Toast {
            key: key.to_string(),
            tone,
            detail: Some(detail.into()),
        }
    }

    #[must_use]
    pub fn floating(text: impl Into<String>) -> Self {
        Self::FloatingText { text: text.into() }
    }

    /// Toast key, if this is a toast.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Toast { key, .. } => Some(key),
            Self::FloatingText { .. } | Self::Sound(_) => None,
        }
    }
}

/// Whether any notice in the list is a toast with the given key.
#[must_use]
pub fn has_toast(notices: &[Notice], key: &str) -> bool {
    notices.iter().any(|n| n.key() == Some(key))
}
