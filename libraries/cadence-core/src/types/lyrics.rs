//! Lyrics lookup result

use serde::{Deserialize, Serialize};

/// Lyrics for a track, or an explicit "none available"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Lyrics {
    /// Lyrics text
    Text(String),
    /// Upstream has no lyrics for the track
    Missing,
}

impl Lyrics {
    /// Wrap upstream text, treating blank text as missing
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            Self::Missing
        } else {
            Self::Text(text)
        }
    }

    /// Text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Missing => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_missing() {
        assert_eq!(Lyrics::from_text("  \n"), Lyrics::Missing);
        assert_eq!(Lyrics::from_text("la la").text(), Some("la la"));
    }
}
