use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Media hosts the bot accepts links for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    YouTube,
    Instagram,
    TikTok,
    Vimeo,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::YouTube,
        Provider::Instagram,
        Provider::TikTok,
        Provider::Vimeo,
    ];

    /// Lowercase substrings that identify this provider inside a link.
    #[must_use]
    pub fn markers(self) -> &'static [&'static str] {
        match self {
            Self::YouTube => &["youtube.com", "youtu.be"],
            Self::Instagram => &["instagram.com", "instagr.am"],
            Self::TikTok => &["tiktok.com"],
            Self::Vimeo => &["vimeo.com"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClass {
    /// `url` is the message token carrying the marker, with wrapping stripped.
    Supported { provider: Provider, url: String },
    Unsupported,
}

impl LinkClass {
    #[must_use]
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Supported { .. })
    }
}

/// Substring-based link classification. The extractor is the real validator;
/// anything carrying a known marker is passed through.
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    providers: Vec<Provider>,
}

impl Default for LinkClassifier {
    fn default() -> Self {
        Self::new(Provider::ALL.to_vec())
    }
}

impl LinkClassifier {
    pub fn new(providers: Vec<Provider>) -> Self {
        Self { providers }
    }

    #[must_use]
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    #[must_use]
    pub fn classify(&self, text: &str) -> LinkClass {
        for token in text.split_whitespace() {
            let candidate = clean_candidate(token);
            let lowered = candidate.to_ascii_lowercase();
            for provider in &self.providers {
                if provider
                    .markers()
                    .iter()
                    .any(|marker| lowered.contains(marker))
                {
                    return LinkClass::Supported {
                        provider: *provider,
                        url: candidate.to_string(),
                    };
                }
            }
        }
        LinkClass::Unsupported
    }
}

fn clean_candidate(token: &str) -> &str {
    if let Some(start) = token.find("](")
        && let Some(end) = token[start..].find(')')
    {
        return &token[start + 2..start + end];
    }

    let stripped = token
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(token);

    let stripped = stripped
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(stripped);

    strip_trailing_punctuation(stripped)
}

fn strip_trailing_punctuation(s: &str) -> &str {
    s.trim_end_matches(['.', ',', ';', '!', '?', ')'])
}
