//! Synthesized video metadata models.

use serde::{Deserialize, Serialize};

/// Fixed block every generated description must start with, byte for
/// byte. Copy-to-clipboard flows and channel templates depend on the
/// exact bytes, embedded URLs included.
pub const DESCRIPTION_PREFIX: &str = "\
🚀 Create chapters, titles & tags for your videos in minutes → https://cuegen.app

📬 Weekly creator growth tips: https://cuegen.app/newsletter

";

/// Number of title and thumbnail-text variants the synthesizer produces.
pub const TITLE_VARIANT_COUNT: usize = 5;

/// SEO metadata synthesized for one video.
///
/// Produced once per pipeline run and returned verbatim to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    /// Candidate video titles (5 variants)
    pub video_titles: Vec<String>,

    /// Candidate thumbnail overlay texts (5 variants)
    pub thumbnail_titles: Vec<String>,

    /// Full description, starting with [`DESCRIPTION_PREFIX`]
    pub description: String,

    /// Comma-separated tag string
    pub tags: String,
}

impl VideoMetadata {
    /// Make the description-prefix contract structurally true: if the
    /// model dropped or mangled the prefix, prepend it to whatever text
    /// came back.
    pub fn with_enforced_prefix(mut self) -> Self {
        if !self.description.starts_with(DESCRIPTION_PREFIX) {
            let body = std::mem::take(&mut self.description);
            self.description = format!("{}{}", DESCRIPTION_PREFIX, body.trim_start());
        }
        self
    }

    /// Degraded value for the parse-failure path: no titles or tags,
    /// raw model text dumped into the description.
    pub fn degraded(raw_text: impl Into<String>) -> Self {
        Self {
            video_titles: Vec::new(),
            thumbnail_titles: Vec::new(),
            description: raw_text.into(),
            tags: String::new(),
        }
        .with_enforced_prefix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enforced_prefix_is_kept_when_present() {
        let m = VideoMetadata {
            video_titles: vec!["t".to_string(); 5],
            thumbnail_titles: vec!["th".to_string(); 5],
            description: format!("{}Hook line", DESCRIPTION_PREFIX),
            tags: "a,b".to_string(),
        }
        .with_enforced_prefix();
        assert!(m.description.starts_with(DESCRIPTION_PREFIX));
        // Not doubled
        assert_eq!(m.description.matches("🚀 Create chapters").count(), 1);
    }

    #[test]
    fn enforced_prefix_is_prepended_when_missing() {
        let m = VideoMetadata {
            video_titles: vec![],
            thumbnail_titles: vec![],
            description: "Hook line only".to_string(),
            tags: String::new(),
        }
        .with_enforced_prefix();
        assert!(m.description.starts_with(DESCRIPTION_PREFIX));
        assert!(m.description.ends_with("Hook line only"));
    }

    #[test]
    fn degraded_metadata_still_honors_prefix() {
        let m = VideoMetadata::degraded("model said something unparseable");
        assert!(m.description.starts_with(DESCRIPTION_PREFIX));
        assert!(m.video_titles.is_empty());
        assert!(m.tags.is_empty());
    }

    #[test]
    fn wire_format_is_camel_case() {
        let m = VideoMetadata::degraded("x");
        let json = serde_json::to_value(&m).unwrap();
        assert!(json.get("videoTitles").is_some());
        assert!(json.get("thumbnailTitles").is_some());
    }
}
