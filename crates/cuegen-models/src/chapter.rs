//! Chapter models.

use serde::{Deserialize, Serialize};

/// A timestamp + title pair describing one segment of a video.
///
/// `time` uses the display format from [`crate::timestamp`]: `M:SS` /
/// `MM:SS` under one hour, `H:MM:SS` from one hour upward. The refiner
/// fills `original_title` and `suggestions` when it rewrites a title;
/// the generator leaves them unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Display-formatted offset of the chapter start
    pub time: String,

    /// Chapter title (rewritten in place by the refiner)
    pub title: String,

    /// Title as produced by the generator, before refinement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,

    /// Autocomplete suggestions gathered for the original title,
    /// relevance-ordered by the upstream source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl Chapter {
    /// Create a bare chapter as the generator emits it.
    pub fn new(time: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            title: title.into(),
            original_title: None,
            suggestions: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_chapter_serializes_to_wire_pair() {
        let c = Chapter::new("2:05", "Welcome to the Demo");
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"time":"2:05","title":"Welcome to the Demo"}"#);
    }

    #[test]
    fn enriched_chapter_round_trips() {
        let c = Chapter {
            time: "0:00".to_string(),
            title: "Nano Banana 2".to_string(),
            original_title: Some("nanobana 20".to_string()),
            suggestions: Some(vec!["Nano Banana 2 review".to_string()]),
        };
        let back: Chapter = serde_json::from_str(&serde_json::to_string(&c).unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn wire_pair_deserializes_without_optional_fields() {
        let c: Chapter = serde_json::from_str(r#"{"time":"1:00:00","title":"Outro"}"#).unwrap();
        assert_eq!(c.time, "1:00:00");
        assert!(c.original_title.is_none());
        assert!(c.suggestions.is_none());
    }
}
