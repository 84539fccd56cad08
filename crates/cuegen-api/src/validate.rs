//! Input validation and sanitization.

use url::Url;

use cuegen_models::VideoReference;

/// Maximum context length accepted from a client, matching the cap the
/// pipeline applies on its own output.
pub const MAX_CONTEXT_LENGTH: usize = 100_000;

/// Maximum chapter count accepted for refinement.
pub const MAX_CHAPTER_COUNT: usize = 200;

/// Cloud-storage URI schemes the model backend can resolve.
const ALLOWED_CLOUD_SCHEMES: &[&str] = &["gs"];

/// Strip control characters and cap length.
pub fn sanitize_string(input: &str, max_len: usize) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .take(max_len)
        .collect()
}

/// Validate a video reference beyond its structural invariants.
///
/// Cloud URIs must use an allow-listed scheme; file handles must be
/// https URLs or bare `files/...` names (SSRF guard: stage handlers
/// fetch these URIs server-side).
pub fn validate_reference(reference: &VideoReference) -> Result<(), String> {
    reference.validate().map_err(|e| e.to_string())?;

    match reference {
        VideoReference::CloudUri { uri, .. } => {
            let parsed = Url::parse(uri).map_err(|_| format!("invalid cloud URI '{}'", uri))?;
            if !ALLOWED_CLOUD_SCHEMES.contains(&parsed.scheme()) {
                return Err(format!(
                    "cloud URI scheme '{}' is not supported",
                    parsed.scheme()
                ));
            }
            Ok(())
        }
        VideoReference::FileHandle { uri, .. } => {
            if uri.starts_with("files/") {
                return Ok(());
            }
            let parsed = Url::parse(uri).map_err(|_| format!("invalid file URI '{}'", uri))?;
            if parsed.scheme() != "https" {
                return Err("file handle URIs must use https".to_string());
            }
            Ok(())
        }
        VideoReference::Transcript { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuegen_models::TranscriptSegment;

    #[test]
    fn sanitize_strips_control_chars_and_caps() {
        assert_eq!(sanitize_string("a\u{0}b\nc", 100), "ab\nc");
        assert_eq!(sanitize_string("abcdef", 3), "abc");
    }

    #[test]
    fn cloud_uri_scheme_allow_list() {
        let ok = VideoReference::CloudUri {
            uri: "gs://bucket/path.mp4".to_string(),
            mime_type: "video/mp4".to_string(),
        };
        assert!(validate_reference(&ok).is_ok());

        let bad = VideoReference::CloudUri {
            uri: "file:///etc/passwd".to_string(),
            mime_type: "video/mp4".to_string(),
        };
        assert!(validate_reference(&bad).is_err());
    }

    #[test]
    fn file_handle_accepts_bare_names_and_https() {
        let bare = VideoReference::FileHandle {
            uri: "files/abc123".to_string(),
            mime_type: "video/mp4".to_string(),
        };
        assert!(validate_reference(&bare).is_ok());

        let http = VideoReference::FileHandle {
            uri: "http://internal.host/files/abc".to_string(),
            mime_type: "video/mp4".to_string(),
        };
        assert!(validate_reference(&http).is_err());
    }

    #[test]
    fn structural_validation_still_applies() {
        let bad = VideoReference::Transcript {
            segments: vec![
                TranscriptSegment {
                    start_seconds: 5.0,
                    text: "b".to_string(),
                },
                TranscriptSegment {
                    start_seconds: 1.0,
                    text: "a".to_string(),
                },
            ],
        };
        assert!(validate_reference(&bad).is_err());
    }
}
