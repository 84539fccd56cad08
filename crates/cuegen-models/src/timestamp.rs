//! Display-timestamp formatting for chapter offsets.
//!
//! Chapter times use the display format clients copy into video
//! descriptions: `M:SS` / `MM:SS` for offsets under one hour and
//! `H:MM:SS` from one hour upward. Downstream display and
//! copy-to-clipboard logic assumes exactly this shape, so it is a
//! hard contract rather than a preference.

use thiserror::Error;

/// Maximum reasonable video duration (24 hours in seconds).
pub const MAX_VIDEO_DURATION_SECS: u32 = 86_400;

/// Format a second offset as a display timestamp.
///
/// Offsets under one hour have no hour component; minutes are not
/// zero-padded below ten. From one hour upward the hour component is
/// included and minutes/seconds are zero-padded.
///
/// # Examples
/// ```
/// use cuegen_models::timestamp::format_offset;
/// assert_eq!(format_offset(0), "0:00");
/// assert_eq!(format_offset(125), "2:05");
/// assert_eq!(format_offset(754), "12:34");
/// assert_eq!(format_offset(3600), "1:00:00");
/// assert_eq!(format_offset(3661), "1:01:01");
/// ```
pub fn format_offset(total_secs: u32) -> String {
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Parse a display timestamp back to a second offset.
///
/// Accepts the `M:SS`, `MM:SS`, and `H:MM:SS` shapes produced by
/// [`format_offset`], tolerating zero-padded minutes.
pub fn parse_offset(ts: &str) -> Result<u32, OffsetError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(OffsetError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    let parsed: Result<Vec<u32>, _> = parts
        .iter()
        .map(|p| {
            p.parse::<u32>()
                .map_err(|_| OffsetError::InvalidComponent(p.to_string()))
        })
        .collect();
    let parsed = parsed?;

    let total = match parsed.as_slice() {
        [mins, secs] => {
            if *secs >= 60 {
                return Err(OffsetError::ComponentOutOfRange("seconds", *secs));
            }
            mins * 60 + secs
        }
        [hours, mins, secs] => {
            if *mins >= 60 {
                return Err(OffsetError::ComponentOutOfRange("minutes", *mins));
            }
            if *secs >= 60 {
                return Err(OffsetError::ComponentOutOfRange("seconds", *secs));
            }
            hours * 3600 + mins * 60 + secs
        }
        _ => return Err(OffsetError::InvalidFormat(ts.to_string())),
    };

    if total > MAX_VIDEO_DURATION_SECS {
        return Err(OffsetError::ExceedsMaxDuration(total));
    }

    Ok(total)
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OffsetError {
    #[error("timestamp cannot be empty")]
    Empty,

    #[error("invalid timestamp component: {0}")]
    InvalidComponent(String),

    #[error("{0} value {1} out of range")]
    ComponentOutOfRange(&'static str, u32),

    #[error("invalid timestamp format '{0}', expected M:SS or H:MM:SS")]
    InvalidFormat(String),

    #[error("timestamp {0}s exceeds maximum video duration")]
    ExceedsMaxDuration(u32),
}
