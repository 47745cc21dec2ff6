//! Playback and timeline protocol.
//!
//! The timeline cursor is a single scalar in `[0, page.duration]`. While
//! playing it advances by a fixed quantum per tick; a tick that would reach
//! the end stops playback and rewinds to the start. Scrubbing bypasses the
//! tick and clamps directly.
//!
//! The cursor decides which clips are *active* on the track view only. The
//! canvas always shows the page's static arrangement.

use serde::{Deserialize, Serialize};

use crate::{Element, ElementId, ElementType, Page};

/// Result of advancing the cursor by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// Playback continues at the new position.
    Advanced(f64),
    /// The end was reached: playback stops and the cursor rewinds to 0.
    Finished,
}

/// Advance `position` by `quantum` within a page of length `duration`.
#[must_use]
pub fn advance(position: f64, duration: f64, quantum: f64) -> TickOutcome {
    let next = position + quantum;
    if next >= duration {
        TickOutcome::Finished
    } else {
        TickOutcome::Advanced(next)
    }
}

/// Clamp a scrub target into `[0, duration]`.
#[must_use]
pub fn clamp_position(seconds: f64, duration: f64) -> f64 {
    if seconds.is_nan() {
        return 0.0;
    }
    seconds.clamp(0.0, duration.max(0.0))
}

/// Convert a pointer offset on the ruler (plus horizontal scroll) to seconds.
#[must_use]
pub fn pointer_to_seconds(offset_px: f64, scroll_px: f64, pixels_per_second: f64) -> f64 {
    (offset_px + scroll_px) / pixels_per_second
}

/// Ruler marks every `step` seconds from 0 up to and including `duration`.
#[must_use]
pub fn time_markers(duration: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 {
        return Vec::new();
    }
    std::iter::successors(Some(0.0), |t| Some(t + step))
        .take_while(|t| *t <= duration)
        .collect()
}

/// Format seconds as `m:ss`.
#[must_use]
pub fn format_timecode(seconds: f64) -> String {
    // Negative and fractional parts are not shown on the ruler.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Timeline track rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Image clips.
    Image,
    /// Video clips.
    Video,
    /// Text clips.
    Text,
    /// Audio clips.
    Audio,
}

impl TrackKind {
    /// Rows in display order.
    pub const ALL: [Self; 4] = [Self::Image, Self::Video, Self::Text, Self::Audio];

    /// The track an element type is shown on. QR codes have no track.
    #[must_use]
    pub const fn for_type(element_type: ElementType) -> Option<Self> {
        match element_type {
            ElementType::Image => Some(Self::Image),
            ElementType::Video => Some(Self::Video),
            ElementType::Text => Some(Self::Text),
            ElementType::Audio => Some(Self::Audio),
            ElementType::QrCode => None,
        }
    }
}

/// One element's window on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineClip {
    /// The element shown.
    pub element_id: ElementId,
    /// Label.
    pub name: String,
    /// Window start, seconds.
    pub start: f64,
    /// Window end, seconds.
    pub end: f64,
    /// Whether the cursor is inside the window.
    pub active: bool,
    /// Whether the element is selected.
    pub selected: bool,
}

/// A row of clips of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineTrack {
    /// Row kind.
    pub kind: TrackKind,
    /// Clips in element order.
    pub clips: Vec<TimelineClip>,
}

/// Group a page's elements into timeline tracks.
#[must_use]
pub fn timeline_tracks(
    page: &Page,
    cursor: f64,
    selected: Option<&ElementId>,
) -> Vec<TimelineTrack> {
    TrackKind::ALL
        .iter()
        .map(|&kind| TimelineTrack {
            kind,
            clips: page
                .elements
                .iter()
                .filter(|e| TrackKind::for_type(e.element_type()) == Some(kind))
                .map(|e| clip(e, cursor, selected))
                .collect(),
        })
        .collect()
}

fn clip(element: &Element, cursor: f64, selected: Option<&ElementId>) -> TimelineClip {
    TimelineClip {
        element_id: element.id.clone(),
        name: element.name.clone(),
        start: element.start_time,
        end: element.end_time(),
        active: element.is_active_at(cursor),
        selected: selected == Some(&element.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{AudioContent, ElementKind, QrCodeContent};

    #[test]
    fn test_advance_stops_when_reaching_end() {
        assert_eq!(advance(0.0, 180.0, 0.1), TickOutcome::Advanced(0.1));
        assert_eq!(advance(179.95, 180.0, 0.1), TickOutcome::Finished);
        assert_eq!(advance(200.0, 180.0, 0.1), TickOutcome::Finished);
    }

    #[test]
    fn test_clamp_position() {
        assert!((clamp_position(200.0, 180.0) - 180.0).abs() < f64::EPSILON);
        assert!(clamp_position(-5.0, 180.0).abs() < f64::EPSILON);
        assert!((clamp_position(42.5, 180.0) - 42.5).abs() < f64::EPSILON);
        assert!(clamp_position(f64::NAN, 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pointer_to_seconds() {
        assert!((pointer_to_seconds(250.0, 50.0, 10.0) - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_time_markers_every_minute() {
        assert_eq!(time_markers(180.0, 60.0), vec![0.0, 60.0, 120.0, 180.0]);
        assert_eq!(time_markers(90.0, 60.0), vec![0.0, 60.0]);
        assert!(time_markers(90.0, 0.0).is_empty());
    }

    #[test]
    fn test_format_timecode() {
        assert_eq!(format_timecode(0.0), "0:00");
        assert_eq!(format_timecode(65.7), "1:05");
        assert_eq!(format_timecode(180.0), "3:00");
    }

    #[test]
    fn test_tracks_group_by_type_and_mark_active() {
        let audio = Element::new(
            "Audio.mp3",
            ElementKind::Audio(AudioContent {
                src: "a.mp3".into(),
                volume: 75,
                fade_in: 1.5,
                fade_out: 1.5,
            }),
        )
        .with_timing(0.0, 180.0);
        let qr = Element::new(
            "QR Code",
            ElementKind::QrCode(QrCodeContent {
                data: "x".into(),
                title: None,
            }),
        );
        let page = Page::new("P", 180.0, "#fff").with_elements(vec![qr, audio.clone()]);

        let tracks = timeline_tracks(&page, 12.0, Some(&audio.id));
        assert_eq!(tracks.len(), 4);
        assert!(tracks[..3].iter().all(|t| t.clips.is_empty()));
        let audio_track = &tracks[3];
        assert_eq!(audio_track.kind, TrackKind::Audio);
        assert_eq!(audio_track.clips.len(), 1);
        assert!(audio_track.clips[0].active);
        assert!(audio_track.clips[0].selected);
        assert!((audio_track.clips[0].end - 180.0).abs() < f64::EPSILON);
    }
}
