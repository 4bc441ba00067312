/*!
    Decoded frame type.
*/

use crate::{Pts, Rational, StreamType};

/**
    Metadata describing what a decoded frame holds.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameInfo {
    /// The frame holds nothing (freshly created or cleared).
    #[default]
    Empty,
    /// A decoded picture.
    Video {
        width: u32,
        height: u32,
        sample_aspect_ratio: Rational,
    },
    /// A block of decoded audio samples.
    Audio {
        /// Number of samples per channel.
        samples: usize,
        channels: u16,
        sample_rate: u32,
    },
}

/**
    A decoded output unit: raw pixels or samples plus metadata.

    A single frame is meant to be reused for a whole decode run. Decoders
    write into it, the consumer reads it, and [`Frame::clear`] resets it
    before the next decode. Clearing keeps the data allocation so the
    buffer is not reallocated for every packet.
*/
#[derive(Clone, Debug, Default)]
pub struct Frame {
    /**
        Raw plane data, planes stored back to back.

        Video planes keep the decoder's line padding. Audio planes are in
        the decoder's native sample layout.
    */
    pub data: Vec<u8>,
    /// What the frame holds.
    pub info: FrameInfo,
    /// Presentation timestamp assigned to the frame.
    pub pts: Option<Pts>,
    /// DTS of the packet that produced this frame.
    pub pkt_dts: Option<Pts>,
    /// The decoder's best-effort timestamp estimate.
    pub best_effort_timestamp: Option<Pts>,
    /// Time base the timestamps above are expressed in.
    pub time_base: Option<Rational>,
}

impl Frame {
    /**
        Create an empty frame.
    */
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Stream type of the frame contents, or None if the frame is empty.
    */
    pub fn stream_type(&self) -> Option<StreamType> {
        match self.info {
            FrameInfo::Empty => None,
            FrameInfo::Video { .. } => Some(StreamType::Video),
            FrameInfo::Audio { .. } => Some(StreamType::Audio),
        }
    }

    /**
        The most reliable timestamp available for this frame.

        Prefers the decoder's best-effort estimate, then the frame's own
        PTS, then the DTS of the packet it came from.
    */
    pub fn best_effort_pts(&self) -> Option<Pts> {
        self.best_effort_timestamp.or(self.pts).or(self.pkt_dts)
    }

    /**
        Returns the presentation time as a Duration, if PTS and time base are set.
    */
    pub fn presentation_time(&self) -> Option<std::time::Duration> {
        Some(self.pts?.to_duration(self.time_base?))
    }

    /**
        Reset the frame to its empty state, keeping the data allocation.
    */
    pub fn clear(&mut self) {
        self.data.clear();
        self.info = FrameInfo::Empty;
        self.pts = None;
        self.pkt_dts = None;
        self.best_effort_timestamp = None;
        self.time_base = None;
    }

    /**
        Returns true if the frame holds no decoded data or metadata.
    */
    pub fn is_cleared(&self) -> bool {
        self.data.is_empty()
            && self.info == FrameInfo::Empty
            && self.pts.is_none()
            && self.pkt_dts.is_none()
            && self.best_effort_timestamp.is_none()
            && self.time_base.is_none()
    }
}

// Ensure frames are Send + Sync
static_assertions::assert_impl_all!(Frame: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_frame_is_cleared() {
        let frame = Frame::new();
        assert!(frame.is_cleared());
        assert_eq!(frame.stream_type(), None);
    }

    #[test]
    fn clear_resets_everything_but_keeps_capacity() {
        let mut frame = Frame::new();
        frame.data.extend_from_slice(&[1u8; 4096]);
        frame.info = FrameInfo::Video {
            width: 64,
            height: 64,
            sample_aspect_ratio: Rational::new(1, 1),
        };
        frame.pts = Some(Pts(10));
        frame.best_effort_timestamp = Some(Pts(10));
        frame.time_base = Some(Rational::new(1, 25));
        let capacity = frame.data.capacity();

        assert!(!frame.is_cleared());
        assert_eq!(frame.stream_type(), Some(StreamType::Video));

        frame.clear();

        assert!(frame.is_cleared());
        assert_eq!(frame.data.capacity(), capacity);
    }

    #[test]
    fn best_effort_prefers_estimate() {
        let frame = Frame {
            pts: Some(Pts(5)),
            pkt_dts: Some(Pts(4)),
            best_effort_timestamp: Some(Pts(6)),
            ..Frame::default()
        };
        assert_eq!(frame.best_effort_pts(), Some(Pts(6)));
    }

    #[test]
    fn best_effort_falls_back_through_sources() {
        let frame = Frame {
            pts: Some(Pts(5)),
            pkt_dts: Some(Pts(4)),
            ..Frame::default()
        };
        assert_eq!(frame.best_effort_pts(), Some(Pts(5)));

        let frame = Frame {
            pkt_dts: Some(Pts(4)),
            ..Frame::default()
        };
        assert_eq!(frame.best_effort_pts(), Some(Pts(4)));

        assert_eq!(Frame::default().best_effort_pts(), None);
    }

    #[test]
    fn presentation_time_needs_pts_and_time_base() {
        let mut frame = Frame {
            pts: Some(Pts(50)),
            ..Frame::default()
        };
        assert_eq!(frame.presentation_time(), None);

        frame.time_base = Some(Rational::new(1, 25));
        assert_eq!(
            frame.presentation_time(),
            Some(std::time::Duration::from_secs(2))
        );
    }

    #[test]
    fn audio_frame_type() {
        let frame = Frame {
            info: FrameInfo::Audio {
                samples: 1024,
                channels: 2,
                sample_rate: 48000,
            },
            ..Frame::default()
        };
        assert_eq!(frame.stream_type(), Some(StreamType::Audio));
    }
}
