/*!
    Encoded packet type.
*/

use crate::{MediaDuration, Pts, Rational};

/**
    An encoded media packet.

    Contains compressed data from a single stream, with timing information.
    Packets are the unit of data between the container reader and a
    decoder. A packet is owned by whoever read it and released by dropping
    it.
*/
#[derive(Clone, Debug)]
pub struct Packet {
    /// Compressed data.
    pub data: Vec<u8>,
    /// Index of the stream this packet belongs to.
    pub stream_index: usize,
    /// Presentation timestamp (when to display/play).
    pub pts: Option<Pts>,
    /// Decode timestamp (when to decode, may differ from PTS for B-frames).
    pub dts: Option<Pts>,
    /// Duration of this packet's content, zero if unknown.
    pub duration: MediaDuration,
    /// Time base the timestamps above are expressed in.
    pub time_base: Rational,
    /// Whether this is a keyframe (can be decoded independently).
    pub is_keyframe: bool,
}

impl Packet {
    /**
        Create a new packet without timing information.
    */
    pub fn new(data: Vec<u8>, stream_index: usize, time_base: Rational) -> Self {
        Self {
            data,
            stream_index,
            pts: None,
            dts: None,
            duration: MediaDuration(0),
            time_base,
            is_keyframe: false,
        }
    }

    /**
        Set the presentation and decode timestamps.
    */
    pub fn with_timestamps(mut self, pts: Option<Pts>, dts: Option<Pts>) -> Self {
        self.pts = pts;
        self.dts = dts;
        self
    }

    /**
        Set the packet duration.
    */
    pub fn with_duration(mut self, duration: MediaDuration) -> Self {
        self.duration = duration;
        self
    }

    /**
        Mark the packet as a keyframe.
    */
    pub fn with_keyframe(mut self, is_keyframe: bool) -> Self {
        self.is_keyframe = is_keyframe;
        self
    }

    /**
        Convert the packet's timestamps into another time base.

        PTS, DTS and a known duration are rescaled; unset timestamps stay
        unset. The packet's `time_base` is updated to `to`.
    */
    pub fn rescale_ts(&mut self, to: Rational) {
        let from = self.time_base;
        self.pts = self.pts.map(|pts| pts.rescale(from, to));
        self.dts = self.dts.map(|dts| dts.rescale(from, to));
        self.duration = self.duration.rescale(from, to);
        self.time_base = to;
    }

    /**
        Size of the compressed payload in bytes.
    */
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

// Ensure Packet is Send + Sync
static_assertions::assert_impl_all!(Packet: Send, Sync);
