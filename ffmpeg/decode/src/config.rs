/*!
    Probe and decode configuration types.
*/

use ffmpeg_types::StreamType;

/**
    Filter for selecting which stream types get a decoder.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamFilter {
    /// Only bind a video stream.
    VideoOnly,
    /// Only bind an audio stream.
    AudioOnly,
    /// Bind both a video and an audio stream.
    #[default]
    Both,
}

impl StreamFilter {
    /**
        Returns true if streams of `stream_type` pass this filter.
    */
    pub const fn accepts(self, stream_type: StreamType) -> bool {
        match (self, stream_type) {
            (Self::Both, _) => true,
            (Self::VideoOnly, StreamType::Video) => true,
            (Self::AudioOnly, StreamType::Audio) => true,
            _ => false,
        }
    }
}

/**
    Configuration for opening an input.
*/
#[derive(Clone, Debug, Default)]
pub struct ProbeConfig {
    /// Which stream types to bind decoders for.
    pub stream_filter: StreamFilter,
}

impl ProbeConfig {
    /**
        Create a new config with default settings (video and audio).
    */
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Create a config that only binds the given stream types.
    */
    pub fn with_stream_filter(stream_filter: StreamFilter) -> Self {
        Self { stream_filter }
    }
}

/**
    Configuration for the read-decode loop.
*/
#[derive(Clone, Debug)]
pub struct DecodeConfig {
    /**
        Drain frames still buffered in the decoders once the input ends.
    */
    pub flush_at_end: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self { flush_at_end: true }
    }
}

impl DecodeConfig {
    /**
        Create a new config with default settings (flush at end).
    */
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Create a config that stops at end of input without draining decoders.
    */
    pub fn without_flush() -> Self {
        Self {
            flush_at_end: false,
        }
    }
}
