/*!
    Stream descriptors.
*/

use crate::{CodecId, Rational};

/**
    Kind of media carried by an elementary stream.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Audio,
    Subtitle,
    Data,
    Attachment,
    Unknown,
}

impl MediaKind {
    /**
        The decodable stream type for this kind, if it is one we decode.
    */
    pub const fn stream_type(self) -> Option<StreamType> {
        match self {
            Self::Video => Some(StreamType::Video),
            Self::Audio => Some(StreamType::Audio),
            _ => None,
        }
    }
}

/**
    Type of a decodable media stream.

    Only video and audio streams are ever bound to a decoder, so this is
    the closed set the decode path dispatches over.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamType {
    /// Video stream
    Video,
    /// Audio stream
    Audio,
}

impl StreamType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl std::fmt::Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/**
    Codec parameters that matter for describing a stream.

    Video fields are zero for audio streams and vice versa.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamParameters {
    pub width: u32,
    pub height: u32,
    pub sample_rate: u32,
    pub channels: u16,
}

/**
    Read-only description of one elementary stream in a container.

    The container owns the stream; a descriptor is a snapshot taken after
    stream information has been read.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamDescriptor {
    /// Position of the stream in the container's stream list.
    pub index: usize,
    /// What the stream carries.
    pub kind: MediaKind,
    /// Compression format of the stream.
    pub codec: CodecId,
    /// Duration of one timestamp tick for packets of this stream.
    pub time_base: Rational,
    /// Codec-specific parameters.
    pub parameters: StreamParameters,
}

impl StreamDescriptor {
    pub fn new(index: usize, kind: MediaKind, codec: CodecId, time_base: Rational) -> Self {
        Self {
            index,
            kind,
            codec,
            time_base,
            parameters: StreamParameters::default(),
        }
    }

    pub fn with_parameters(mut self, parameters: StreamParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /**
        The decodable stream type, if this is a video or audio stream.
    */
    pub fn stream_type(&self) -> Option<StreamType> {
        self.kind.stream_type()
    }
}
