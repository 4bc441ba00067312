/*!
    Error types for probing and decoding.
*/

use std::path::PathBuf;

use thiserror::Error;

use ffmpeg_types::{CodecId, Error as BackendError, StreamType};

/**
    Failure to bind a decoder to a stream.
*/
#[derive(Debug, Error)]
pub enum BindError {
    /// No decoder is registered for the codec. Expected for unsupported codecs.
    #[error("no decoder found for codec {codec}")]
    NoDecoderFound { codec: CodecId },
    /// A decoder exists but refused to initialize.
    #[error("failed to initialize {codec} decoder")]
    DecoderInitFailed {
        codec: CodecId,
        #[source]
        source: BackendError,
    },
}

/**
    Failure to open a container for decoding.

    Every variant is fatal to a run.
*/
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("could not open input file {}", path.display())]
    CannotOpenContainer {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("failed to retrieve stream information from {}", path.display())]
    StreamInfoUnavailable {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("failed to bind decoder for {kind} stream #{index}")]
    DecoderBindFailed {
        index: usize,
        kind: StreamType,
        #[source]
        source: BindError,
    },
    #[error("no usable video or audio stream in {}", path.display())]
    NoUsableStreams { path: PathBuf },
}

impl ProbeError {
    /**
        Short name of the stage that failed.
    */
    pub fn stage(&self) -> &'static str {
        match self {
            Self::CannotOpenContainer { .. } => "open",
            Self::StreamInfoUnavailable { .. } => "stream info",
            Self::DecoderBindFailed { .. } => "decoder bind",
            Self::NoUsableStreams { .. } => "stream selection",
        }
    }
}

/**
    Failure to decode one packet. Not fatal; the packet is skipped.
*/
#[derive(Debug, Error)]
#[error("failed to decode packet from stream #{stream_index}")]
pub struct DecodeError {
    pub stream_index: usize,
    #[source]
    pub source: BackendError,
}
