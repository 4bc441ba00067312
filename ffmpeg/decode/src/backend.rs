/*!
    Interfaces to the container and codec library.

    The decode pipeline only talks to these traits. The FFmpeg-backed
    implementation lives in [`crate::ffmpeg`] (feature `ffmpeg`); tests drive
    the pipeline with a scripted in-memory implementation.

    Closing is expressed through ownership: dropping a [`Container`] closes
    the container handle and dropping a [`Decoder`] closes the decoding
    context.
*/

use std::path::Path;

use ffmpeg_types::{CodecId, Frame, Packet, Rational, Result, StreamDescriptor, StreamType};

/**
    Result of feeding one packet to a decoder.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /**
        Number of packet bytes the decoder accepted.

        Zero with `frame_produced` set means the decoder had output pending
        and wants the same packet again after that output was taken.
    */
    pub consumed: usize,
    /// Whether a frame was written to the output frame.
    pub frame_produced: bool,
}

/**
    An opened media container.
*/
pub trait Container {
    /**
        Codec parameters needed to open a decoder for one of the streams.
    */
    type Parameters;

    /**
        Read ahead as needed to fill in per-stream metadata.

        Called once, right after opening. Containers without
        self-describing headers need this to know their streams.
    */
    fn find_stream_info(&mut self) -> Result<()>;

    /**
        The container's streams, in container order.
    */
    fn streams(&self) -> &[StreamDescriptor];

    /**
        Codec parameters for the stream at `index`.
    */
    fn parameters(&self, index: usize) -> Option<Self::Parameters>;

    /**
        Read the next packet, in file order across all streams.

        Returns [`ffmpeg_types::Error::Eof`] once the input is exhausted.
    */
    fn read_packet(&mut self) -> Result<Packet>;
}

/**
    An opened decoding context bound to one stream.
*/
pub trait Decoder {
    /**
        Time base the decoder interprets packet timestamps in.
    */
    fn time_base(&self) -> Rational;

    /**
        Decode one video packet into `frame`.
    */
    fn decode_video(&mut self, packet: &Packet, frame: &mut Frame) -> Result<Decoded>;

    /**
        Decode one audio packet into `frame`.
    */
    fn decode_audio(&mut self, packet: &Packet, frame: &mut Frame) -> Result<Decoded>;

    /**
        Signal end of input and take one buffered frame, if any remain.

        Called repeatedly after the last packet until it returns `false`.
    */
    fn flush(&mut self, stream_type: StreamType, frame: &mut Frame) -> Result<bool>;
}

/**
    A container and codec library.
*/
pub trait MediaBackend {
    type Container: Container;
    /// A registered decoder implementation, as found by [`MediaBackend::find_decoder`].
    type Codec;
    type Decoder: Decoder;

    /**
        Open the container at `path` and read its header.
    */
    fn open_container(&self, path: &Path) -> Result<Self::Container>;

    /**
        Look up a registered decoder for `codec`.
    */
    fn find_decoder(&self, codec: CodecId) -> Option<Self::Codec>;

    /**
        Initialize a decoding context for `stream` using `codec`.
    */
    fn open_decoder(
        &self,
        codec: Self::Codec,
        stream: &StreamDescriptor,
        parameters: <Self::Container as Container>::Parameters,
    ) -> Result<Self::Decoder>;
}

/**
    Shorthand for the codec parameters type of a backend's containers.
*/
pub type ParametersOf<B> = <<B as MediaBackend>::Container as Container>::Parameters;
