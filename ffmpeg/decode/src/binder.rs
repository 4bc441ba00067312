/*!
    Decoder binding.
*/

use ffmpeg_types::StreamDescriptor;

use crate::backend::{MediaBackend, ParametersOf};
use crate::error::BindError;

/**
    Find a registered decoder for the stream's codec and open a decoding
    context for it.

    Not finding a decoder is an ordinary outcome for unsupported codecs and
    is reported as [`BindError::NoDecoderFound`]. On any error no decoding
    context exists, so there is nothing for the caller to clean up.
*/
pub fn bind_decoder<B: MediaBackend>(
    backend: &B,
    stream: &StreamDescriptor,
    parameters: ParametersOf<B>,
) -> Result<B::Decoder, BindError> {
    let codec = backend
        .find_decoder(stream.codec)
        .ok_or(BindError::NoDecoderFound {
            codec: stream.codec,
        })?;

    backend
        .open_decoder(codec, stream, parameters)
        .map_err(|source| BindError::DecoderInitFailed {
            codec: stream.codec,
            source,
        })
}
