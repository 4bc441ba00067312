/*!
    Probing and decoding of media containers.

    This crate opens a container, binds one decoder to its first video
    stream and one to its first audio stream, and drives a read-decode loop
    that hands every decoded frame to a [`FrameSink`].

    The pipeline talks to the container and codec library only through the
    traits in [`backend`]. The FFmpeg implementation of those traits is in
    the `ffmpeg` module, behind the feature of the same name.

    # Features

    - `ffmpeg`: FFmpeg-backed [`MediaBackend`] (needs the FFmpeg libraries)

    # Example

    ```ignore
    use ffmpeg_decode::{ffmpeg::FfmpegBackend, open_input, run};

    let backend = FfmpegBackend::new()?;
    let mut session = open_input(&backend, "video.mp4")?;

    let summary = run(&mut session, &mut |stream_index: usize, frame: &Frame| {
        println!("#{stream_index}: {:?}", frame.info);
    });

    // Closes the decoders, then the container. Dropping the session does the same.
    session.release();
    ```
*/

pub use ffmpeg_types::{Error, Frame, FrameInfo, Packet, Result, StreamType};

pub mod backend;
mod binder;
mod config;
mod dispatch;
mod error;
mod pipeline;
mod prober;
mod session;

#[cfg(feature = "ffmpeg")]
pub mod ffmpeg;

#[cfg(test)]
mod mock;

pub use backend::{Container, Decoded, Decoder, MediaBackend};
pub use binder::bind_decoder;
pub use config::{DecodeConfig, ProbeConfig, StreamFilter};
pub use dispatch::{decode_packet, flush_decoder};
pub use error::{BindError, DecodeError, ProbeError};
pub use pipeline::{FrameSink, LoopEnd, LoopSummary, run, run_with_config};
pub use prober::{open_input, open_input_with_config};
pub use session::{BoundStream, Session, SessionOf, SessionState};
