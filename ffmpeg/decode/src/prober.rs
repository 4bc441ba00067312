/*!
    Opening an input: container probing and stream selection.
*/

use std::path::Path;

use ffmpeg_types::{Error, StreamDescriptor, StreamType};

use crate::backend::{Container, MediaBackend};
use crate::binder::bind_decoder;
use crate::config::{ProbeConfig, StreamFilter};
use crate::error::{BindError, ProbeError};
use crate::session::{BoundStream, SessionOf, SessionState};

/**
    Open the container at `path` and bind decoders for its first video and
    first audio stream.

    Equivalent to [`open_input_with_config`] with the default config.
*/
pub fn open_input<B: MediaBackend>(
    backend: &B,
    path: impl AsRef<Path>,
) -> Result<SessionOf<B>, ProbeError> {
    open_input_with_config(backend, path, &ProbeConfig::default())
}

/**
    Open the container at `path` and bind decoders for the streams the
    config asks for.

    Only the first stream of each kind is a candidate. If binding a
    candidate fails the whole open fails, even if a later stream of the
    same kind could have been bound. On any error everything opened so far
    is released before the error is returned.
*/
pub fn open_input_with_config<B: MediaBackend>(
    backend: &B,
    path: impl AsRef<Path>,
    config: &ProbeConfig,
) -> Result<SessionOf<B>, ProbeError> {
    let path = path.as_ref();
    let mut session = SessionOf::<B>::new();

    match probe_into(backend, path, config, &mut session) {
        Ok(()) => Ok(session),
        Err(e) => {
            tracing::debug!(path = %path.display(), stage = e.stage(), "probe failed");
            session.set_state(SessionState::Failed);
            session.release();
            Err(e)
        }
    }
}

fn probe_into<B: MediaBackend>(
    backend: &B,
    path: &Path,
    config: &ProbeConfig,
    session: &mut SessionOf<B>,
) -> Result<(), ProbeError> {
    let container =
        backend
            .open_container(path)
            .map_err(|source| ProbeError::CannotOpenContainer {
                path: path.to_path_buf(),
                source,
            })?;
    session.container = Some(container);
    session.set_state(SessionState::Opening);

    if let Some(container) = session.container.as_mut() {
        container
            .find_stream_info()
            .map_err(|source| ProbeError::StreamInfoUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
    }
    session.set_state(SessionState::Probed);

    let candidates = select_streams(session.streams(), config.stream_filter);

    for (stream, stream_type) in candidates {
        let bind_failed = |source| ProbeError::DecoderBindFailed {
            index: stream.index,
            kind: stream_type,
            source,
        };

        let parameters = session
            .container
            .as_ref()
            .and_then(|container| container.parameters(stream.index))
            .ok_or_else(|| {
                bind_failed(BindError::DecoderInitFailed {
                    codec: stream.codec,
                    source: Error::invalid_data("stream has no codec parameters"),
                })
            })?;

        let decoder = bind_decoder(backend, &stream, parameters).map_err(bind_failed)?;

        tracing::debug!(
            index = stream.index,
            kind = %stream_type,
            codec = %stream.codec,
            time_base = %stream.time_base,
            "bound decoder"
        );

        let bound = BoundStream::new(&stream, stream_type, decoder);
        match stream_type {
            StreamType::Video => session.video = Some(bound),
            StreamType::Audio => session.audio = Some(bound),
        }
    }

    if session.video.is_none() && session.audio.is_none() {
        return Err(ProbeError::NoUsableStreams {
            path: path.to_path_buf(),
        });
    }

    session.set_state(SessionState::Open);
    Ok(())
}

/**
    Pick the first video and the first audio stream that pass `filter`,
    in container order.
*/
pub(crate) fn select_streams(
    streams: &[StreamDescriptor],
    filter: StreamFilter,
) -> Vec<(StreamDescriptor, StreamType)> {
    let mut selected: Vec<(StreamDescriptor, StreamType)> = Vec::with_capacity(2);

    for stream in streams {
        let Some(stream_type) = stream.stream_type() else {
            continue;
        };
        if !filter.accepts(stream_type) {
            continue;
        }
        if selected.iter().any(|(_, taken)| *taken == stream_type) {
            continue;
        }
        selected.push((stream.clone(), stream_type));
    }

    selected
}
