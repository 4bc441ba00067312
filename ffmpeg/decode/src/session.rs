/*!
    Decode session state and release.
*/

use ffmpeg_types::{Rational, StreamDescriptor, StreamType};

use crate::backend::{Container, Decoder, MediaBackend};

/**
    Lifecycle state of a [`Session`].
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Nothing opened yet.
    Uninitialized,
    /// Container opened, header read.
    Opening,
    /// Stream information available.
    Probed,
    /// Decoders bound, ready for the read-decode loop.
    Open,
    /// Probing failed; the session is about to be released.
    Failed,
    /// Released.
    Closed,
}

/**
    A stream that has a decoding context bound to it.
*/
pub struct BoundStream<D> {
    pub(crate) index: usize,
    pub(crate) stream_type: StreamType,
    pub(crate) time_base: Rational,
    pub(crate) decoder: D,
}

impl<D: Decoder> BoundStream<D> {
    pub(crate) fn new(stream: &StreamDescriptor, stream_type: StreamType, decoder: D) -> Self {
        Self {
            index: stream.index,
            stream_type,
            time_base: stream.time_base,
            decoder,
        }
    }

    /**
        Index of the stream in the container.
    */
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn stream_type(&self) -> StreamType {
        self.stream_type
    }

    /**
        Time base of the container stream.
    */
    pub fn stream_time_base(&self) -> Rational {
        self.time_base
    }

    /**
        Time base of the decoding context.
    */
    pub fn decoder_time_base(&self) -> Rational {
        self.decoder.time_base()
    }
}

/**
    An opened input with at most one bound video and one bound audio stream.

    The session exclusively owns the container handle and the decoding
    contexts. [`Session::release`] closes them; it is idempotent and also
    runs when the session is dropped, so every exit path releases.
*/
pub struct Session<C, D> {
    pub(crate) container: Option<C>,
    pub(crate) video: Option<BoundStream<D>>,
    pub(crate) audio: Option<BoundStream<D>>,
    pub(crate) state: SessionState,
}

/**
    The session type produced for a given backend.
*/
pub type SessionOf<B> = Session<<B as MediaBackend>::Container, <B as MediaBackend>::Decoder>;

impl<C: Container, D: Decoder> Session<C, D> {
    /**
        Create an uninitialized session that holds nothing.
    */
    pub fn new() -> Self {
        Self {
            container: None,
            video: None,
            audio: None,
            state: SessionState::Uninitialized,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /**
        Returns true if the session holds an open container.
    */
    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open && self.container.is_some()
    }

    /**
        Index of the bound video stream, if any.
    */
    pub fn video_stream_index(&self) -> Option<usize> {
        self.video.as_ref().map(|bound| bound.index)
    }

    /**
        Index of the bound audio stream, if any.
    */
    pub fn audio_stream_index(&self) -> Option<usize> {
        self.audio.as_ref().map(|bound| bound.index)
    }

    pub fn video_stream(&self) -> Option<&BoundStream<D>> {
        self.video.as_ref()
    }

    pub fn audio_stream(&self) -> Option<&BoundStream<D>> {
        self.audio.as_ref()
    }

    /**
        All streams of the container, or an empty slice if nothing is open.
    */
    pub fn streams(&self) -> &[StreamDescriptor] {
        self.container
            .as_ref()
            .map(|container| container.streams())
            .unwrap_or(&[])
    }

    /**
        The bound stream with container index `index`, if any.
    */
    pub(crate) fn bound_mut(&mut self, index: usize) -> Option<&mut BoundStream<D>> {
        if self.video.as_ref().is_some_and(|bound| bound.index == index) {
            self.video.as_mut()
        } else if self.audio.as_ref().is_some_and(|bound| bound.index == index) {
            self.audio.as_mut()
        } else {
            None
        }
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        tracing::debug!(from = ?self.state, to = ?state, "session state");
        self.state = state;
    }

    /**
        Close every decoding context and the container.

        Safe to call from any state and any number of times: whatever is
        held is closed exactly once. Afterwards the session holds nothing.
    */
    pub fn release(&mut self) {
        let video = self.video.take();
        let audio = self.audio.take();
        let container = self.container.take();

        for bound in [video, audio].into_iter().flatten() {
            tracing::debug!(
                index = bound.index,
                kind = %bound.stream_type,
                "closing decoder"
            );
            drop(bound);
        }

        if let Some(container) = container {
            tracing::debug!("closing container");
            drop(container);
        }

        if !matches!(
            self.state,
            SessionState::Uninitialized | SessionState::Closed
        ) {
            self.set_state(SessionState::Closed);
        }
    }
}

impl<C: Container, D: Decoder> Default for Session<C, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, D> Drop for Session<C, D> {
    fn drop(&mut self) {
        // Decoders before the container, like release().
        self.video.take();
        self.audio.take();
        self.container.take();
    }
}

impl<C, D> std::fmt::Debug for Session<C, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("video", &self.video.as_ref().map(|bound| bound.index))
            .field("audio", &self.audio.as_ref().map(|bound| bound.index))
            .finish_non_exhaustive()
    }
}
