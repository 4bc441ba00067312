/*!
    The read-decode loop.
*/

use ffmpeg_types::{Frame, Packet, StreamType};

use crate::backend::{Container, Decoder};
use crate::config::DecodeConfig;
use crate::dispatch::{decode_packet, flush_decoder};
use crate::session::{BoundStream, Session};

/**
    Receiver of decoded frames.

    The frame passed to [`FrameSink::on_frame`] is only valid for the
    duration of the call; the loop clears and reuses it afterwards.
*/
pub trait FrameSink {
    /**
        Called once for every decoded frame, with the index of the stream
        the frame came from.
    */
    fn on_frame(&mut self, stream_index: usize, frame: &Frame);

    /**
        Called once after the input was read to its end and every decoder
        was drained.
    */
    fn on_end_of_stream(&mut self) {}
}

impl<F> FrameSink for F
where
    F: FnMut(usize, &Frame),
{
    fn on_frame(&mut self, stream_index: usize, frame: &Frame) {
        self(stream_index, frame)
    }
}

/**
    How the read-decode loop ended.
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoopEnd {
    /// The container reported end of input.
    #[default]
    EndOfInput,
    /// Reading failed with something other than end of input.
    ReadError(String),
}

/**
    Counts collected over one run of the read-decode loop.
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub packets_read: usize,
    /// Packets from streams without a bound decoder.
    pub packets_skipped: usize,
    pub video_frames: usize,
    pub audio_frames: usize,
    /// Packets dropped because the decoder rejected them.
    pub decode_errors: usize,
    pub end: LoopEnd,
}

impl LoopSummary {
    pub fn frames(&self) -> usize {
        self.video_frames + self.audio_frames
    }

    fn record_frame(&mut self, stream_type: StreamType) {
        match stream_type {
            StreamType::Video => self.video_frames += 1,
            StreamType::Audio => self.audio_frames += 1,
        }
    }
}

/**
    Read and decode the whole input with the default config.
*/
pub fn run<C, D, S>(session: &mut Session<C, D>, sink: &mut S) -> LoopSummary
where
    C: Container,
    D: Decoder,
    S: FrameSink + ?Sized,
{
    run_with_config(session, sink, &DecodeConfig::default())
}

/**
    Read packets until end of input, decode those belonging to a bound
    stream and hand every produced frame to `sink`.

    Packets of other streams are dropped without decoding. A packet the
    decoder rejects is dropped and the loop goes on; a read error other
    than end of input ends the loop. The session is left open, releasing
    it is up to the caller (or its `Drop`).
*/
pub fn run_with_config<C, D, S>(
    session: &mut Session<C, D>,
    sink: &mut S,
    config: &DecodeConfig,
) -> LoopSummary
where
    C: Container,
    D: Decoder,
    S: FrameSink + ?Sized,
{
    let mut summary = LoopSummary::default();
    let mut frame = Frame::new();

    loop {
        let Some(container) = session.container.as_mut() else {
            tracing::warn!("session holds no container, nothing to read");
            summary.end = LoopEnd::ReadError(String::from("session is not open"));
            break;
        };

        let mut packet = match container.read_packet() {
            Ok(packet) => packet,
            Err(e) if e.is_eof() => break,
            Err(e) => {
                tracing::warn!(error = %e, "reading packet failed, stopping");
                summary.end = LoopEnd::ReadError(e.to_string());
                break;
            }
        };
        summary.packets_read += 1;

        let Some(bound) = session.bound_mut(packet.stream_index) else {
            tracing::trace!(index = packet.stream_index, "skipping packet");
            summary.packets_skipped += 1;
            continue;
        };

        packet.rescale_ts(bound.decoder.time_base());
        decode_into_sink(bound, &packet, &mut frame, sink, &mut summary);
    }

    if summary.end == LoopEnd::EndOfInput {
        if config.flush_at_end {
            for bound in [session.video.as_mut(), session.audio.as_mut()]
                .into_iter()
                .flatten()
            {
                drain_into_sink(bound, &mut frame, sink, &mut summary);
            }
        }
        sink.on_end_of_stream();
    }

    tracing::info!(
        packets = summary.packets_read,
        skipped = summary.packets_skipped,
        video_frames = summary.video_frames,
        audio_frames = summary.audio_frames,
        decode_errors = summary.decode_errors,
        end = ?summary.end,
        "decode finished"
    );

    summary
}

fn decode_into_sink<D, S>(
    bound: &mut BoundStream<D>,
    packet: &Packet,
    frame: &mut Frame,
    sink: &mut S,
    summary: &mut LoopSummary,
) where
    D: Decoder,
    S: FrameSink + ?Sized,
{
    loop {
        match decode_packet(&mut bound.decoder, bound.stream_type, packet, frame) {
            Ok(decoded) => {
                if decoded.frame_produced {
                    summary.record_frame(bound.stream_type);
                    sink.on_frame(bound.index, frame);
                }
                frame.clear();

                // Output was pending and the packet was refused, send it again.
                if decoded.consumed == 0 && decoded.frame_produced {
                    continue;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping packet");
                summary.decode_errors += 1;
                frame.clear();
            }
        }
        return;
    }
}

fn drain_into_sink<D, S>(
    bound: &mut BoundStream<D>,
    frame: &mut Frame,
    sink: &mut S,
    summary: &mut LoopSummary,
) where
    D: Decoder,
    S: FrameSink + ?Sized,
{
    loop {
        match flush_decoder(&mut bound.decoder, bound.stream_type, bound.index, frame) {
            Ok(true) => {
                summary.record_frame(bound.stream_type);
                sink.on_frame(bound.index, frame);
                frame.clear();
            }
            Ok(false) => break,
            Err(e) => {
                tracing::warn!(error = %e, "flushing decoder failed");
                summary.decode_errors += 1;
                frame.clear();
                break;
            }
        }
    }
}
