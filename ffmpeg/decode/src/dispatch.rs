/*!
    Decode dispatch by stream type.
*/

use ffmpeg_types::{Frame, Packet, StreamType};

use crate::backend::{Decoded, Decoder};
use crate::error::DecodeError;

/**
    Decode one packet with the decode routine for `stream_type`.

    When a frame is produced its PTS is replaced by the best-effort
    timestamp, so every produced frame carries a usable timestamp even if
    the packet's own timestamps were incomplete. The frame's time base is
    set to the decoder's.
*/
pub fn decode_packet<D: Decoder>(
    decoder: &mut D,
    stream_type: StreamType,
    packet: &Packet,
    frame: &mut Frame,
) -> Result<Decoded, DecodeError> {
    let result = match stream_type {
        StreamType::Video => decoder.decode_video(packet, frame),
        StreamType::Audio => decoder.decode_audio(packet, frame),
    };

    let decoded = result.map_err(|source| DecodeError {
        stream_index: packet.stream_index,
        source,
    })?;

    if decoded.frame_produced {
        stamp_frame(decoder, frame);
    }

    Ok(decoded)
}

/**
    Take one frame still buffered in the decoder after end of input.
*/
pub fn flush_decoder<D: Decoder>(
    decoder: &mut D,
    stream_type: StreamType,
    stream_index: usize,
    frame: &mut Frame,
) -> Result<bool, DecodeError> {
    let produced = decoder
        .flush(stream_type, frame)
        .map_err(|source| DecodeError {
            stream_index,
            source,
        })?;

    if produced {
        stamp_frame(decoder, frame);
    }

    Ok(produced)
}

fn stamp_frame<D: Decoder>(decoder: &D, frame: &mut Frame) {
    frame.pts = frame.best_effort_pts();
    frame.time_base = Some(decoder.time_base());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::bind_decoder;
    use crate::mock::{MockBackend, MockStream};
    use ffmpeg_types::{CodecId, FrameInfo, Pts, Rational};

    fn video_decoder(backend: &MockBackend) -> crate::mock::MockDecoder {
        let stream = MockStream::video(0, CodecId::H264, 640, 480);
        bind_decoder(backend, &stream.descriptor, stream.parameters).expect("bind")
    }

    #[test]
    fn video_packets_use_video_routine() {
        let backend = MockBackend::new().register(CodecId::H264);
        let mut decoder = video_decoder(&backend);
        let mut frame = Frame::new();
        let packet = Packet::new(b"frame".to_vec(), 0, Rational::new(1, 25))
            .with_timestamps(Some(Pts(7)), Some(Pts(7)));

        let decoded = decode_packet(&mut decoder, StreamType::Video, &packet, &mut frame)
            .expect("decode");

        assert!(decoded.frame_produced);
        assert_eq!(decoded.consumed, 5);
        assert!(matches!(
            frame.info,
            FrameInfo::Video {
                width: 640,
                height: 480,
                ..
            }
        ));
        assert_eq!(backend.counters().video_decode_calls(), 1);
        assert_eq!(backend.counters().audio_decode_calls(), 0);
    }

    #[test]
    fn produced_frame_gets_best_effort_timestamp() {
        let backend = MockBackend::new().register(CodecId::H264);
        let mut decoder = video_decoder(&backend);
        let mut frame = Frame::new();
        // No PTS on the packet, only DTS: the estimate comes from the DTS.
        let packet = Packet::new(b"frame".to_vec(), 0, Rational::new(1, 25))
            .with_timestamps(None, Some(Pts(12)));

        decode_packet(&mut decoder, StreamType::Video, &packet, &mut frame).expect("decode");

        assert_eq!(frame.pts, Some(Pts(12)));
        assert_eq!(frame.time_base, Some(Rational::new(1, 25)));
    }

    #[test]
    fn buffered_packet_produces_no_frame() {
        let backend = MockBackend::new().register(CodecId::H264);
        let mut decoder = video_decoder(&backend);
        let mut frame = Frame::new();
        let packet = Packet::new(b"hold".to_vec(), 0, Rational::new(1, 25));

        let decoded = decode_packet(&mut decoder, StreamType::Video, &packet, &mut frame)
            .expect("decode");

        assert_eq!(decoded.consumed, 4);
        assert!(!decoded.frame_produced);
        assert!(frame.is_cleared());
    }

    #[test]
    fn malformed_packet_is_a_decode_error() {
        let backend = MockBackend::new().register(CodecId::H264);
        let mut decoder = video_decoder(&backend);
        let mut frame = Frame::new();
        let packet = Packet::new(b"corrupt".to_vec(), 0, Rational::new(1, 25));

        let err = decode_packet(&mut decoder, StreamType::Video, &packet, &mut frame)
            .expect_err("should fail");

        assert_eq!(err.stream_index, 0);
    }

    #[test]
    fn flush_returns_buffered_frames() {
        let backend = MockBackend::new().register(CodecId::H264);
        let mut decoder = video_decoder(&backend);
        let mut frame = Frame::new();
        let packet = Packet::new(b"hold".to_vec(), 0, Rational::new(1, 25))
            .with_timestamps(Some(Pts(3)), None);
        decode_packet(&mut decoder, StreamType::Video, &packet, &mut frame).expect("decode");

        assert!(flush_decoder(&mut decoder, StreamType::Video, 0, &mut frame).expect("flush"));
        assert_eq!(frame.pts, Some(Pts(3)));
        frame.clear();
        assert!(!flush_decoder(&mut decoder, StreamType::Video, 0, &mut frame).expect("flush"));
    }
}
