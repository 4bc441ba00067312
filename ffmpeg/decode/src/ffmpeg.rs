/*!
    FFmpeg-backed implementation of the collaborator traits.

    Enabled with the `ffmpeg` feature.
*/

use std::ffi::CString;
use std::path::Path;
use std::ptr;

use ffmpeg_next::{
    codec::{self, decoder},
    ffi,
    format::context::Input as InputContext,
    frame::{Audio as AudioFrameFFmpeg, Video as VideoFrameFFmpeg},
    media::Type,
    packet::Flags as PacketFlags,
};

use ffmpeg_types::{
    CodecId, Error, Frame, FrameInfo, MediaKind, Packet, Pts, Rational, Result, StreamDescriptor,
    StreamParameters, StreamType,
};

use crate::backend::{Container, Decoded, Decoder, MediaBackend};

pub use ffmpeg_next::log::Level as LogLevel;

/**
    Set the log level of the FFmpeg libraries themselves.
*/
pub fn set_log_level(level: LogLevel) {
    ffmpeg_next::log::set_level(level);
}

/**
    The FFmpeg libraries, initialized.
*/
#[derive(Debug)]
pub struct FfmpegBackend {
    _private: (),
}

impl FfmpegBackend {
    pub fn new() -> Result<Self> {
        ffmpeg_next::init().map_err(|e| Error::codec(e.to_string()))?;
        Ok(Self { _private: () })
    }
}

impl MediaBackend for FfmpegBackend {
    type Container = FfmpegContainer;
    type Codec = ffmpeg_next::Codec;
    type Decoder = FfmpegDecoder;

    fn open_container(&self, path: &Path) -> Result<FfmpegContainer> {
        FfmpegContainer::open(path)
    }

    fn find_decoder(&self, codec: CodecId) -> Option<ffmpeg_next::Codec> {
        decoder::find(codec_id_to_ffmpeg(codec)?)
    }

    fn open_decoder(
        &self,
        codec: ffmpeg_next::Codec,
        stream: &StreamDescriptor,
        parameters: codec::Parameters,
    ) -> Result<FfmpegDecoder> {
        FfmpegDecoder::open(codec, stream, parameters)
    }
}

/**
    An opened demuxer.
*/
pub struct FfmpegContainer {
    input: InputContext,
    streams: Vec<StreamDescriptor>,
}

impl FfmpegContainer {
    fn open(path: &Path) -> Result<Self> {
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::invalid_data("path is not valid UTF-8"))?;
        let c_path = CString::new(path_str)
            .map_err(|_| Error::invalid_data("path contains a NUL byte"))?;

        // Opens the file and reads the header, without probing streams.
        let input = unsafe {
            let mut ctx = ptr::null_mut();
            let ret = ffi::avformat_open_input(
                &mut ctx,
                c_path.as_ptr(),
                ptr::null_mut(),
                ptr::null_mut(),
            );
            if ret < 0 {
                return Err(match ffmpeg_next::Error::from(ret) {
                    e @ ffmpeg_next::Error::Other { errno } if errno == ffi::ENOENT => {
                        Error::Io(std::io::Error::new(
                            std::io::ErrorKind::NotFound,
                            e.to_string(),
                        ))
                    }
                    e => Error::codec(e.to_string()),
                });
            }
            InputContext::wrap(ctx)
        };

        Ok(Self {
            input,
            streams: Vec::new(),
        })
    }

    fn describe_streams(&self) -> Vec<StreamDescriptor> {
        self.input
            .streams()
            .map(|stream| {
                let parameters = stream.parameters();
                let kind = media_kind_from_ffmpeg(parameters.medium());
                let codec = codec_id_from_ffmpeg(parameters.id());

                // SAFETY: codecpar is owned by the open format context
                let stream_parameters = unsafe {
                    let ptr = parameters.as_ptr();
                    StreamParameters {
                        width: (*ptr).width.max(0) as u32,
                        height: (*ptr).height.max(0) as u32,
                        sample_rate: (*ptr).sample_rate.max(0) as u32,
                        channels: (*ptr).ch_layout.nb_channels.max(0) as u16,
                    }
                };

                StreamDescriptor::new(
                    stream.index(),
                    kind,
                    codec,
                    rational_from_ffmpeg(stream.time_base()),
                )
                .with_parameters(stream_parameters)
            })
            .collect()
    }
}

impl Container for FfmpegContainer {
    type Parameters = codec::Parameters;

    fn find_stream_info(&mut self) -> Result<()> {
        let ret =
            unsafe { ffi::avformat_find_stream_info(self.input.as_mut_ptr(), ptr::null_mut()) };
        if ret < 0 {
            return Err(Error::codec(ffmpeg_next::Error::from(ret).to_string()));
        }
        self.streams = self.describe_streams();
        Ok(())
    }

    fn streams(&self) -> &[StreamDescriptor] {
        &self.streams
    }

    fn parameters(&self, index: usize) -> Option<codec::Parameters> {
        self.input.stream(index).map(|stream| stream.parameters())
    }

    fn read_packet(&mut self) -> Result<Packet> {
        let mut packet = ffmpeg_next::Packet::empty();
        match packet.read(&mut self.input) {
            Ok(()) => {}
            Err(ffmpeg_next::Error::Eof) => return Err(Error::Eof),
            Err(e) => return Err(Error::codec(e.to_string())),
        }

        let stream_index = packet.stream();
        let time_base = self
            .streams
            .get(stream_index)
            .map(|stream| stream.time_base)
            .unwrap_or(Rational::new(1, 1));

        let data = packet.data().map(<[u8]>::to_vec).unwrap_or_default();

        Ok(Packet::new(data, stream_index, time_base)
            .with_timestamps(packet.pts().map(Pts), packet.dts().map(Pts))
            .with_duration(ffmpeg_types::MediaDuration(packet.duration()))
            .with_keyframe(packet.is_key()))
    }
}

impl std::fmt::Debug for FfmpegContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegContainer")
            .field("streams", &self.streams.len())
            .finish_non_exhaustive()
    }
}

/**
    An opened FFmpeg decoding context.

    Uses the send/receive API underneath: one call to a decode routine
    sends at most one packet and receives at most one frame.
*/
pub struct FfmpegDecoder {
    decoder: decoder::Opened,
    time_base: Rational,
    video_frame: VideoFrameFFmpeg,
    audio_frame: AudioFrameFFmpeg,
    eof_sent: bool,
}

impl FfmpegDecoder {
    fn open(
        codec: ffmpeg_next::Codec,
        stream: &StreamDescriptor,
        parameters: codec::Parameters,
    ) -> Result<Self> {
        let mut context = codec::context::Context::from_parameters(parameters)
            .map_err(|e| Error::codec(e.to_string()))?;

        let codec_time_base = unsafe { (*context.as_ptr()).time_base };
        let codec_time_base = Rational::new(codec_time_base.num, codec_time_base.den.max(1));
        let time_base = if codec_time_base.is_valid_time_base() {
            codec_time_base
        } else {
            stream.time_base
        };

        // The read-decode loop hands packets over in this time base
        unsafe {
            (*context.as_mut_ptr()).pkt_timebase = rational_to_ffmpeg(time_base).into();
        }

        let decoder = context
            .decoder()
            .open_as(codec)
            .map_err(|e| Error::codec(e.to_string()))?;

        Ok(Self {
            decoder,
            time_base,
            video_frame: VideoFrameFFmpeg::empty(),
            audio_frame: AudioFrameFFmpeg::empty(),
            eof_sent: false,
        })
    }

    fn send(&mut self, packet: &Packet) -> Result<usize> {
        let mut ffmpeg_pkt = ffmpeg_next::Packet::copy(&packet.data);
        ffmpeg_pkt.set_pts(packet.pts.map(|pts| pts.0));
        ffmpeg_pkt.set_dts(packet.dts.map(|dts| dts.0));
        ffmpeg_pkt.set_duration(packet.duration.0);
        ffmpeg_pkt.set_stream(packet.stream_index);
        if packet.is_keyframe {
            ffmpeg_pkt.set_flags(PacketFlags::KEY);
        }

        match self.decoder.send_packet(&ffmpeg_pkt) {
            Ok(()) => Ok(packet.size()),
            Err(ffmpeg_next::Error::Other { errno }) if errno == ffi::EAGAIN => Ok(0),
            Err(e) => Err(Error::codec(e.to_string())),
        }
    }

    fn receive(&mut self, stream_type: StreamType, frame: &mut Frame) -> Result<bool> {
        let received = match stream_type {
            StreamType::Video => self.decoder.receive_frame(&mut self.video_frame),
            StreamType::Audio => self.decoder.receive_frame(&mut self.audio_frame),
        };

        match received {
            Ok(()) => {}
            Err(ffmpeg_next::Error::Other { errno }) if errno == ffi::EAGAIN => return Ok(false),
            Err(ffmpeg_next::Error::Eof) => return Ok(false),
            Err(e) => return Err(Error::codec(e.to_string())),
        }

        match stream_type {
            StreamType::Video => fill_video_frame(&self.video_frame, frame),
            StreamType::Audio => fill_audio_frame(&self.audio_frame, frame),
        }
        Ok(true)
    }

    fn decode(
        &mut self,
        stream_type: StreamType,
        packet: &Packet,
        frame: &mut Frame,
    ) -> Result<Decoded> {
        // An empty packet would put FFmpeg into draining mode, only flush may do that
        if packet.data.is_empty() {
            return Ok(Decoded::default());
        }

        let consumed = self.send(packet)?;
        let frame_produced = self.receive(stream_type, frame)?;
        Ok(Decoded {
            consumed,
            frame_produced,
        })
    }
}

impl Decoder for FfmpegDecoder {
    fn time_base(&self) -> Rational {
        self.time_base
    }

    fn decode_video(&mut self, packet: &Packet, frame: &mut Frame) -> Result<Decoded> {
        self.decode(StreamType::Video, packet, frame)
    }

    fn decode_audio(&mut self, packet: &Packet, frame: &mut Frame) -> Result<Decoded> {
        self.decode(StreamType::Audio, packet, frame)
    }

    fn flush(&mut self, stream_type: StreamType, frame: &mut Frame) -> Result<bool> {
        if !self.eof_sent {
            match self.decoder.send_eof() {
                Ok(()) | Err(ffmpeg_next::Error::Eof) => {}
                Err(e) => return Err(Error::codec(e.to_string())),
            }
            self.eof_sent = true;
        }
        self.receive(stream_type, frame)
    }
}

impl std::fmt::Debug for FfmpegDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegDecoder")
            .field("time_base", &self.time_base)
            .field("eof_sent", &self.eof_sent)
            .finish_non_exhaustive()
    }
}

fn fill_video_frame(source: &VideoFrameFFmpeg, frame: &mut Frame) {
    for plane in 0..source.planes() {
        frame.data.extend_from_slice(source.data(plane));
    }
    frame.info = FrameInfo::Video {
        width: source.width(),
        height: source.height(),
        sample_aspect_ratio: rational_from_ffmpeg(source.aspect_ratio()),
    };
    frame.pts = source.pts().map(Pts);
    frame.best_effort_timestamp = source.timestamp().map(Pts);
    frame.pkt_dts = pkt_dts(unsafe { (*source.as_ptr()).pkt_dts });
}

fn fill_audio_frame(source: &AudioFrameFFmpeg, frame: &mut Frame) {
    // Only the planes FFmpeg keeps inline in the frame
    let planes = source.planes().min(ffi::AV_NUM_DATA_POINTERS as usize);
    for plane in 0..planes {
        frame.data.extend_from_slice(source.data(plane));
    }
    frame.info = FrameInfo::Audio {
        samples: source.samples(),
        channels: source.channels(),
        sample_rate: source.rate(),
    };
    frame.pts = source.pts().map(Pts);
    frame.best_effort_timestamp = source.timestamp().map(Pts);
    frame.pkt_dts = pkt_dts(unsafe { (*source.as_ptr()).pkt_dts });
}

fn pkt_dts(value: i64) -> Option<Pts> {
    (value != ffi::AV_NOPTS_VALUE).then_some(Pts(value))
}

/**
    Convert ffmpeg_next::Rational to our Rational.
*/
pub fn rational_from_ffmpeg(r: ffmpeg_next::Rational) -> Rational {
    // 0/0 shows up for unknown aspect ratios
    Rational::new(r.numerator(), if r.denominator() == 0 { 1 } else { r.denominator() })
}

/**
    Convert our Rational to ffmpeg_next::Rational.
*/
pub fn rational_to_ffmpeg(r: Rational) -> ffmpeg_next::Rational {
    ffmpeg_next::Rational::new(r.num, r.den)
}

fn media_kind_from_ffmpeg(medium: Type) -> MediaKind {
    match medium {
        Type::Video => MediaKind::Video,
        Type::Audio => MediaKind::Audio,
        Type::Subtitle => MediaKind::Subtitle,
        Type::Data => MediaKind::Data,
        Type::Attachment => MediaKind::Attachment,
        Type::Unknown => MediaKind::Unknown,
    }
}

/**
    Convert ffmpeg_next codec ID to our CodecId.

    Codecs without a variant of their own keep FFmpeg's codec name.
*/
pub fn codec_id_from_ffmpeg(id: codec::Id) -> CodecId {
    use ffmpeg_next::codec::Id;

    match id {
        // Video
        Id::H264 => CodecId::H264,
        Id::HEVC => CodecId::H265,
        Id::VP8 => CodecId::Vp8,
        Id::VP9 => CodecId::Vp9,
        Id::AV1 => CodecId::Av1,
        Id::MPEG4 => CodecId::Mpeg4,
        Id::MPEG2VIDEO => CodecId::Mpeg2Video,
        // Audio
        Id::AAC => CodecId::Aac,
        Id::OPUS => CodecId::Opus,
        Id::MP3 => CodecId::Mp3,
        Id::VORBIS => CodecId::Vorbis,
        Id::FLAC => CodecId::Flac,
        Id::PCM_S16LE => CodecId::PcmS16Le,
        Id::PCM_S16BE => CodecId::PcmS16Be,
        Id::PCM_F32LE => CodecId::PcmF32Le,
        Id::AC3 => CodecId::Ac3,
        other => CodecId::Other(other.name()),
    }
}

/**
    Convert our CodecId to the ffmpeg_next codec ID.

    Returns None for names FFmpeg does not know.
*/
pub fn codec_id_to_ffmpeg(codec: CodecId) -> Option<codec::Id> {
    use ffmpeg_next::codec::Id;

    let id = match codec {
        CodecId::H264 => Id::H264,
        CodecId::H265 => Id::HEVC,
        CodecId::Vp8 => Id::VP8,
        CodecId::Vp9 => Id::VP9,
        CodecId::Av1 => Id::AV1,
        CodecId::Mpeg4 => Id::MPEG4,
        CodecId::Mpeg2Video => Id::MPEG2VIDEO,
        CodecId::Aac => Id::AAC,
        CodecId::Opus => Id::OPUS,
        CodecId::Mp3 => Id::MP3,
        CodecId::Vorbis => Id::VORBIS,
        CodecId::Flac => Id::FLAC,
        CodecId::PcmS16Le => Id::PCM_S16LE,
        CodecId::PcmS16Be => Id::PCM_S16BE,
        CodecId::PcmF32Le => Id::PCM_F32LE,
        CodecId::Ac3 => Id::AC3,
        CodecId::Other(name) => {
            let name = CString::new(name).ok()?;
            let descriptor = unsafe { ffi::avcodec_descriptor_get_by_name(name.as_ptr()) };
            if descriptor.is_null() {
                return None;
            }
            Id::from(unsafe { (*descriptor).id })
        }
        _ => return None,
    };
    Some(id)
}
