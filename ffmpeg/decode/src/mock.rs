/*!
    Scripted in-memory backend for tests.

    Files are registered by path with a list of streams and the packets the
    container will return. The decoder interprets packet payloads:

    - `b"corrupt"` fails to decode
    - anything starting with `b"hold"` is accepted but buffered, the frame
      comes out later (on the next packet or on flush)
    - anything else decodes into one frame

    Opens, closes and decode calls are counted in [`Counters`].
*/

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use ffmpeg_types::{
    CodecId, Error, Frame, FrameInfo, MediaKind, Packet, Pts, Rational, Result, StreamDescriptor,
    StreamParameters, StreamType,
};

use crate::backend::{Container, Decoded, Decoder, MediaBackend};

#[derive(Debug, Default)]
pub struct Counters {
    containers_opened: Cell<usize>,
    containers_closed: Cell<usize>,
    decoders_opened: Cell<usize>,
    decoders_closed: Cell<usize>,
    video_decode_calls: Cell<usize>,
    audio_decode_calls: Cell<usize>,
    stale_frames: Cell<usize>,
    close_order: RefCell<Vec<&'static str>>,
}

impl Counters {
    pub fn containers_opened(&self) -> usize {
        self.containers_opened.get()
    }

    pub fn containers_closed(&self) -> usize {
        self.containers_closed.get()
    }

    pub fn decoders_opened(&self) -> usize {
        self.decoders_opened.get()
    }

    pub fn decoders_closed(&self) -> usize {
        self.decoders_closed.get()
    }

    pub fn video_decode_calls(&self) -> usize {
        self.video_decode_calls.get()
    }

    pub fn audio_decode_calls(&self) -> usize {
        self.audio_decode_calls.get()
    }

    pub fn decode_calls(&self) -> usize {
        self.video_decode_calls.get() + self.audio_decode_calls.get()
    }

    /// Decode calls that were handed a frame that still held old data.
    pub fn stale_frames(&self) -> usize {
        self.stale_frames.get()
    }

    pub fn close_order(&self) -> Vec<&'static str> {
        self.close_order.borrow().clone()
    }
}

fn bump(cell: &Cell<usize>) {
    cell.set(cell.get() + 1);
}

/**
    Codec parameters of a mock stream.
*/
#[derive(Clone, Debug)]
pub struct MockParameters {
    pub reject_init: bool,
    pub decoder_time_base: Option<Rational>,
    pub sample_aspect_ratio: Rational,
    pub samples: usize,
    pub stream: StreamParameters,
}

pub struct MockStream {
    pub descriptor: StreamDescriptor,
    pub parameters: MockParameters,
}

impl MockStream {
    fn new(descriptor: StreamDescriptor, decoder_time_base: Option<Rational>) -> Self {
        let parameters = MockParameters {
            reject_init: false,
            decoder_time_base,
            sample_aspect_ratio: Rational::new(1, 1),
            samples: 1024,
            stream: descriptor.parameters,
        };
        Self {
            descriptor,
            parameters,
        }
    }

    /// Video stream in a 1/90000 time base, decoded in 1/25.
    pub fn video(index: usize, codec: CodecId, width: u32, height: u32) -> Self {
        let descriptor =
            StreamDescriptor::new(index, MediaKind::Video, codec, Rational::new(1, 90000))
                .with_parameters(StreamParameters {
                    width,
                    height,
                    ..Default::default()
                });
        Self::new(descriptor, Some(Rational::new(1, 25)))
    }

    /// Audio stream at 48 kHz, decoded in the stream time base.
    pub fn audio(index: usize, codec: CodecId, channels: u16) -> Self {
        let descriptor =
            StreamDescriptor::new(index, MediaKind::Audio, codec, Rational::new(1, 48000))
                .with_parameters(StreamParameters {
                    sample_rate: 48000,
                    channels,
                    ..Default::default()
                });
        Self::new(descriptor, None)
    }

    pub fn data(index: usize) -> Self {
        let descriptor = StreamDescriptor::new(
            index,
            MediaKind::Data,
            CodecId::Other("bin_data"),
            Rational::new(1, 1000),
        );
        Self::new(descriptor, None)
    }
}

/**
    Build a packet for stream `index` in time base `time_base`.
*/
pub fn packet(index: usize, time_base: Rational, data: &[u8], pts: i64) -> Packet {
    Packet::new(data.to_vec(), index, time_base).with_timestamps(Some(Pts(pts)), Some(Pts(pts)))
}

struct MockFile {
    streams: Vec<MockStream>,
    packets: Vec<Packet>,
    corrupt: bool,
    fail_stream_info: bool,
    read_error_at_end: bool,
}

pub struct MockBackend {
    files: HashMap<PathBuf, MockFile>,
    codecs: HashSet<CodecId>,
    counters: Rc<Counters>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            codecs: HashSet::new(),
            counters: Rc::new(Counters::default()),
        }
    }

    pub fn counters(&self) -> Rc<Counters> {
        Rc::clone(&self.counters)
    }

    /// Register a decoder for `codec`.
    pub fn register(mut self, codec: CodecId) -> Self {
        self.codecs.insert(codec);
        self
    }

    pub fn with_file(
        mut self,
        path: impl Into<PathBuf>,
        streams: Vec<MockStream>,
        packets: Vec<Packet>,
    ) -> Self {
        self.files.insert(
            path.into(),
            MockFile {
                streams,
                packets,
                corrupt: false,
                fail_stream_info: false,
                read_error_at_end: false,
            },
        );
        self
    }

    /// A file that exists but whose header cannot be read.
    pub fn with_corrupt_file(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut backend = self.with_file(path.clone(), Vec::new(), Vec::new());
        if let Some(file) = backend.files.get_mut(&path) {
            file.corrupt = true;
        }
        backend
    }

    pub fn fail_stream_info(mut self, path: impl AsRef<Path>) -> Self {
        if let Some(file) = self.files.get_mut(path.as_ref()) {
            file.fail_stream_info = true;
        }
        self
    }

    /// Return an I/O error instead of end of input after the last packet.
    pub fn read_error_at_end(mut self, path: impl AsRef<Path>) -> Self {
        if let Some(file) = self.files.get_mut(path.as_ref()) {
            file.read_error_at_end = true;
        }
        self
    }
}

pub struct MockContainer {
    streams: Vec<StreamDescriptor>,
    parameters: Vec<MockParameters>,
    packets: VecDeque<Packet>,
    fail_stream_info: bool,
    read_error_at_end: bool,
    info_loaded: bool,
    counters: Rc<Counters>,
}

impl Container for MockContainer {
    type Parameters = MockParameters;

    fn find_stream_info(&mut self) -> Result<()> {
        if self.fail_stream_info {
            return Err(Error::invalid_data("could not find codec parameters"));
        }
        self.info_loaded = true;
        Ok(())
    }

    fn streams(&self) -> &[StreamDescriptor] {
        if self.info_loaded { &self.streams } else { &[] }
    }

    fn parameters(&self, index: usize) -> Option<MockParameters> {
        self.parameters.get(index).cloned()
    }

    fn read_packet(&mut self) -> Result<Packet> {
        match self.packets.pop_front() {
            Some(packet) => Ok(packet),
            None if self.read_error_at_end => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection reset",
            ))),
            None => Err(Error::Eof),
        }
    }
}

impl Drop for MockContainer {
    fn drop(&mut self) {
        bump(&self.counters.containers_closed);
        self.counters.close_order.borrow_mut().push("container");
    }
}

pub struct MockCodec(CodecId);

pub struct MockDecoder {
    codec: CodecId,
    time_base: Rational,
    parameters: MockParameters,
    pending: VecDeque<Packet>,
    counters: Rc<Counters>,
}

impl MockDecoder {
    fn emit(&self, packet: &Packet, frame: &mut Frame) {
        frame.data.extend_from_slice(&packet.data);
        frame.pts = packet.pts;
        frame.pkt_dts = packet.dts;
        frame.best_effort_timestamp = packet.pts.or(packet.dts);
        frame.info = if self.codec.is_audio() || self.parameters.stream.channels > 0 {
            FrameInfo::Audio {
                samples: self.parameters.samples,
                channels: self.parameters.stream.channels,
                sample_rate: self.parameters.stream.sample_rate,
            }
        } else {
            FrameInfo::Video {
                width: self.parameters.stream.width,
                height: self.parameters.stream.height,
                sample_aspect_ratio: self.parameters.sample_aspect_ratio,
            }
        };
    }

    fn decode(&mut self, packet: &Packet, frame: &mut Frame) -> Result<Decoded> {
        if !frame.is_cleared() {
            bump(&self.counters.stale_frames);
        }

        if packet.data == b"corrupt" {
            return Err(Error::invalid_data("invalid NAL unit size"));
        }

        // Output still pending: hand it out and refuse the new packet.
        if let Some(pending) = self.pending.pop_front() {
            self.emit(&pending, frame);
            return Ok(Decoded {
                consumed: 0,
                frame_produced: true,
            });
        }

        if packet.data.starts_with(b"hold") {
            self.pending.push_back(packet.clone());
            return Ok(Decoded {
                consumed: packet.size(),
                frame_produced: false,
            });
        }

        self.emit(packet, frame);
        Ok(Decoded {
            consumed: packet.size(),
            frame_produced: true,
        })
    }
}

impl Decoder for MockDecoder {
    fn time_base(&self) -> Rational {
        self.time_base
    }

    fn decode_video(&mut self, packet: &Packet, frame: &mut Frame) -> Result<Decoded> {
        bump(&self.counters.video_decode_calls);
        self.decode(packet, frame)
    }

    fn decode_audio(&mut self, packet: &Packet, frame: &mut Frame) -> Result<Decoded> {
        bump(&self.counters.audio_decode_calls);
        self.decode(packet, frame)
    }

    fn flush(&mut self, _stream_type: StreamType, frame: &mut Frame) -> Result<bool> {
        match self.pending.pop_front() {
            Some(pending) => {
                self.emit(&pending, frame);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Drop for MockDecoder {
    fn drop(&mut self) {
        bump(&self.counters.decoders_closed);
        self.counters.close_order.borrow_mut().push("decoder");
    }
}

impl MediaBackend for MockBackend {
    type Container = MockContainer;
    type Codec = MockCodec;
    type Decoder = MockDecoder;

    fn open_container(&self, path: &Path) -> Result<MockContainer> {
        let file = self.files.get(path).ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No such file or directory",
            ))
        })?;
        if file.corrupt {
            return Err(Error::invalid_data("Invalid data found when processing input"));
        }

        bump(&self.counters.containers_opened);
        Ok(MockContainer {
            streams: file.streams.iter().map(|s| s.descriptor.clone()).collect(),
            parameters: file.streams.iter().map(|s| s.parameters.clone()).collect(),
            packets: file.packets.iter().cloned().collect(),
            fail_stream_info: file.fail_stream_info,
            read_error_at_end: file.read_error_at_end,
            info_loaded: false,
            counters: Rc::clone(&self.counters),
        })
    }

    fn find_decoder(&self, codec: CodecId) -> Option<MockCodec> {
        self.codecs.contains(&codec).then_some(MockCodec(codec))
    }

    fn open_decoder(
        &self,
        codec: MockCodec,
        stream: &StreamDescriptor,
        parameters: MockParameters,
    ) -> Result<MockDecoder> {
        if parameters.reject_init {
            return Err(Error::invalid_data("invalid extradata"));
        }

        bump(&self.counters.decoders_opened);
        Ok(MockDecoder {
            codec: codec.0,
            time_base: parameters.decoder_time_base.unwrap_or(stream.time_base),
            parameters,
            pending: VecDeque::new(),
            counters: Rc::clone(&self.counters),
        })
    }
}
