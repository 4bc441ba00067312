/*!
    Console report of decoded frames.
*/

use std::io::{self, Write};

use ffmpeg_decode::FrameSink;
use ffmpeg_types::{Frame, FrameInfo};

const SEPARATOR: &str = "-----------------------";

/**
    Writes one block of lines per decoded frame.

    The first write error is kept and every later write is skipped, so a
    closed pipe does not produce a flood of errors. Retrieve it with
    [`ConsoleReporter::finish`].
*/
pub struct ConsoleReporter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /**
        Flush the output and return the first error seen, if any.
    */
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_block(&mut self, frame: &Frame) -> io::Result<()> {
        match frame.info {
            FrameInfo::Video {
                width,
                height,
                sample_aspect_ratio,
            } => {
                writeln!(self.out, "{SEPARATOR}")?;
                writeln!(self.out, "Video : width, height : {width}x{height}")?;
                writeln!(self.out, "Video : sample_aspect_ratio : {sample_aspect_ratio}")?;
            }
            FrameInfo::Audio {
                samples, channels, ..
            } => {
                writeln!(self.out, "{SEPARATOR}")?;
                writeln!(self.out, "Audio : nb_samples : {samples}")?;
                writeln!(self.out, "Audio : channels : {channels}")?;
            }
            FrameInfo::Empty => {}
        }
        Ok(())
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            self.error = Some(e);
        }
    }
}

impl<W: Write> FrameSink for ConsoleReporter<W> {
    fn on_frame(&mut self, stream_index: usize, frame: &Frame) {
        if self.error.is_some() {
            return;
        }
        if frame.info == FrameInfo::Empty {
            tracing::debug!(index = stream_index, "empty frame, not reported");
            return;
        }
        tracing::trace!(
            index = stream_index,
            time = ?frame.presentation_time(),
            "frame"
        );
        let result = self.write_block(frame);
        self.record(result);
    }

    fn on_end_of_stream(&mut self) {
        if self.error.is_some() {
            return;
        }
        let result = writeln!(self.out, "End of stream").and_then(|()| self.out.flush());
        self.record(result);
    }
}
