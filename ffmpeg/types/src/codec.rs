/*!
    Codec identification.
*/

use std::fmt;

/**
    Codec identifiers.

    The common codecs get their own variant. Anything else is carried
    as [`CodecId::Other`] with the codec library's canonical codec name,
    so a decoder can still be looked up for it.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CodecId {
    // Video codecs
    /// H.264 / AVC
    H264,
    /// H.265 / HEVC
    H265,
    /// VP8
    Vp8,
    /// VP9
    Vp9,
    /// AV1
    Av1,
    /// MPEG-4 Part 2
    Mpeg4,
    /// MPEG-2 Video
    Mpeg2Video,

    // Audio codecs
    /// AAC (Advanced Audio Coding)
    Aac,
    /// Opus
    Opus,
    /// MP3 (MPEG Audio Layer 3)
    Mp3,
    /// Vorbis
    Vorbis,
    /// FLAC (Free Lossless Audio Codec)
    Flac,
    /// PCM signed 16-bit little-endian
    PcmS16Le,
    /// PCM signed 16-bit big-endian
    PcmS16Be,
    /// PCM 32-bit float little-endian
    PcmF32Le,
    /// AC-3 (Dolby Digital)
    Ac3,

    /// Any other codec, by canonical name.
    Other(&'static str),
}

impl CodecId {
    /**
        Canonical short name of the codec, as the codec library spells it.
    */
    pub const fn name(self) -> &'static str {
        match self {
            Self::H264 => "h264",
            Self::H265 => "hevc",
            Self::Vp8 => "vp8",
            Self::Vp9 => "vp9",
            Self::Av1 => "av1",
            Self::Mpeg4 => "mpeg4",
            Self::Mpeg2Video => "mpeg2video",
            Self::Aac => "aac",
            Self::Opus => "opus",
            Self::Mp3 => "mp3",
            Self::Vorbis => "vorbis",
            Self::Flac => "flac",
            Self::PcmS16Le => "pcm_s16le",
            Self::PcmS16Be => "pcm_s16be",
            Self::PcmF32Le => "pcm_f32le",
            Self::Ac3 => "ac3",
            Self::Other(name) => name,
        }
    }

    /**
        Returns true if this is one of the known video codecs.
    */
    pub const fn is_video(self) -> bool {
        matches!(
            self,
            Self::H264
                | Self::H265
                | Self::Vp8
                | Self::Vp9
                | Self::Av1
                | Self::Mpeg4
                | Self::Mpeg2Video
        )
    }

    /**
        Returns true if this is one of the known audio codecs.
    */
    pub const fn is_audio(self) -> bool {
        matches!(
            self,
            Self::Aac
                | Self::Opus
                | Self::Mp3
                | Self::Vorbis
                | Self::Flac
                | Self::PcmS16Le
                | Self::PcmS16Be
                | Self::PcmF32Le
                | Self::Ac3
        )
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
