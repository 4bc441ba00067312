/*!
    Shared types for the ffmpeg crate ecosystem.

    This crate defines the vocabulary of the ecosystem, the types that cross crate
    boundaries. It has no dependency on FFmpeg, making it lightweight and letting
    the decode pipeline be driven by any container/codec implementation.

    # Core Types

    - [`Rational`] - Rational numbers for time bases, with timestamp rescaling
    - [`Pts`] and [`MediaDuration`] - Timestamps in time_base units
    - [`Packet`] - Encoded packet data
    - [`Frame`] and [`FrameInfo`] - Reusable decoded frame buffer

    # Stream Information

    - [`StreamDescriptor`] - Read-only view of one elementary stream
    - [`MediaKind`] and [`StreamType`] - What a stream carries
    - [`CodecId`] - Codec identifiers

    # Error Handling

    - [`Error`] and [`Result`] - Errors reported by container and codec implementations
*/

mod codec;
mod error;
mod frame;
mod packet;
mod rational;
mod stream;
mod timestamp;

pub use codec::CodecId;
pub use error::{Error, Result};
pub use frame::{Frame, FrameInfo};
pub use packet::Packet;
pub use rational::Rational;
pub use stream::{MediaKind, StreamDescriptor, StreamParameters, StreamType};
pub use timestamp::{MediaDuration, Pts};
