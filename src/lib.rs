//! Byte buffer primitives for framing RPC messages: serialize a body, stamp
//! the length/ID header in front of it once the body size is known, and hand
//! the finished span to an I/O layer without copying.

pub mod buf;
pub mod utils;

pub use buf::{BufConfig, IoBuf, Slice, StreamBuf};
