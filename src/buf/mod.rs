mod io_buf;
mod slice;
mod stream;

pub use io_buf::IoBuf;
pub use slice::Slice;
pub use stream::{BufConfig, StreamBuf, DEFAULT_GROW_SIZE, DEFAULT_HEADER_MARGIN};

pub(crate) fn deref(buf: &impl IoBuf) -> &[u8] {
    // Safety: The `IoBuf` trait is marked as unsafe and is expected to be
    // implemented correctly
    unsafe { std::slice::from_raw_parts(buf.read_ptr(), buf.bytes_init()) }
}
