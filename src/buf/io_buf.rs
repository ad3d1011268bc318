use std::ops;
use std::ops::Bound;

use super::Slice;

/// A contiguous run of initialized bytes that can be handed to an I/O layer
/// without copying.
///
/// Implementors expose a stable pointer/length pair describing their readable
/// span, so a network write call can consume them directly.
///
/// # Safety
/// `read_ptr` must point at `bytes_init` readable bytes, and both must stay
/// valid while the value is alive and unmoved between the two calls.
pub unsafe trait IoBuf: Unpin + 'static {
    /// Pointer to the first readable byte.
    fn read_ptr(&self) -> *const u8;

    /// Number of readable bytes behind [`read_ptr`](Self::read_ptr).
    fn bytes_init(&self) -> usize;

    /// Returns an owned view over a sub-range of this buffer.
    ///
    /// Useful for re-submitting the unsent remainder after a partial write.
    #[inline]
    fn slice(self, range: impl ops::RangeBounds<usize>) -> Slice<Self>
    where
        Self: Sized,
    {
        let (begin, end) = parse_range(range, self.bytes_init());
        Slice::new(self, begin, end)
    }
}

unsafe impl IoBuf for Vec<u8> {
    #[inline]
    fn read_ptr(&self) -> *const u8 {
        self.as_ptr()
    }

    #[inline]
    fn bytes_init(&self) -> usize {
        self.len()
    }
}

unsafe impl IoBuf for Box<[u8]> {
    #[inline]
    fn read_ptr(&self) -> *const u8 {
        self.as_ptr()
    }

    #[inline]
    fn bytes_init(&self) -> usize {
        self.len()
    }
}

unsafe impl IoBuf for &'static [u8] {
    #[inline]
    fn read_ptr(&self) -> *const u8 {
        self.as_ptr()
    }

    #[inline]
    fn bytes_init(&self) -> usize {
        <[u8]>::len(self)
    }
}

unsafe impl IoBuf for bytes::Bytes {
    #[inline]
    fn read_ptr(&self) -> *const u8 {
        self.as_ptr()
    }

    #[inline]
    fn bytes_init(&self) -> usize {
        self.len()
    }
}

unsafe impl IoBuf for bytes::BytesMut {
    #[inline]
    fn read_ptr(&self) -> *const u8 {
        self.as_ptr()
    }

    #[inline]
    fn bytes_init(&self) -> usize {
        self.len()
    }
}

fn parse_range(range: impl ops::RangeBounds<usize>, end: usize) -> (usize, usize) {
    let begin = match range.start_bound() {
        Bound::Included(&n) => n,
        Bound::Excluded(&n) => n + 1,
        Bound::Unbounded => 0,
    };

    let end = match range.end_bound() {
        Bound::Included(&n) => n + 1,
        Bound::Excluded(&n) => n,
        Bound::Unbounded => end,
    };
    (begin, end)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::buf::deref;

    #[test]
    fn vec_hands_off_its_bytes() {
        let buf = b"payload".to_vec();
        assert_eq!(deref(&buf), b"payload");
        assert_eq!(buf.bytes_init(), 7);
    }

    #[test]
    fn static_slice_hands_off() {
        let buf: &'static [u8] = b"static region";
        assert_eq!(deref(&buf), b"static region");
    }

    #[test]
    fn bytes_hand_off() {
        let buf = bytes::Bytes::from_static(b"network bytes");
        assert_eq!(deref(&buf), b"network bytes");
        assert_eq!(buf.bytes_init(), 13);
    }
}
