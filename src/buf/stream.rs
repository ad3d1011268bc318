use std::fmt;
use std::mem;
use std::slice;

use crate::utils::stats;

use super::IoBuf;

/// Space reserved in front of a fresh owned buffer so small headers can be
/// prepended without moving the body.
pub const DEFAULT_HEADER_MARGIN: usize = 64;

/// Minimum amount added per reallocation when appending past capacity.
pub const DEFAULT_GROW_SIZE: usize = 1024;

/// Construction-time tuning for [`StreamBuf`].
///
/// These are performance policy, not correctness knobs.
#[derive(Debug, Clone, Copy)]
pub struct BufConfig {
    /// Bytes reserved before the read cursor for later [`StreamBuf::write_head`]
    /// calls.
    pub header_margin: usize,
    /// Minimum growth step for [`StreamBuf::write`] reallocations.
    pub grow_size: usize,
    /// Reclaim consumed space after large reads. Off by default: framing
    /// buffers are usually read once and dropped, so the move is wasted work.
    pub compact_on_read: bool,
}

impl Default for BufConfig {
    fn default() -> Self {
        Self {
            header_margin: DEFAULT_HEADER_MARGIN,
            grow_size: DEFAULT_GROW_SIZE,
            compact_on_read: false,
        }
    }
}

enum Storage {
    /// Growable region, freed on drop. The vector is kept resized so that its
    /// length is the usable capacity.
    Owned(Vec<u8>),
    /// Externally owned region. Never grown, shrunk, or freed here; must stay
    /// valid for every read through this buffer.
    Borrowed { ptr: *const u8, len: usize },
}

/// Growable byte buffer for framing RPC messages.
///
/// Payload bytes are appended with [`write`](Self::write), consumed in the
/// same order with [`read`](Self::read), and fixed-size headers (message
/// length, request ID) are stamped in front of an already-serialized body
/// with [`write_head`](Self::write_head).
///
/// An owned buffer manages its own storage and grows on demand. A borrowed
/// buffer wraps memory owned elsewhere, e.g. a network library's receive
/// region, and rejects every mutation; see [`from_raw`](Self::from_raw).
///
/// The type is move-only. A finished message is handed to a consumer by value
/// or with [`swap`](Self::swap); two instances never share one region.
pub struct StreamBuf {
    storage: Storage,
    /// Offset of the next unread byte.
    rpos: usize,
    /// Offset one past the last written byte.
    wpos: usize,
    cfg: BufConfig,
}

impl StreamBuf {
    /// Creates an owned buffer with the default configuration.
    ///
    /// Twice the header margin is allocated up front and both cursors start
    /// at the margin, so the front half is free header space and the buffer
    /// is logically empty.
    pub fn new() -> Self {
        Self::with_config(BufConfig::default())
    }

    /// Creates an owned buffer with explicit tuning.
    pub fn with_config(cfg: BufConfig) -> Self {
        Self {
            storage: Storage::Owned(vec![0; cfg.header_margin * 2]),
            rpos: cfg.header_margin,
            wpos: cfg.header_margin,
            cfg,
        }
    }

    /// Wraps external memory as a read-only view. The region is never grown
    /// or freed by this buffer, and prepending is disallowed.
    ///
    /// # Safety
    /// `ptr` must be valid for reads of `len` bytes for as long as this
    /// buffer reads through it.
    pub unsafe fn from_raw(ptr: *const u8, len: usize) -> Self {
        Self {
            storage: Storage::Borrowed { ptr, len },
            rpos: 0,
            wpos: len,
            cfg: BufConfig::default(),
        }
    }

    /// Re-points this instance at a new borrowed region, discarding any prior
    /// owned allocation. Lets one buffer object be reused across many
    /// incoming views without reallocating per message.
    ///
    /// # Safety
    /// Same contract as [`from_raw`](Self::from_raw).
    pub unsafe fn rebind(&mut self, ptr: *const u8, len: usize) {
        self.storage = Storage::Borrowed { ptr, len };
        self.rpos = 0;
        self.wpos = len;
    }

    /// Unread bytes remaining in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.wpos - self.rpos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Base address of the underlying storage.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        match &self.storage {
            Storage::Owned(v) => v.as_ptr(),
            Storage::Borrowed { ptr, .. } => *ptr,
        }
    }

    /// The unread span, read cursor up to the write cursor.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage_bytes()[self.rpos..self.wpos]
    }

    /// Appends `src` at the write cursor, growing owned storage on demand.
    ///
    /// # Panics
    /// Panics if the buffer is borrowed.
    pub fn write(&mut self, src: &[u8]) {
        let wpos = self.wpos;
        let grow = self.cfg.grow_size;
        let buf = self.owned_mut("write");
        let needed = wpos + src.len();
        if needed > buf.len() {
            let new_end = needed.max(wpos + grow);
            log::debug!("buffer full, growing: capacity {} -> {}", buf.len(), new_end);
            buf.resize(new_end, 0);
        }
        buf[wpos..needed].copy_from_slice(src);
        self.wpos = needed;
    }

    /// Copies the next `dst.len()` unread bytes into `dst` and advances the
    /// read cursor.
    ///
    /// # Panics
    /// Panics when asked for more bytes than have been written.
    pub fn read(&mut self, dst: &mut [u8]) {
        assert!(
            self.rpos + dst.len() <= self.wpos,
            "reading beyond written data: requested {} bytes, {} available",
            dst.len(),
            self.len()
        );
        dst.copy_from_slice(&self.storage_bytes()[self.rpos..self.rpos + dst.len()]);
        self.rpos += dst.len();
        if self.cfg.compact_on_read && self.rpos > self.cfg.grow_size {
            self.compact();
        }
    }

    /// Writes `src` immediately before the unread region, stamping a header
    /// in front of an already-serialized body.
    ///
    /// The margin reserved at construction normally absorbs this in place.
    /// When a header outgrows the remaining margin the whole region is
    /// reallocated with the content moved to its tail; that path is logged
    /// and counted since it means the margin is undersized for the protocol's
    /// headers.
    ///
    /// # Panics
    /// Panics if the buffer is borrowed.
    pub fn write_head(&mut self, src: &[u8]) {
        let margin = self.cfg.header_margin;
        let (rpos, wpos) = (self.rpos, self.wpos);
        let n = src.len();
        let buf = self.owned_mut("write_head");
        if rpos < n {
            log::warn!(
                "reallocating to fit a {}-byte header with {} bytes of margin",
                n,
                rpos
            );
            stats::note_head_realloc();
            let new_end = (wpos + n).max(wpos + margin);
            let mut fresh = vec![0; new_end];
            let new_rpos = new_end - (wpos - rpos);
            fresh[new_rpos..].copy_from_slice(&buf[rpos..wpos]);
            *buf = fresh;
            let start = new_rpos - n;
            buf[start..new_rpos].copy_from_slice(src);
            self.rpos = start;
            self.wpos = new_end;
        } else {
            let start = rpos - n;
            buf[start..rpos].copy_from_slice(src);
            self.rpos = start;
        }
    }

    /// Exchanges the complete state of two buffers in O(1): storage,
    /// ownership mode, cursors, and configuration, both ways.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    fn storage_bytes(&self) -> &[u8] {
        match &self.storage {
            Storage::Owned(v) => v,
            // Safety: the `from_raw`/`rebind` contract guarantees `ptr` is
            // readable for `len` bytes while `self` is alive
            Storage::Borrowed { ptr, len } => unsafe { slice::from_raw_parts(*ptr, *len) },
        }
    }

    fn capacity_end(&self) -> usize {
        match &self.storage {
            Storage::Owned(v) => v.len(),
            Storage::Borrowed { len, .. } => *len,
        }
    }

    fn owned_mut(&mut self, op: &str) -> &mut Vec<u8> {
        match &mut self.storage {
            Storage::Owned(v) => v,
            Storage::Borrowed { len, .. } => panic!(
                "{} into a borrowed buffer of {} bytes is not allowed",
                op, len
            ),
        }
    }

    // Move the unread span to the front and give the consumed prefix back to
    // the allocator.
    fn compact(&mut self) {
        let (rpos, wpos) = (self.rpos, self.wpos);
        let buf = match &mut self.storage {
            Storage::Owned(v) => v,
            Storage::Borrowed { .. } => return,
        };
        buf.copy_within(rpos..wpos, 0);
        let new_end = buf.len() - rpos;
        buf.truncate(new_end);
        buf.shrink_to_fit();
        self.rpos = 0;
        self.wpos = wpos - rpos;
    }
}

impl Default for StreamBuf {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl IoBuf for StreamBuf {
    #[inline]
    fn read_ptr(&self) -> *const u8 {
        self.as_slice().as_ptr()
    }

    #[inline]
    fn bytes_init(&self) -> usize {
        self.len()
    }
}

impl fmt::Debug for StreamBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.storage {
            Storage::Owned(_) => "owned",
            Storage::Borrowed { .. } => "borrowed",
        };
        f.debug_struct("StreamBuf")
            .field("mode", &mode)
            .field("rpos", &self.rpos)
            .field("wpos", &self.wpos)
            .field("capacity_end", &self.capacity_end())
            .finish()
    }
}
