use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::Lazy;

static HEAD_REALLOCS: Lazy<AtomicUsize> = Lazy::new(|| AtomicUsize::new(0));

/// Number of times a header prepend had to rebuild its storage because the
/// reserved margin was too small. A steadily rising value means the margin
/// is undersized for the protocol's headers.
pub fn head_realloc_count() -> usize {
    HEAD_REALLOCS.load(Ordering::Relaxed)
}

pub(crate) fn note_head_realloc() {
    HEAD_REALLOCS.fetch_add(1, Ordering::Relaxed);
}
