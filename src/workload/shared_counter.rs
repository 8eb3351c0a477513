//! Counter cell shared between processes through a memory-mapped file
//!
//! Layout: `[0..8)` counter, `[8..16)` number of children that reported
//! ready. Both are native-endian `i64` accessed as atomics.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::atomic::AtomicI64;

use memmap2::{MmapMut, MmapOptions};

use crate::utils::{BenchmarkError, Result};

/// Size of the mapped region
pub const SHARED_LEN: u64 = 16;

/// Memory-mapped counter and ready count
pub struct SharedCounter {
    // Keeps the mapping alive for as long as `base` is handed out
    _mmap: MmapMut,
    base: *mut u8,
}

impl SharedCounter {
    /// Create (or truncate) the backing file, zeroed, and map it
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len(SHARED_LEN)?;
        Self::map(&file)
    }

    /// Map an existing backing file created by the parent
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let len = file.metadata()?.len();
        if len < SHARED_LEN {
            return Err(BenchmarkError::Config(format!(
                "shared counter file {} is {} bytes, need {}",
                path.display(),
                len,
                SHARED_LEN
            )));
        }
        Self::map(&file)
    }

    fn map(file: &File) -> Result<Self> {
        // SAFETY: the file is private to one trial and never resized while mapped.
        let mut mmap = unsafe { MmapOptions::new().len(SHARED_LEN as usize).map_mut(file) }?;
        let base = mmap.as_mut_ptr();
        Ok(Self { _mmap: mmap, base })
    }

    /// Shared counter
    pub fn value(&self) -> &AtomicI64 {
        // SAFETY: the mapping is page aligned, at least SHARED_LEN bytes, and
        // lives as long as `self`.
        unsafe { &*(self.base as *const AtomicI64) }
    }

    /// Children that have reached the start gate
    pub fn ready(&self) -> &AtomicI64 {
        // SAFETY: as for `value`, at offset 8 (still 8-byte aligned).
        unsafe { &*(self.base.add(8) as *const AtomicI64) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_create_starts_zeroed() {
        let dir = tempfile::tempdir().unwrap();
        let shared = SharedCounter::create(&dir.path().join("counter")).unwrap();
        assert_eq!(shared.value().load(Ordering::SeqCst), 0);
        assert_eq!(shared.ready().load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_two_mappings_see_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counter");
        let parent = SharedCounter::create(&path).unwrap();
        let child = SharedCounter::open(&path).unwrap();

        parent.value().store(-1, Ordering::SeqCst);
        assert_eq!(child.value().load(Ordering::SeqCst), -1);

        child.ready().fetch_add(1, Ordering::SeqCst);
        child.value().store(41, Ordering::SeqCst);
        assert_eq!(parent.ready().load(Ordering::SeqCst), 1);
        assert_eq!(parent.value().load(Ordering::SeqCst), 41);
    }

    #[test]
    fn test_open_rejects_short_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counter");
        std::fs::write(&path, [0u8; 4]).unwrap();
        assert!(matches!(
            SharedCounter::open(&path),
            Err(BenchmarkError::Config(_))
        ));
    }
}
