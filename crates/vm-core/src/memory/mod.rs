//! Word-addressed memory with ordered read/write hooks.

/// Memory-mapped I/O hook traits and tables.
pub mod hooks;
/// Image byte layout helpers.
pub mod image;

pub use hooks::{HookRange, HookTable, ReadHook, WriteHook, HOOK_CAPACITY};
pub use image::{decode_words, encode_words, WORD_BYTES};

use crate::error::{ConfigError, HookError, HookKind};
use crate::word::{normalize, Word};

/// Largest memory the 16-bit address can reach.
pub const MAX_MEMORY_WORDS: usize = u16::MAX as usize + 1;

/// Content of every word before an image is loaded.
pub const FILL_PATTERN: Word = 0xAAAA_AAAA;

/// Linear word store plus I/O hooks.
///
/// Reads consult the read hooks first (first match wins, result returned
/// as-is), then storage (normalized), then fall back to `0` out of bounds.
/// Writes fire every matching write hook; if any matched, storage is left
/// untouched.
#[derive(Debug)]
pub struct Memory {
    rows: u16,
    row_size: u16,
    content: Box<[Word]>,
    read_hooks: HookTable<dyn ReadHook>,
    write_hooks: HookTable<dyn WriteHook>,
}

impl Memory {
    /// Allocates `rows * row_size` words filled with [`FILL_PATTERN`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyMemory`] for a zero dimension and
    /// [`ConfigError::MemoryTooLarge`] when the capacity exceeds
    /// [`MAX_MEMORY_WORDS`].
    pub fn new(rows: u16, row_size: u16) -> Result<Self, ConfigError> {
        let words = usize::from(rows) * usize::from(row_size);
        if words == 0 {
            return Err(ConfigError::EmptyMemory);
        }
        if words > MAX_MEMORY_WORDS {
            return Err(ConfigError::MemoryTooLarge {
                words,
                max: MAX_MEMORY_WORDS,
            });
        }

        Ok(Self {
            rows,
            row_size,
            content: vec![FILL_PATTERN; words].into_boxed_slice(),
            read_hooks: HookTable::new(HookKind::Read),
            write_hooks: HookTable::new(HookKind::Write),
        })
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Words per row.
    #[must_use]
    pub const fn row_size(&self) -> u16 {
        self.row_size
    }

    /// Capacity in words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Always `false`; construction rejects empty geometries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Architectural read.
    pub fn read(&mut self, addr: u16) -> Word {
        if let Some(value) = self.read_hooks.dispatch(addr) {
            return value;
        }
        self.peek(addr)
    }

    /// Architectural write.
    pub fn write(&mut self, addr: u16, value: Word) {
        if self.write_hooks.dispatch(addr, value) {
            return;
        }
        if let Some(slot) = self.content.get_mut(usize::from(addr)) {
            *slot = normalize(value);
        }
    }

    /// Storage read that bypasses hooks; `0` out of bounds.
    #[must_use]
    pub fn peek(&self, addr: u16) -> Word {
        self.content
            .get(usize::from(addr))
            .copied()
            .map_or(0, normalize)
    }

    /// Raw stored words, for dump and render collaborators.
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.content
    }

    /// Registers a read hook on `[base, base + length]`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::CapacityExceeded`] once [`HOOK_CAPACITY`] read
    /// hooks exist.
    pub fn add_read_hook(
        &mut self,
        base: u16,
        length: u16,
        hook: impl ReadHook + 'static,
    ) -> Result<(), HookError> {
        self.read_hooks
            .push(HookRange::new(base, length), Box::new(hook))
    }

    /// Registers a write hook on `[base, base + length]`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::CapacityExceeded`] once [`HOOK_CAPACITY`] write
    /// hooks exist.
    pub fn add_write_hook(
        &mut self,
        base: u16,
        length: u16,
        hook: impl WriteHook + 'static,
    ) -> Result<(), HookError> {
        self.write_hooks
            .push(HookRange::new(base, length), Box::new(hook))
    }

    /// Registered read hooks.
    #[must_use]
    pub const fn read_hooks(&self) -> &HookTable<dyn ReadHook> {
        &self.read_hooks
    }

    /// Registered write hooks.
    #[must_use]
    pub const fn write_hooks(&self) -> &HookTable<dyn WriteHook> {
        &self.write_hooks
    }

    /// Loads an image from address 0, truncating to capacity and
    /// zero-filling the rest. Returns the number of words taken from `bytes`.
    ///
    /// Stored words are kept verbatim; reads normalize them.
    pub fn load_image(&mut self, bytes: &[u8]) -> usize {
        self.content.fill(0);
        let mut loaded = 0;
        for (slot, word) in self.content.iter_mut().zip(decode_words(bytes)) {
            *slot = word;
            loaded += 1;
        }
        loaded
    }

    /// Stores `words` from address 0 without touching the rest.
    pub fn load_words(&mut self, words: &[Word]) {
        for (slot, word) in self.content.iter_mut().zip(words) {
            *slot = *word;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Memory, FILL_PATTERN, MAX_MEMORY_WORDS};
    use crate::error::{ConfigError, HookError};
    use crate::memory::{encode_words, HOOK_CAPACITY};
    use crate::word::Word;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn memory() -> Memory {
        Memory::new(1, 128).unwrap()
    }

    #[test]
    fn geometry_is_validated() {
        assert_eq!(Memory::new(0, 128).unwrap_err(), ConfigError::EmptyMemory);
        assert_eq!(Memory::new(4, 0).unwrap_err(), ConfigError::EmptyMemory);
        assert_eq!(
            Memory::new(1024, 128).unwrap_err(),
            ConfigError::MemoryTooLarge {
                words: 1024 * 128,
                max: MAX_MEMORY_WORDS
            }
        );
        assert_eq!(Memory::new(512, 128).unwrap().len(), MAX_MEMORY_WORDS);
    }

    #[test]
    fn fresh_memory_holds_fill_pattern() {
        let mut mem = memory();
        assert_eq!(mem.read(0), FILL_PATTERN);
        assert_eq!(mem.words().len(), 128);
        assert_eq!((mem.rows(), mem.row_size()), (1, 128));
    }

    #[test]
    fn out_of_bounds_reads_zero_and_writes_are_dropped() {
        let mut mem = memory();
        mem.write(128, 5);
        assert_eq!(mem.read(128), 0);
        assert_eq!(mem.read(u16::MAX), 0);
        assert!(mem.words().iter().all(|word| *word == FILL_PATTERN));
    }

    #[test]
    fn stores_and_reads_are_normalized() {
        let mut mem = memory();
        mem.write(3, 0xC000_0000);
        assert_eq!(mem.words()[3], 0);

        mem.load_words(&[0, 0, 0, 0, 0x8000_0000]);
        assert_eq!(mem.words()[4], 0x8000_0000);
        assert_eq!(mem.read(4), 0);
    }

    #[test]
    fn hooked_write_suppresses_store() {
        let mut mem = memory();
        mem.write(5, 0x1234);
        let hits = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&hits);
        mem.add_write_hook(5, 0, move |value: Word, offset: u16| {
            sink.borrow_mut().push((value, offset));
        })
        .unwrap();

        mem.write(5, 0x9999);
        mem.write(6, 0x7777);

        assert_eq!(*hits.borrow(), vec![(0x9999, 0)]);
        assert_eq!(mem.peek(5), 0x1234);
        assert_eq!(mem.read(5), 0x1234);
        assert_eq!(mem.read(6), 0x7777);
    }

    #[test]
    fn read_hook_bypasses_storage_and_normalization() {
        let mut mem = memory();
        mem.add_read_hook(200, 3, |addr: u16| -> Word { 0x4000_0000 | Word::from(addr) })
            .unwrap();
        mem.add_read_hook(10, 0, |_: u16| -> Word { 0x8000_0000 })
            .unwrap();

        assert_eq!(mem.read(201), 0x4000_0000 | 201);
        assert_eq!(mem.read(10), 0x8000_0000);
        assert_eq!(mem.peek(10), FILL_PATTERN);
        assert_eq!(mem.read(204), 0);
        assert_eq!(mem.read_hooks().len(), 2);
    }

    #[test]
    fn hook_capacity_is_reported() {
        let mut mem = memory();
        for _ in 0..HOOK_CAPACITY {
            mem.add_read_hook(0, 0, |_: u16| -> Word { 1 }).unwrap();
        }
        assert!(matches!(
            mem.add_read_hook(0, 0, |_: u16| -> Word { 1 }),
            Err(HookError::CapacityExceeded { .. })
        ));
        assert!(mem.write_hooks().is_empty());
    }

    #[test]
    fn image_load_truncates_and_zero_fills() {
        let mut mem = Memory::new(1, 4).unwrap();
        assert_eq!(mem.load_image(&encode_words(&[1, 2])), 2);
        assert_eq!(mem.words(), &[1, 2, 0, 0]);

        assert_eq!(mem.load_image(&encode_words(&[9, 8, 7, 6, 5, 4])), 4);
        assert_eq!(mem.words(), &[9, 8, 7, 6]);
    }
}
