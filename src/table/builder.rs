use crate::table::constants::*;
use crate::table::fingerprint::compute_fingerprint;
use crate::table::header::TableHeader;
use crate::table::key_data::{MAX_VARINT_LEN, put_varint};
use crate::table::layout::TableLayout;
use crate::table::sections::{Sections, TableIter};
use crate::table::traits::TableRead;
use std::fs::File;
use std::io::{BufWriter, Result, Write};
use std::path::Path;
use tracing::debug;

/// Write side of the table.
///
/// The builder owns a single contiguous arena holding the header and all
/// four sections, sized up front from the expected item count, the value
/// width, and the total length of all keys. Inserts place entries by linear
/// probing; [`TableBuilder::write_to`] then serializes the arena in one
/// write. The table cannot grow, so the declared counts are a contract:
/// exceeding the slot count or the key-data budget is a fatal sizing bug.
///
/// Reading back through [`TableRead::get`] works at any point, though the
/// expected consumer is a [`StaticTable`](crate::StaticTable) opened from
/// the serialized bytes.
pub struct TableBuilder {
    // Single allocation backing every section; the header occupies its
    // first 16 bytes from construction onward.
    arena: Vec<u8>,
    layout: TableLayout,
    capacity: usize,
    value_size: usize,
    // Next free byte within the key-data region.
    key_cursor: usize,
}

impl TableBuilder {
    /// Creates a builder for `num_items` entries of `value_size` bytes each,
    /// whose keys sum to at most `total_key_length` bytes.
    ///
    /// `num_items` is rounded up to the next power of two so probing can
    /// mask instead of dividing; the realized slot count is available via
    /// [`TableRead::capacity`]. The arena is allocated zero-filled, which
    /// makes every slot empty by definition.
    ///
    /// # Panics
    /// If `num_items` is 0.
    pub fn new(num_items: usize, value_size: usize, total_key_length: usize) -> Self {
        assert!(num_items > 0, "table capacity must be at least 1");

        let capacity = num_items.next_power_of_two();
        let layout =
            TableLayout::compute(capacity as u64, value_size as u64, total_key_length as u64);

        let mut arena = vec![0u8; layout.total_length as usize];
        let header = TableHeader {
            num_items: capacity as u64,
            value_size: value_size as u64,
        };
        arena[..HEADER_SIZE].copy_from_slice(&header.serialize());

        debug!(
            requested = num_items,
            capacity,
            value_size,
            arena_bytes = arena.len(),
            "allocated table arena"
        );

        Self {
            arena,
            layout,
            capacity,
            value_size,
            key_cursor: 0,
        }
    }

    /// Inserts `key` with `value`, or overwrites the value in place when the
    /// key is already present. Each distinct key's bytes are stored once, on
    /// first insert.
    ///
    /// # Panics
    /// - If `value` is not exactly the table's value width.
    /// - If every slot is occupied and `key` is absent (the table was
    ///   undersized).
    /// - If the key-data region cannot hold the key (the declared total key
    ///   length was undersized).
    pub fn set(&mut self, key: &[u8], value: &[u8]) {
        assert_eq!(
            value.len(),
            self.value_size,
            "value width does not match the table's value size"
        );

        let fingerprint = compute_fingerprint(key);
        let (slot, found) = self.sections().find(key, fingerprint);
        if !found {
            let key_offset = self.append_key(key);
            self.set_fingerprint(slot, fingerprint);
            self.set_key_offset(slot, key_offset);
        }

        let range = self.sections().value_range(slot);
        self.arena[range].copy_from_slice(value);
    }

    /// Serializes the table to `writer`: header, hash and key-offset slots,
    /// values, then the used portion of the key-data region. Returns the
    /// number of bytes written.
    ///
    /// The arena is laid out exactly as the file format requires, so this is
    /// a single `write_all` of its populated prefix; unused key-data budget
    /// is not written. The builder is unchanged and can be written again.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<u64> {
        let used = self.layout.key_data_offset as usize + self.key_cursor;
        writer.write_all(&self.arena[..used])?;
        debug!(bytes = used, capacity = self.capacity, "serialized table");
        Ok(used as u64)
    }

    /// Writes the table to a new file at `path` through a buffered writer,
    /// creating or truncating it. Returns the number of bytes written.
    pub fn write_to_path(&self, path: &Path) -> Result<u64> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let written = self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(written)
    }

    /// Iterates over the entries inserted so far, in slot order.
    pub fn iter(&self) -> TableIter<'_> {
        TableIter::new(Some(self.sections()))
    }

    fn sections(&self) -> Sections<'_> {
        Sections::new(&self.arena, self.layout, self.capacity, self.value_size)
    }

    fn set_fingerprint(&mut self, slot: usize, fingerprint: u32) {
        let base = self.layout.hashes_offset as usize + slot * FINGERPRINT_SIZE;
        self.arena[base..base + FINGERPRINT_SIZE].copy_from_slice(&fingerprint.to_le_bytes());
    }

    fn set_key_offset(&mut self, slot: usize, key_offset: usize) {
        let base = self.layout.keys_offset as usize + slot * KEY_OFFSET_SIZE;
        self.arena[base..base + KEY_OFFSET_SIZE]
            .copy_from_slice(&(key_offset as u64).to_le_bytes());
    }

    /// Appends a length-prefixed key record at the key cursor and returns
    /// the record's offset within the key-data region.
    fn append_key(&mut self, key: &[u8]) -> usize {
        let mut prefix = [0u8; MAX_VARINT_LEN];
        let prefix_len = put_varint(&mut prefix, key.len() as i64);

        let region_start = self.layout.key_data_offset as usize;
        let region_len = self.arena.len() - region_start;
        assert!(
            self.key_cursor + prefix_len + key.len() <= region_len,
            "key data region exhausted; the declared total key length was too small"
        );

        let start = self.key_cursor;
        let at = region_start + start;
        self.arena[at..at + prefix_len].copy_from_slice(&prefix[..prefix_len]);
        self.arena[at + prefix_len..at + prefix_len + key.len()].copy_from_slice(key);
        self.key_cursor = start + prefix_len + key.len();
        start
    }
}

impl TableRead for TableBuilder {
    fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let sections = self.sections();
        let (slot, found) = sections.find(key, compute_fingerprint(key));
        found.then(|| sections.value_at(slot))
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn value_size(&self) -> usize {
        self.value_size
    }
}
