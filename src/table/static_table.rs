use crate::table::constants::*;
use crate::table::fingerprint::compute_fingerprint;
use crate::table::header::TableHeader;
use crate::table::layout::TableLayout;
use crate::table::sections::{Sections, TableIter};
use crate::table::traits::TableRead;
use crate::table::value_handle::ValueHandle;
use memmap2::Mmap;
use std::fmt;
use std::fs::File;
use std::io::{Error, ErrorKind, Result};
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Read-only backing for a loaded table: a mapped file, bytes the caller
/// handed over, or a region compiled into the binary.
pub(crate) enum TableData {
    Mapped(Mmap),
    Owned(Vec<u8>),
    Static(&'static [u8]),
}

impl Deref for TableData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            TableData::Mapped(mmap) => mmap,
            TableData::Owned(bytes) => bytes,
            TableData::Static(bytes) => bytes,
        }
    }
}

impl fmt::Debug for TableData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            TableData::Mapped(_) => "mapped",
            TableData::Owned(_) => "owned",
            TableData::Static(_) => "static",
        };
        write!(f, "TableData::{kind}({} bytes)", self.len())
    }
}

/// Read side of the table: a populated table opened from a serialized file
/// or byte region.
///
/// Opening validates the header and section bounds, then derives the same
/// four section views a builder uses. There is no deserialization step, so
/// open cost is independent of entry count. Lookups read only the mapped
/// bytes; two processes mapping the same file see identical contents.
///
/// `get` never writes, so a `StaticTable` can be shared across threads and
/// read concurrently without synchronization.
#[derive(Debug)]
pub struct StaticTable {
    // None once closed. Outstanding handles keep the backing alive; the
    // mapping is released when the last owner drops.
    data: Option<Arc<TableData>>,
    layout: TableLayout,
    capacity: usize,
    value_size: usize,
}

impl StaticTable {
    /// Opens a table file and maps it read-only.
    ///
    /// # Errors
    /// - [`ErrorKind::NotFound`] / [`ErrorKind::InvalidInput`] when `path`
    ///   is missing or not a regular file.
    /// - [`ErrorKind::InvalidData`] when the contents fail validation (see
    ///   [`StaticTable::open_from_bytes`]).
    /// - Any I/O error from opening or mapping the file.
    pub fn open_from_file(path: &Path) -> Result<Self> {
        verify_table_file(path)?;
        let file = File::open(path)?;

        // SAFETY: the mapping is private and read-only. The documented
        // contract is that nothing truncates or rewrites the file while a
        // table holds it mapped; tables are written once and then immutable.
        let mmap = unsafe { Mmap::map(&file)? };
        debug!(path = %path.display(), bytes = mmap.len(), "mapped table file");

        Self::from_data(TableData::Mapped(mmap))
    }

    /// Opens a table over bytes the caller already holds, taking ownership.
    ///
    /// # Errors
    /// [`ErrorKind::InvalidData`] when the bytes are too short for a header,
    /// the header's slot count is not a non-zero power of two, either header
    /// field is implausibly large, or the sections it implies extend past
    /// the end of the data.
    pub fn open_from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_data(TableData::Owned(bytes))
    }

    /// Opens a table over a region with static lifetime, such as one
    /// embedded with `include_bytes!`. No bytes are copied.
    ///
    /// # Errors
    /// As for [`StaticTable::open_from_bytes`].
    pub fn open_from_static(bytes: &'static [u8]) -> Result<Self> {
        Self::from_data(TableData::Static(bytes))
    }

    /// Looks up `key` and returns an owned handle to its value bytes.
    ///
    /// The handle is an `Arc` clone of the backing plus a byte range, so it
    /// stays valid after the table is closed or dropped and can be sent to
    /// other threads. For borrowed access use [`TableRead::get`].
    pub fn get_handle(&self, key: &[u8]) -> Option<ValueHandle> {
        let data = self.data.as_ref()?;
        let sections = Sections::new(data, self.layout, self.capacity, self.value_size);
        let (slot, found) = sections.find(key, compute_fingerprint(key));
        found.then(|| ValueHandle::new(Arc::clone(data), sections.value_range(slot)))
    }

    /// Iterates over the table's entries in slot order. An iterator over a
    /// closed table is empty.
    pub fn iter(&self) -> TableIter<'_> {
        TableIter::new(self.sections())
    }

    /// Releases this table's hold on the backing region. Idempotent.
    ///
    /// Lookups on a closed table report every key as missing. Outstanding
    /// [`ValueHandle`]s are unaffected; the mapping itself is unmapped when
    /// the last of them drops.
    pub fn close(&mut self) {
        self.data = None;
    }

    /// True once [`StaticTable::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.data.is_none()
    }

    fn from_data(data: TableData) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "table data is {} bytes, shorter than the {HEADER_SIZE}-byte header",
                    data.len()
                ),
            ));
        }

        let header = TableHeader::deserialize(&data[..HEADER_SIZE]);
        if header.num_items == 0 || !header.num_items.is_power_of_two() {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "header slot count {} is not a non-zero power of two",
                    header.num_items
                ),
            ));
        }
        if header.num_items > MAX_CAPACITY || header.value_size > MAX_VALUE_SIZE {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "header is implausible: {} slots of {}-byte values",
                    header.num_items, header.value_size
                ),
            ));
        }

        let layout = TableLayout::compute(header.num_items, header.value_size, 0);
        if layout.key_data_offset > data.len() as u64 {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "table sections need {} bytes but the data is only {}",
                    layout.key_data_offset,
                    data.len()
                ),
            ));
        }

        debug!(
            capacity = header.num_items,
            value_size = header.value_size,
            bytes = data.len(),
            "validated static table"
        );

        Ok(Self {
            data: Some(Arc::new(data)),
            layout,
            capacity: header.num_items as usize,
            value_size: header.value_size as usize,
        })
    }

    fn sections(&self) -> Option<Sections<'_>> {
        let data = self.data.as_ref()?;
        Some(Sections::new(
            data,
            self.layout,
            self.capacity,
            self.value_size,
        ))
    }
}

impl TableRead for StaticTable {
    fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let sections = self.sections()?;
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

/// Rejects paths that cannot back a table before any mapping is attempted,
/// with a more pointed error than the raw `File::open` failure.
fn verify_table_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::new(
            ErrorKind::NotFound,
            format!("table file '{}' does not exist", path.display()),
        ));
    }
    if !path.is_file() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("'{}' is not a regular file", path.display()),
        ));
    }
    Ok(())
}
