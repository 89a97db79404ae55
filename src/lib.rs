//! # Static Hash Table
//!
//! A hash table that is built once in memory, serialized to a file with a
//! deterministic byte layout, and later consumed by mapping that file back
//! into memory. Lookups run directly over the mapped bytes with no parsing
//! or copying at load time.
//!
//! The intended workload is a sizeable reference table (tens of thousands to
//! millions of entries) that a process needs at startup. Re-hashing a CSV on
//! every boot is slow; this crate moves that cost to an offline build step.
//!
//! - **Build mode** ([`TableBuilder`]): owns a single contiguous arena,
//!   accepts inserts, and writes the finished table to any `Write` sink.
//! - **View mode** ([`StaticTable`]): maps a previously written file
//!   read-only (`memmap2`) and answers lookups over the mapped region.
//!   Reads are zero-copy; [`StaticTable::get_handle`] hands out handles that
//!   keep the mapping alive on their own.
//!
//! Keys are byte strings of any length; values are fixed-size byte records
//! declared up front. The table cannot grow, and the total key length must
//! be known when the builder is created.
//!
//! ## Example Usage
//! ```rust
//! use static_hash_table::{StaticTable, TableBuilder, traits::TableRead};
//!
//! # fn main() -> std::io::Result<()> {
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("ports.table");
//!
//! // Offline build step: 3 entries, 8-byte values, 12 bytes of key data.
//! let mut builder = TableBuilder::new(3, 8, 12);
//! builder.set(b"http", &80u64.to_le_bytes());
//! builder.set(b"https", &443u64.to_le_bytes());
//! builder.set(b"ssh", &22u64.to_le_bytes());
//! builder.write_to_path(&path)?;
//!
//! // Startup path: map the file and look up straight away.
//! let table = StaticTable::open_from_file(&path)?;
//! assert_eq!(table.capacity(), 4);
//! assert_eq!(table.get(b"https"), Some(&443u64.to_le_bytes()[..]));
//! assert_eq!(table.get(b"gopher"), None);
//! # Ok(())
//! # }
//! ```

mod table;
pub use table::*;

pub mod utils;
