//! Session event store
//!
//! Split by concern: layout and session creation in `core`, appends and
//! sequence recovery in `write_ops`, log decoding in `read_ops`, and
//! `meta.json` handling in `metadata_ops`.

mod core;
mod metadata_ops;
mod read_ops;
mod write_ops;

pub use self::core::SessionEventStore;

#[cfg(test)]
mod tests;
