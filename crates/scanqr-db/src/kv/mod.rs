//! # Device Key-Value Backend
//!
//! Scan records kept as one JSON blob under a single storage key.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  KeyValueBackend<S>                                                     │
//! │       │   "scanned_codes" → [{data,type,timestamp}, ...] newest first  │
//! │       ▼                                                                 │
//! │  KeyValueStorage (trait)                                               │
//! │  ├── MemoryStorage   HashMap behind a tokio RwLock                     │
//! │  └── FileStorage     one file per key, temp file + rename              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Known Weak Points
//! `create` is a read-modify-write of the whole blob. One `KeyValueBackend`
//! serializes its own writes, but two instances (or two processes) over the
//! same storage can both read the same blob and the second write wins,
//! losing the first record. `FileStorage` keeps the value whole in that
//! case; only the update is lost. This is acceptable for one user on one
//! device. Anything stronger needs per-record keys or an append-only log
//! instead of a single blob.
//!
//! A record id is its entry's timestamp. Blobs this backend writes never
//! repeat a timestamp, but a blob from another writer may. Entries with
//! the same timestamp then share an id, and `delete_one` removes only the
//! first (newest) of them.

pub mod backend;
pub mod storage;

pub use backend::{decode_blob, encode_blob, KeyValueBackend, StoredCode, SCANNED_CODES_KEY};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
