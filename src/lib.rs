//! identity-cache: open-addressed maps keyed by object identity, and a
//! memoizing cache that holds its keys weakly.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one probing engine, two containers with different ownership of
//!   their keys.
//! - Layers:
//!   - RawTable<K, V, S>: open-addressed slot array (empty, occupied,
//!     tombstone) with perturbed probing, a 2/3 load budget and
//!     generation-stamped slot indices and cursors.
//!   - IdentityMap<K, V, S>: owns strong keys (`Rc`/`Arc`). Lookup is by
//!     allocation address; `Eq`/`Hash` of the pointee never run.
//!   - Memoizer<K, V, F, S>: stores weak handles plus computed values.
//!     A miss runs the computation function once; dead keys are swept by
//!     an explicit `reap`.
//!
//! Constraints
//! - Identity is the address of the shared allocation. A weak handle keeps
//!   that allocation reserved, so a live key can never collide with a dead
//!   entry's address.
//! - Each slot stores its hash; growth and in-place rehash never call the
//!   hasher or user code.
//! - Lookups and inserts stay O(1) average: occupied plus tombstone slots
//!   never exceed two thirds of capacity.
//!
//! Iteration and resizing
//! - Borrowing iterators (`iter`, `keys`, `values`, ...) hold the table
//!   borrowed, so no resize can happen under them.
//! - Detached walks use `Cursor`, which records the table generation and
//!   fails with `Error::StaleCursor` once a resize happened. `SlotIndex`
//!   follows the same rule. Both also carry the issuing table's id and fail
//!   with `Error::ForeignCursor` on any other table.
//!
//! Release of keys and values
//! - `delete`, `clear`, `reap`, replacement through `set` and dropping the
//!   container release exactly the references they held. Drop glue of a
//!   released key or value runs after the table is consistent again.
//!
//! Notes and non-goals
//! - No persistence, no thread-safe sharing of a single container, no size
//!   bounds or eviction policy.
//! - The memoizer does not sweep dead keys implicitly on every access.

mod error;
mod identity;
mod identity_map;
mod memoizer;
pub mod raw_table;
mod raw_table_proptest;

// Public surface
pub use error::{Error, Result};
pub use identity::{Identified, Identity, StrongKey, WeakKey};
pub use identity_map::{IdentityMap, Keys, Values, ValuesMut};
pub use memoizer::{Memoizer, MemoizerBuilder};
pub use raw_table::{Cursor, RawTable, SlotIndex};
