use std::time::SystemTime;

use crate::errors::ServerError;
use crate::models::note::Note;

pub mod memory;
pub mod postgres;

/// Storage capability the note store runs against. Everything that has to be
/// a single atomic state transition lives here, so the store's logic stays
/// the same whether the backend is a relational table or an in-process map.
pub trait NoteRepository: Send + Sync {
    fn insert(&self, note: &Note) -> Result<(), ServerError>;

    /// Fetches a row as-is, tombstones included.
    fn find(&self, note_id: &str) -> Result<Option<Note>, ServerError>;

    /// Atomically increments `view_count` where the note is not destroyed
    /// and still under its view limit, returning the new count. `None` means
    /// no row qualified (missing, destroyed, or lost the race to the last
    /// view). When the increment exhausts the limit the row is destroyed and
    /// scrubbed as part of the same call.
    fn consume_view(&self, note_id: &str) -> Result<Option<i32>, ServerError>;

    /// Marks destroyed and scrubs content/iv/salt where not already
    /// destroyed. Returns whether a row actually changed.
    fn bury(&self, note_id: &str) -> Result<bool, ServerError>;

    /// Scrub pass over rows that are past `expires_at`, tombstones created
    /// before `tombstone_cutoff` that still hold content, and exhausted
    /// rows never marked destroyed (destroy paths that forgot to scrub).
    /// Returns rows mutated; running it again immediately must return 0.
    fn scrub_stale(
        &self,
        now: SystemTime,
        tombstone_cutoff: SystemTime,
    ) -> Result<usize, ServerError>;
}
