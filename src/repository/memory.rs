use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use super::NoteRepository;
use crate::errors::ServerError;
use crate::models::note::Note;

const SHARD_COUNT: usize = 16;

/// Map-backed repository for embedded use and tests. Notes are spread over
/// hash-picked shards, each behind its own mutex, so the check-and-increment
/// is serialized per note without unrelated notes queueing on one global
/// lock. Only O(1) map operations run under a shard lock; the KDF and
/// decryption cost stays outside in the store.
pub struct MemoryNoteRepository {
    shards: Vec<Mutex<HashMap<String, Note>>>,
}

impl Default for MemoryNoteRepository {
    fn default() -> Self {
        MemoryNoteRepository {
            shards: (0..SHARD_COUNT)
                .map(|_| Mutex::new(HashMap::new()))
                .collect(),
        }
    }
}

fn scrub(note: &mut Note) {
    note.is_destroyed = true;
    note.content.clear();
    note.iv = None;
    note.salt = None;
}

fn lock(shard: &Mutex<HashMap<String, Note>>) -> MutexGuard<'_, HashMap<String, Note>> {
    shard.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryNoteRepository {
    fn shard(&self, note_id: &str) -> MutexGuard<'_, HashMap<String, Note>> {
        let mut hasher = DefaultHasher::new();
        note_id.hash(&mut hasher);
        lock(&self.shards[hasher.finish() as usize % SHARD_COUNT])
    }
}

impl NoteRepository for MemoryNoteRepository {
    fn insert(&self, note: &Note) -> Result<(), ServerError> {
        self.shard(&note.id).insert(note.id.clone(), note.clone());
        Ok(())
    }

    fn find(&self, note_id: &str) -> Result<Option<Note>, ServerError> {
        Ok(self.shard(note_id).get(note_id).cloned())
    }

    fn consume_view(&self, note_id: &str) -> Result<Option<i32>, ServerError> {
        let mut guard = self.shard(note_id);
        match guard.get_mut(note_id) {
            Some(note) if !note.is_destroyed && note.view_count < note.max_views => {
                note.view_count += 1;
                let new_count = note.view_count;
                if new_count >= note.max_views {
                    scrub(note);
                }
                Ok(Some(new_count))
            }
            _ => Ok(None),
        }
    }

    fn bury(&self, note_id: &str) -> Result<bool, ServerError> {
        let mut guard = self.shard(note_id);
        match guard.get_mut(note_id) {
            Some(note) if !note.is_destroyed => {
                scrub(note);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn scrub_stale(
        &self,
        now: SystemTime,
        tombstone_cutoff: SystemTime,
    ) -> Result<usize, ServerError> {
        let mut changed = 0;
        for shard in &self.shards {
            let mut guard = lock(shard);
            for note in guard.values_mut() {
                let expired = note.is_expired(now) && !note.is_destroyed;
                let stale_tombstone = note.is_destroyed
                    && note.created_at <= tombstone_cutoff
                    && !note.content.is_empty();
                // exhausted rows whose terminal scrub never landed
                let missed_scrub = !note.is_destroyed && note.view_count >= note.max_views;
                if expired || stale_tombstone || missed_scrub {
                    scrub(note);
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }
}
