use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::crypto;
use crate::errors::ServerError;
use crate::models::note::{CreateNote, Note, NoteStatus, ReadNote};
use crate::repository::NoteRepository;

/// Destroyed rows keep their scrubbed shell for this long before the reaper
/// re-checks them for leftover content.
pub const TOMBSTONE_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// The note lifecycle state machine. All mutations go through the
/// repository's atomic operations; this type never does a bare
/// read-modify-write.
#[derive(Clone)]
pub struct NoteStore {
    repo: Arc<dyn NoteRepository>,
}

impl NoteStore {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        NoteStore { repo }
    }

    pub fn create(&self, input: CreateNote) -> Result<String, ServerError> {
        let note = input.into_note()?;
        let note_id = note.id.clone();
        self.repo.insert(&note)?;
        Ok(note_id)
    }

    pub fn read(&self, note_id: &str, password: Option<&str>) -> Result<ReadNote, ServerError> {
        let not_found = || ServerError::NotFound(Some(note_id.to_owned()));

        let note = match self.repo.find(note_id)? {
            Some(note) if !note.is_destroyed => note,
            _ => return Err(not_found()),
        };

        // lazy expiry; whichever of this and the reaper notices first wins
        if note.is_expired(SystemTime::now()) {
            self.repo.bury(note_id)?;
            return Err(not_found());
        }

        if note.view_count >= note.max_views {
            return Err(not_found());
        }

        let content = self.open(&note, password)?;

        // a failed password guess never reaches this point, so exhausting
        // the limit takes exactly max_views successful reads
        let view_count = self.repo.consume_view(note_id)?.ok_or_else(not_found)?;

        Ok(ReadNote {
            id: note.id,
            content,
            created_at: note.created_at,
            view_count,
            is_encrypted: note.is_encrypted,
        })
    }

    pub fn status(&self, note_id: &str) -> Result<NoteStatus, ServerError> {
        let note = match self.repo.find(note_id)? {
            Some(note) if !note.is_destroyed => note,
            _ => return Err(ServerError::NotFound(Some(note_id.to_owned()))),
        };

        Ok(NoteStatus {
            exists: true,
            is_expired: note.is_expired(SystemTime::now()),
            max_views_reached: note.view_count >= note.max_views,
            is_encrypted: note.is_encrypted,
            views_left: note.views_left(),
            expires_at: note.expires_at,
        })
    }

    /// Explicit delete. Needs no proof of authorship; when the note is
    /// encrypted and a password is supplied it is validated first as a
    /// courtesy check, and a wrong one leaves the note intact.
    pub fn destroy(&self, note_id: &str, password: Option<&str>) -> Result<(), ServerError> {
        let note = match self.repo.find(note_id)? {
            Some(note) if !note.is_destroyed => note,
            _ => return Err(ServerError::NotFound(Some(note_id.to_owned()))),
        };

        if note.is_encrypted {
            if let Some(password) = password {
                self.open(&note, Some(password))?;
            }
        }

        if self.repo.bury(note_id)? {
            Ok(())
        } else {
            // lost a race against read's terminal scrub or the reaper
            Err(ServerError::NotFound(Some(note_id.to_owned())))
        }
    }

    /// One reaper tick. Best-effort hygiene; correctness of the view limit
    /// never depends on it.
    pub fn sweep(&self, now: SystemTime) -> Result<usize, ServerError> {
        let cutoff = now.checked_sub(TOMBSTONE_RETENTION).unwrap_or(UNIX_EPOCH);
        self.repo.scrub_stale(now, cutoff)
    }

    fn open(&self, note: &Note, password: Option<&str>) -> Result<String, ServerError> {
        if !note.is_encrypted {
            return Ok(note.content.clone());
        }
        let password = password.ok_or(ServerError::PasswordRequired)?;
        match (&note.iv, &note.salt) {
            (Some(iv), Some(salt)) => Ok(crypto::decrypt(&note.content, password, iv, salt)?),
            _ => Err(ServerError::CryptoError),
        }
    }
}
