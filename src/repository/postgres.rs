use std::time::SystemTime;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::ConnectionManager;

use super::NoteRepository;
use crate::errors::ServerError;
use crate::models::note::Note;
use crate::schema::notes::dsl::*;

pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub struct PgNoteRepository {
    pool: Pool,
}

impl PgNoteRepository {
    pub fn new(pool: Pool) -> Self {
        PgNoteRepository { pool }
    }
}

impl NoteRepository for PgNoteRepository {
    fn insert(&self, note: &Note) -> Result<(), ServerError> {
        let mut connection = self.pool.get()?;
        diesel::insert_into(notes)
            .values(note)
            .execute(&mut connection)?;
        Ok(())
    }

    fn find(&self, note_id: &str) -> Result<Option<Note>, ServerError> {
        let mut connection = self.pool.get()?;
        Ok(notes
            .find(note_id.to_owned())
            .get_result::<Note>(&mut connection)
            .optional()?)
    }

    fn consume_view(&self, note_id: &str) -> Result<Option<i32>, ServerError> {
        let mut connection = self.pool.get()?;

        // one transaction, so the terminal view either lands with its scrub
        // or not at all
        connection.transaction(|connection| {
            // the row-count check of this conditional update is what keeps
            // two concurrent readers from both taking the last view
            let updated: Option<(i32, i32)> = diesel::update(
                notes.filter(
                    id.eq(note_id.to_owned())
                        .and(is_destroyed.eq(false))
                        .and(view_count.lt(max_views)),
                ),
            )
            .set(view_count.eq(view_count + 1))
            .returning((view_count, max_views))
            .get_result(connection)
            .optional()?;

            match updated {
                None => Ok(None),
                Some((new_count, cap)) => {
                    if new_count >= cap {
                        diesel::update(notes.filter(id.eq(note_id.to_owned())))
                            .set((
                                is_destroyed.eq(true),
                                content.eq(""),
                                iv.eq(None::<String>),
                                salt.eq(None::<String>),
                            ))
                            .execute(connection)?;
                    }
                    Ok(Some(new_count))
                }
            }
        })
    }

    fn bury(&self, note_id: &str) -> Result<bool, ServerError> {
        let mut connection = self.pool.get()?;
        let changed = diesel::update(
            notes.filter(id.eq(note_id.to_owned()).and(is_destroyed.eq(false))),
        )
        .set((
            is_destroyed.eq(true),
            content.eq(""),
            iv.eq(None::<String>),
            salt.eq(None::<String>),
        ))
        .execute(&mut connection)?;
        Ok(changed > 0)
    }

    fn scrub_stale(
        &self,
        now: SystemTime,
        tombstone_cutoff: SystemTime,
    ) -> Result<usize, ServerError> {
        let mut connection = self.pool.get()?;
        let changed = diesel::update(
            notes.filter(
                expires_at
                    .le(now)
                    .and(is_destroyed.eq(false))
                    .or(is_destroyed
                        .eq(true)
                        .and(created_at.le(tombstone_cutoff))
                        .and(content.ne("")))
                    // exhausted rows whose terminal scrub never landed
                    .or(is_destroyed.eq(false).and(view_count.ge(max_views))),
            ),
        )
        .set((
            is_destroyed.eq(true),
            content.eq(""),
            iv.eq(None::<String>),
            salt.eq(None::<String>),
        ))
        .execute(&mut connection)?;
        Ok(changed)
    }
}
