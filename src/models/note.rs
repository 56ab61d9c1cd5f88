use crate::crypto;
use crate::errors::{CommonError, Fields, ServerError};
use crate::schema::notes;
use diesel::{Insertable, Queryable};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

pub const CONTENT_MAX_LEN: usize = 50_000;
pub const PASSWORD_MAX_LEN: usize = 100;
pub const MAX_VIEWS_MIN: i32 = 1;
pub const MAX_VIEWS_MAX: i32 = 1000;
pub const LIFETIME_MIN_MS: u64 = 1_000;
pub const LIFETIME_MAX_MS: u64 = 365 * 24 * 60 * 60 * 1000;
pub const ID_LEN: usize = 25;

/// The sole persisted entity. Rows are never deleted, only marked destroyed
/// and scrubbed; a destroyed row is a tombstone.
#[derive(Clone, Debug, Queryable, Insertable)]
#[diesel(table_name = notes)]
pub struct Note {
    pub id: String,
    pub content: String,
    pub iv: Option<String>,
    pub salt: Option<String>,
    pub is_encrypted: bool,
    pub created_at: SystemTime,
    pub expires_at: Option<SystemTime>,
    pub max_views: i32,
    pub view_count: i32,
    pub is_destroyed: bool,
}

impl Note {
    pub fn is_expired(&self, now: SystemTime) -> bool {
        match self.expires_at {
            Some(deadline) => deadline <= now,
            None => false,
        }
    }

    pub fn views_left(&self) -> i32 {
        (self.max_views - self.view_count).max(0)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateNote {
    pub content: String,
    pub password: Option<String>,
    pub lifetime_in_ms: Option<u64>,
    pub max_views: Option<i32>,
}

impl CreateNote {
    pub fn into_note(self) -> Result<Note, ServerError> {
        let mut invalid = vec![];

        if self.content.is_empty() {
            invalid.push(Fields::Content(CommonError::Empty));
        } else if self.content.len() > CONTENT_MAX_LEN {
            invalid.push(Fields::Content(CommonError::TooBig));
        }

        if let Some(password) = &self.password {
            if password.is_empty() {
                invalid.push(Fields::Password(CommonError::Empty));
            } else if password.len() > PASSWORD_MAX_LEN {
                invalid.push(Fields::Password(CommonError::TooBig));
            }
        }

        let max_views = self.max_views.unwrap_or(1);
        if max_views < MAX_VIEWS_MIN {
            invalid.push(Fields::MaxViews(CommonError::TooSmall));
        } else if max_views > MAX_VIEWS_MAX {
            invalid.push(Fields::MaxViews(CommonError::TooBig));
        }

        if let Some(lifetime) = self.lifetime_in_ms {
            if lifetime < LIFETIME_MIN_MS {
                invalid.push(Fields::LifetimeInMs(CommonError::TooSmall));
            } else if lifetime > LIFETIME_MAX_MS {
                invalid.push(Fields::LifetimeInMs(CommonError::TooBig));
            }
        }

        if !invalid.is_empty() {
            return Err(ServerError::UserError(invalid));
        }

        let time_now = SystemTime::now();
        let expires_at = self
            .lifetime_in_ms
            .map(|ms| time_now + Duration::from_millis(ms));

        let (content, iv, salt, is_encrypted) = match &self.password {
            Some(password) => {
                let sealed = crypto::encrypt(&self.content, password);
                (sealed.ciphertext, Some(sealed.iv), Some(sealed.salt), true)
            }
            None => (self.content, None, None, false),
        };

        Ok(Note {
            id: nanoid!(ID_LEN),
            content,
            iv,
            salt,
            is_encrypted,
            created_at: time_now,
            expires_at,
            max_views,
            view_count: 0,
            is_destroyed: false,
        })
    }
}

/// What a successful read hands back to the caller.
#[derive(Clone, Debug, Serialize)]
pub struct ReadNote {
    pub id: String,
    pub content: String,
    pub created_at: SystemTime,
    pub view_count: i32,
    pub is_encrypted: bool,
}

/// Side-effect-free projection so a client can decide whether to prompt for
/// a password before spending a view on the real read.
#[derive(Clone, Debug, Serialize)]
pub struct NoteStatus {
    pub exists: bool,
    pub is_expired: bool,
    pub max_views_reached: bool,
    pub is_encrypted: bool,
    pub views_left: i32,
    pub expires_at: Option<SystemTime>,
}
