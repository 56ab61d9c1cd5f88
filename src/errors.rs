use actix_web::HttpResponse;
use derive_more::Display;
use serde_json::json;

use crate::crypto::DecryptError;

#[derive(Clone, Copy, Debug, Display)]
pub enum CommonError {
    #[display(fmt = "is empty")]
    Empty,
    #[display(fmt = "is too small")]
    TooSmall,
    #[display(fmt = "is too big")]
    TooBig,
}

#[derive(Clone, Copy, Debug, Display)]
pub enum Fields {
    #[display(fmt = "content {}", _0)]
    Content(CommonError),
    #[display(fmt = "password {}", _0)]
    Password(CommonError),
    #[display(fmt = "max_views {}", _0)]
    MaxViews(CommonError),
    #[display(fmt = "lifetime_in_ms {}", _0)]
    LifetimeInMs(CommonError),
}

#[derive(Debug, Display)]
pub enum ServerError {
    DieselError,
    R2D2Error,
    CryptoError,
    #[display(fmt = "invalid request")]
    UserError(Vec<Fields>),
    #[display(fmt = "note not found")]
    NotFound(Option<String>),
    PasswordRequired,
    InvalidPassword,
}

impl From<r2d2::Error> for ServerError {
    fn from(_: r2d2::Error) -> ServerError {
        ServerError::R2D2Error
    }
}

impl From<diesel::result::Error> for ServerError {
    fn from(_: diesel::result::Error) -> ServerError {
        ServerError::DieselError
    }
}

impl From<DecryptError> for ServerError {
    fn from(_: DecryptError) -> ServerError {
        ServerError::InvalidPassword
    }
}

impl actix_web::error::ResponseError for ServerError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServerError::DieselError => {
                HttpResponse::InternalServerError().json("Library Error: Diesel Error.")
            }
            ServerError::R2D2Error => {
                HttpResponse::InternalServerError().json("Server Error: Pooling Error.")
            }
            ServerError::CryptoError => {
                HttpResponse::InternalServerError().json("Server Error: Corrupted Note Record.")
            }
            ServerError::UserError(fields) => HttpResponse::BadRequest().json(json!({
                "errors": fields.iter().map(|f| f.to_string()).collect::<Vec<String>>(),
            })),
            // missing, destroyed, expired and view-exhausted notes all share
            // this response so a bad actor can never tell them apart
            ServerError::NotFound(note_id) => match note_id {
                Some(note_id) => HttpResponse::NotFound()
                    .json(format!("note id: {} was not found", note_id)),
                None => HttpResponse::NotFound().json("note was not found"),
            },
            ServerError::PasswordRequired => {
                HttpResponse::Unauthorized().json("a password is required to open this note")
            }
            ServerError::InvalidPassword => HttpResponse::Unauthorized().json("wrong password"),
        }
    }
}
