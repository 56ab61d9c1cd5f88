use actix_web::{web, HttpResponse};
use serde_json::json;

use super::PasswordField;
use crate::errors::ServerError;
use crate::store::NoteStore;

/// The consuming read. Counts as a view only when it succeeds.
pub async fn read(
    note_id: web::Path<String>,
    query: web::Query<PasswordField>,
    store: web::Data<NoteStore>,
) -> Result<HttpResponse, ServerError> {
    let note = store.read(&note_id, query.password.as_deref())?;
    Ok(HttpResponse::Ok().json(json!(note)))
}

pub async fn status(
    note_id: web::Path<String>,
    store: web::Data<NoteStore>,
) -> Result<HttpResponse, ServerError> {
    let status = store.status(&note_id)?;
    Ok(HttpResponse::Ok().json(json!(status)))
}
