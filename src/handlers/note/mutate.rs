use actix_web::{web, HttpResponse};
use serde_json::json;

use super::PasswordField;
use crate::errors::ServerError;
use crate::store::NoteStore;

pub async fn destroy(
    note_id: web::Path<String>,
    query: web::Query<PasswordField>,
    store: web::Data<NoteStore>,
) -> Result<HttpResponse, ServerError> {
    store.destroy(&note_id, query.password.as_deref())?;
    Ok(HttpResponse::Ok().json(json!({
        "id": note_id.to_owned(),
        "destroyed": true,
    })))
}
