use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::errors::ServerError;
use crate::models::note::CreateNote;
use crate::store::NoteStore;

pub async fn new(
    input: web::Json<CreateNote>,
    store: web::Data<NoteStore>,
) -> Result<HttpResponse, ServerError> {
    let note_id = store.create(input.into_inner())?;
    Ok(HttpResponse::Created().json(json!({ "id": note_id })))
}
