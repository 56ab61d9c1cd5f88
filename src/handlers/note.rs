use serde::Deserialize;

pub mod mutate;
pub mod post;
pub mod query;

#[derive(Debug, Deserialize)]
pub struct PasswordField {
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::json;

    use super::{mutate, post, query};
    use crate::repository::memory::MemoryNoteRepository;
    use crate::store::NoteStore;

    macro_rules! notes_app {
        () => {{
            let store = NoteStore::new(Arc::new(MemoryNoteRepository::default()));
            test::init_service(
                App::new().app_data(web::Data::new(store)).service(
                    web::scope("/notes")
                        .route("", web::post().to(post::new))
                        .route("/{id}", web::get().to(query::read))
                        .route("/{id}/status", web::get().to(query::status))
                        .route("/{id}", web::delete().to(mutate::destroy)),
                ),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn plaintext_note_burns_after_one_read() {
        let app = notes_app!();

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/notes")
                .set_json(json!({ "content": "hello" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(res).await;
        let note_id = body["id"].as_str().unwrap().to_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/notes/{}/status", note_id))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let status: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(status["views_left"], 1);
        assert_eq!(status["is_encrypted"], false);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/notes/{}", note_id))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let note: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(note["content"], "hello");
        assert_eq!(note["view_count"], 1);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/notes/{}", note_id))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn encrypted_note_guards_its_password() {
        let app = notes_app!();

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/notes")
                .set_json(json!({ "content": "secret", "password": "pw1", "max_views": 2 }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(res).await;
        let note_id = body["id"].as_str().unwrap().to_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/notes/{}", note_id))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/notes/{}?password=wrong", note_id))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/notes/{}?password=pw1", note_id))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let note: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(note["content"], "secret");
        assert_eq!(note["view_count"], 1);
        assert_eq!(note["is_encrypted"], true);
    }

    #[actix_web::test]
    async fn delete_then_delete_again_is_not_found() {
        let app = notes_app!();

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/notes")
                .set_json(json!({ "content": "condemned" }))
                .to_request(),
        )
        .await;
        let body: serde_json::Value = test::read_body_json(res).await;
        let note_id = body["id"].as_str().unwrap().to_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/notes/{}", note_id))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/notes/{}", note_id))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
