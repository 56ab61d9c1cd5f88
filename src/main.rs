use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

#[macro_use]
extern crate diesel;

mod crypto;
mod errors;
mod handlers;
mod models;
mod reaper;
mod repository;
mod schema;
mod store;

use repository::postgres::PgNoteRepository;
use store::NoteStore;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let port = std::env::var("PORT").expect("env PORT");
    let database_url = std::env::var("DATABASE_URL").expect("env DATABASE_URL");
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .expect("failed to create a pg pool");
    pool.get()
        .expect("failed to get a connection from the pool")
        .run_pending_migrations(MIGRATIONS)
        .expect("failed to run migrations");

    let store = NoteStore::new(Arc::new(PgNoteRepository::new(pool)));

    let interval = std::env::var("CLEANUP_INTERVAL")
        .unwrap_or(reaper::DEFAULT_INTERVAL_SECS.to_string())
        .parse::<u64>()
        .expect("CLEANUP_INTERVAL must be a positive integer");
    reaper::spawn(store.clone(), Duration::from_secs(interval));

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(120)
        .finish()
        .unwrap();

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(store.clone()))
            .route("/", web::get().to(handlers::index))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Governor::new(&governor_conf))
            .wrap(Logger::default())
            .service(
                web::scope("/notes")
                    .route("", web::post().to(handlers::note::post::new))
                    .route("/{id}", web::get().to(handlers::note::query::read))
                    .route("/{id}/status", web::get().to(handlers::note::query::status))
                    .route("/{id}", web::delete().to(handlers::note::mutate::destroy)),
            )
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}
