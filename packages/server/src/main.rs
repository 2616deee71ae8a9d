#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the cafe map application.
//!
//! Serves the site-analysis REST API backed by the warehouse layer, the
//! scoring engine, and the AI explanation layer.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use cafe_map_warehouse::Warehouse;

/// Shared application state.
pub struct AppState {
    /// Warehouse data-access handle.
    pub warehouse: Arc<Warehouse>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let warehouse = Warehouse::from_env().expect("Failed to configure warehouse access");
    let state = web::Data::new(AppState {
        warehouse: Arc::new(warehouse),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/api/sites")
                    .route("", web::get().to(handlers::sites))
                    .route("/top", web::get().to(handlers::top_sites))
                    .route("/stations", web::get().to(handlers::stations))
                    .route("/shops", web::get().to(handlers::shops))
                    .route("/map-data", web::get().to(handlers::map_data))
                    .route("/meta/stations", web::get().to(handlers::station_list))
                    .route("/meta/stats", web::get().to(handlers::statistics))
                    .route("/calculate", web::post().to(handlers::calculate))
                    .route(
                        "/calculate/batch",
                        web::post().to(handlers::calculate_batch),
                    )
                    .route("/clear-cache", web::post().to(handlers::clear_cache))
                    .route(
                        "/test-connection",
                        web::get().to(handlers::test_connection),
                    )
                    .route("/station/{name}", web::get().to(handlers::station_detail)),
            )
            .service(
                web::scope("/api/ai")
                    .route("/explain", web::post().to(handlers::ai_explain))
                    .route("/compare", web::post().to(handlers::ai_compare)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
