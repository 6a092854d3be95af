/// Media Service - HTTP Server
///
/// Stores uploaded images, enqueues resize jobs best-effort, and serves
/// thumbnails with the fallback-aware cache contract. Thumbnail generation
/// itself runs in the separate `thumb-worker` binary.
use actix_web::{middleware as actix_middleware, web, App, HttpResponse, HttpServer};
use media_service::handlers;
use media_service::queue::ResizeJobPublisher;
use media_service::Config;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration from environment
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load configuration");

    let bind_address = format!("{}:{}", config.app.host, config.app.port);

    // Initialize database connection pool
    let db_config = db_pool::DbConfig::new(
        "media-service",
        &config.database.url,
        config.database.max_connections,
    );
    db_config.log_config();
    let db_pool = db_pool::create_pool(db_config).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to connect to database: {e}"),
        )
    })?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Migrations failed: {e}")))?;

    let publisher = ResizeJobPublisher::new(config.rabbitmq.amqp_uri());

    tracing::info!(address = %bind_address, env = %config.app.env, "Media service starting");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(publisher.clone()))
            .wrap(actix_middleware::Logger::default())
            .route(
                "/api/v1/health",
                web::get()
                    .to(|| async { HttpResponse::Ok().json(serde_json::json!({"status": "ok"})) }),
            )
            .service(
                web::scope("/api/v1/images")
                    .route("", web::post().to(handlers::upload_image))
                    .route("/{image_id}", web::get().to(handlers::get_image))
                    .route("/{image_id}/thumbnail", web::get().to(handlers::get_thumbnail)),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
