use std::io;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpResponse, HttpServer, cookie::Key, middleware, web};
use sqlx::PgPool;

use backoffice::config::{AppConfig, SESSION_KEY_MIN_LEN};
use backoffice::{db, handlers};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().map_err(io::Error::other)?;

    let pool = db::init_pool(&config).await.map_err(io::Error::other)?;
    db::run_migrations(&pool).await.map_err(io::Error::other)?;
    db::seed(&pool, &config).await.map_err(io::Error::other)?;

    // Session encryption key; a generated one loses sessions on restart
    let secret_key = match (config.usable_session_key(), &config.session_key) {
        (Some(bytes), _) => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(bytes)
        }
        (None, Some(short)) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need {SESSION_KEY_MIN_LEN}+), generating random key",
                short.len()
            );
            Key::generate()
        }
        (None, None) => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let bind_addr = config.bind_addr;
    log::info!("Starting {} at http://{bind_addr}", config.app_name);

    let config = web::Data::new(config);
    let pool = web::Data::new(pool);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
            .cookie_secure(false)
            .cookie_http_only(true)
            .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(config.clone())
            .app_data(pool.clone())
            .service(actix_files::Files::new("/static", "./static"))
            .route(
                "/",
                web::get().to(|| async {
                    HttpResponse::SeeOther()
                        .insert_header(("Location", "/admin/users"))
                        .finish()
                }),
            )
            .configure(handlers::configure::<PgPool>)
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(include_str!("../templates/errors/404.html"))
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
