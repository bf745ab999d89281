// src/main.rs
mod config;
mod handlers;
mod models;
mod status;
mod utils;

use actix_files::Files;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{clock::DefaultClock, RateLimiter};
use log::{info, warn};
use std::net::IpAddr;

use crate::config::{AppConfig, SiteConfig};
use crate::status::feed::StatusFeed;
use crate::status::poller::PLACEHOLDER_SERVER_CODE;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger only once at the start
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    dotenv::dotenv().ok();
    let app_config = AppConfig::from_env();

    let site_config = SiteConfig::from_file(&app_config.site_config_path)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    if site_config.api.server_code == PLACEHOLDER_SERVER_CODE {
        warn!("No server code configured; live status will show offline fallbacks");
    }

    // One poller for the whole process; every endpoint reads from its feed.
    let feed = web::Data::new(StatusFeed::start(site_config.poller_config()));
    let site = web::Data::new(site_config);

    let api_rate_limiter: web::Data<
        RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>,
    > = web::Data::new(RateLimiter::keyed(app_config.api_quota()));

    let bind = format!("{}:{}", app_config.bind_address, app_config.port);
    let public_dir = app_config.public_dir.clone();

    info!("Starting site backend on {}", bind);
    HttpServer::new(move || {
        App::new()
            .app_data(feed.clone())
            .app_data(site.clone())
            .app_data(api_rate_limiter.clone())
            .route("/api/status", web::get().to(handlers::status::get_status))
            .route("/api/site", web::get().to(handlers::site::get_site))
            .service(Files::new("/", public_dir.clone()).index_file("index.html"))
    })
    .bind(&bind)?
    .run()
    .await
}
