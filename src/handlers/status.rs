// src/handlers/status.rs
use actix_web::{web, HttpRequest, HttpResponse};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{clock::DefaultClock, RateLimiter};
use log::warn;
use std::net::IpAddr;

use crate::status::feed::StatusFeed;
use crate::utils::{client_ip, RequestError};

/// GET /api/status — latest snapshot from the shared poller feed.
pub async fn get_status(
    feed: web::Data<StatusFeed>,
    rate_limiter: web::Data<RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>>,
    req: HttpRequest,
) -> Result<HttpResponse, RequestError> {
    let peer_ip = client_ip(&req)?;

    if !rate_limiter.check_key(&peer_ip).is_ok() {
        warn!("Rate limit exceeded for status for ip: {}", peer_ip);
        return Err(RequestError::RateLimitExceeded);
    }

    Ok(HttpResponse::Ok().json(feed.latest()))
}
