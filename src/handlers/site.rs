// src/handlers/site.rs
use actix_web::{web, HttpRequest, HttpResponse};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{clock::DefaultClock, RateLimiter};
use log::warn;
use serde::Serialize;
use std::net::IpAddr;

use crate::config::{
    Feature, Gallery, JobBoard, LegalInfo, Rule, ServerIdentity, SiteConfig, SocialLinks,
    TeamMember,
};
use crate::utils::{client_ip, RequestError};

/// Everything the frontend renders, minus the API settings. The server
/// code and directory URL stay server-side with the poller.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteContent<'a> {
    server: &'a ServerIdentity,
    social: &'a SocialLinks,
    features: &'a [Feature],
    jobs: &'a JobBoard,
    rules: &'a [Rule],
    team: &'a [TeamMember],
    gallery: &'a Gallery,
    legal: &'a LegalInfo,
}

/// GET /api/site — the static content sections of the site.
pub async fn get_site(
    site: web::Data<SiteConfig>,
    rate_limiter: web::Data<RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>>,
    req: HttpRequest,
) -> Result<HttpResponse, RequestError> {
    let peer_ip = client_ip(&req)?;

    if !rate_limiter.check_key(&peer_ip).is_ok() {
        warn!("Rate limit exceeded for site content for ip: {}", peer_ip);
        return Err(RequestError::RateLimitExceeded);
    }

    Ok(HttpResponse::Ok().json(SiteContent {
        server: &site.server,
        social: &site.social,
        features: &site.features,
        jobs: &site.jobs,
        rules: &site.rules,
        team: &site.team,
        gallery: &site.gallery,
        legal: &site.legal,
    }))
}
