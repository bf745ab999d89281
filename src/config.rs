// src/config.rs
use governor::Quota;
use serde::{Deserialize, Serialize};
use std::env;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::status::poller::{PollerConfig, PLACEHOLDER_SERVER_CODE};

/// Operational knobs, read from the environment with defaults.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    pub site_config_path: String,
    pub public_dir: String,

    // Rate limiting for the JSON endpoints
    pub api_period_secs: u64,
    pub api_burst_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            site_config_path: "site.config.json".to_string(),
            public_dir: "public".to_string(),
            api_period_secs: 1,
            api_burst_limit: 20,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            site_config_path: env::var("SITE_CONFIG_PATH")
                .unwrap_or_else(|_| "site.config.json".to_string()),

            public_dir: env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".to_string()),

            api_period_secs: env::var("API_PERIOD_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),

            api_burst_limit: env::var("API_BURST_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
        }
    }

    pub fn api_quota(&self) -> Quota {
        Quota::with_period(Duration::from_secs(self.api_period_secs.max(1)))
            .unwrap()
            .allow_burst(NonZeroU32::new(self.api_burst_limit.max(1)).unwrap())
    }
}

/// The static JSON configuration driving the whole site: identity, live
/// status API settings, and every content section the frontend renders.
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    pub server: ServerIdentity,
    pub api: ApiSettings,
    pub social: SocialLinks,
    pub features: Vec<Feature>,
    pub jobs: JobBoard,
    pub rules: Vec<Rule>,
    pub team: Vec<TeamMember>,
    pub gallery: Gallery,
    pub legal: LegalInfo,
}

impl SiteConfig {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path, e))?;
        serde_json::from_str(&raw).map_err(|e| format!("failed to parse {}: {}", path, e))
    }

    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            endpoint_base_url: self.api.cfx_api_url.clone(),
            server_code: self.api.server_code.clone(),
            refresh_interval: Duration::from_millis(self.api.refresh_interval.max(1)),
            default_max_players: self.server.max_players,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerIdentity {
    pub name: String,
    pub short_name: String,
    pub tagline: String,
    pub slogan: String,
    pub description: String,
    pub ip: String,
    pub max_players: u32,
    pub stats: ServerStats,
}

impl Default for ServerIdentity {
    fn default() -> Self {
        Self {
            name: "NightCity RP".to_string(),
            short_name: "NCRP".to_string(),
            tagline: "Where Stories Come Alive".to_string(),
            slogan: String::new(),
            description: "Experience the most immersive GTA V roleplay server".to_string(),
            ip: "localhost".to_string(),
            max_players: 64,
            stats: ServerStats::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerStats {
    pub total_players: u32,
    pub active_gangs: u32,
    pub businesses: u32,
    pub established: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Base URL of the server directory; the server code is appended.
    pub cfx_api_url: String,
    pub server_code: String,
    /// Poll interval in milliseconds.
    pub refresh_interval: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            cfx_api_url: "https://servers-frontend.fivem.net/api/servers/single/".to_string(),
            server_code: PLACEHOLDER_SERVER_CODE.to_string(),
            refresh_interval: 30_000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinks {
    pub discord: String,
    pub twitter: String,
    pub youtube: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Feature {
    pub title: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobBoard {
    pub categories: Vec<JobCategory>,
    pub list: Vec<Job>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobCategory {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub salary: String,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rule {
    pub id: String,
    pub category: String,
    pub category_number: u32,
    pub title: String,
    pub description: String,
    pub severity: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub description: String,
    pub discord: String,
    pub avatar: String,
    pub badge: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Gallery {
    pub categories: Vec<String>,
    pub images: Vec<GalleryImage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryImage {
    pub id: String,
    pub src: String,
    pub alt: String,
    pub title: String,
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegalInfo {
    pub last_updated: String,
    pub min_age: u32,
    pub privacy_email: String,
    pub dpo_email: String,
    pub copyright_year: u32,
    pub data_retention: DataRetention,
}

impl Default for LegalInfo {
    fn default() -> Self {
        Self {
            last_updated: String::new(),
            min_age: 18,
            privacy_email: String::new(),
            dpo_email: String::new(),
            copyright_year: 2025,
            data_retention: DataRetention::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataRetention {
    pub character_data: String,
    pub chat_logs: String,
    pub connection_logs: String,
    pub ban_records: String,
    pub whitelist_applications: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_site_config_gets_defaults() {
        let raw = r#"{
            "server": { "name": "Test RP", "maxPlayers": 128 },
            "api": { "serverCode": "abc123", "refreshInterval": 5000 }
        }"#;
        let config: SiteConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.server.name, "Test RP");
        assert_eq!(config.server.max_players, 128);
        assert_eq!(config.api.server_code, "abc123");
        assert!(config.api.cfx_api_url.starts_with("https://"));
        assert!(config.features.is_empty());
        assert_eq!(config.legal.min_age, 18);
    }

    #[test]
    fn empty_object_is_a_valid_config() {
        let config: SiteConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.api.server_code, PLACEHOLDER_SERVER_CODE);
        assert_eq!(config.api.refresh_interval, 30_000);
    }

    #[test]
    fn poller_config_mirrors_api_settings() {
        let mut config = SiteConfig::default();
        config.api.server_code = "xyz789".to_string();
        config.api.refresh_interval = 10_000;
        config.server.max_players = 200;

        let poller = config.poller_config();
        assert_eq!(poller.server_code, "xyz789");
        assert_eq!(poller.refresh_interval, Duration::from_millis(10_000));
        assert_eq!(poller.default_max_players, 200);
        assert_eq!(poller.endpoint_base_url, config.api.cfx_api_url);
    }

    #[test]
    fn zero_refresh_interval_is_clamped() {
        let mut config = SiteConfig::default();
        config.api.refresh_interval = 0;
        assert_eq!(config.poller_config().refresh_interval, Duration::from_millis(1));
    }

    #[test]
    fn rule_fields_use_camel_case() {
        let raw = r#"{
            "id": "r1",
            "category": "General",
            "categoryNumber": 1,
            "title": "No RDM",
            "description": "Random deathmatch is not allowed.",
            "severity": "high"
        }"#;
        let rule: Rule = serde_json::from_str(raw).unwrap();
        assert_eq!(rule.category_number, 1);
        assert_eq!(rule.severity, "high");
    }

    // The only test touching process env; keeping every env mutation in one
    // test avoids cross-test races without a serialization harness.
    #[test]
    fn env_vars_override_defaults() {
        std::env::set_var("BIND_ADDRESS", "127.0.0.1");
        std::env::set_var("PORT", "9090");
        std::env::set_var("API_BURST_LIMIT", "5");

        let config = AppConfig::from_env();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.api_burst_limit, 5);
        // Untouched knobs keep their defaults.
        assert_eq!(config.site_config_path, "site.config.json");
        assert_eq!(config.api_period_secs, 1);

        // An unparseable value lands on the default.
        std::env::set_var("PORT", "not-a-number");
        assert_eq!(AppConfig::from_env().port, 8080);

        std::env::remove_var("BIND_ADDRESS");
        std::env::remove_var("PORT");
        std::env::remove_var("API_BURST_LIMIT");
    }

    #[test]
    fn api_quota_tolerates_zero_limits() {
        let config = AppConfig {
            api_period_secs: 0,
            api_burst_limit: 0,
            ..AppConfig::default()
        };
        // Must not panic; clamped to the minimum viable quota.
        let _ = config.api_quota();
    }
}
