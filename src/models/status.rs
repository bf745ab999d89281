// src/models/status.rs
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Latest known state of the game server, refreshed by the status poller.
/// Superseded wholesale by the next poll cycle; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatusSnapshot {
    pub player_count: u32,
    pub max_players: u32,
    pub is_online: bool,
    pub as_of: u64,
}

impl ServerStatusSnapshot {
    /// State before the first poll has resolved.
    pub fn unknown(max_players: u32) -> Self {
        Self {
            player_count: 0,
            max_players,
            is_online: false,
            as_of: unix_now(),
        }
    }
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Wire shape of the directory API response. Anything that does not carry
/// a `Data.players` array is treated as malformed.
#[derive(Debug, Deserialize)]
pub struct DirectoryResponse {
    #[serde(rename = "Data")]
    pub data: Option<DirectoryData>,
}

#[derive(Debug, Deserialize)]
pub struct DirectoryData {
    #[serde(default)]
    pub players: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub sv_maxclients: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directory_response() {
        let raw = r#"{"Data":{"players":[{"name":"a"},{"name":"b"}],"sv_maxclients":64}}"#;
        let parsed: DirectoryResponse = serde_json::from_str(raw).unwrap();
        let data = parsed.data.unwrap();
        assert_eq!(data.players.unwrap().len(), 2);
        assert_eq!(data.sv_maxclients, Some(64));
    }

    #[test]
    fn missing_players_deserializes_to_none() {
        let raw = r#"{"Data":{}}"#;
        let parsed: DirectoryResponse = serde_json::from_str(raw).unwrap();
        let data = parsed.data.unwrap();
        assert!(data.players.is_none());
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let snapshot = ServerStatusSnapshot {
            player_count: 12,
            max_players: 64,
            is_online: true,
            as_of: 1700000000,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["playerCount"], 12);
        assert_eq!(json["maxPlayers"], 64);
        assert_eq!(json["isOnline"], true);
        assert_eq!(json["asOf"], 1700000000u64);
    }
}
