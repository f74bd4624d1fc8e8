//! JSON API
//!
//! String in, string out, for hosts that only speak JSON. Errors are
//! flattened to a message so they cross an FFI boundary unchanged.

use crate::engine::config::{EngineConfig, DEFAULT_CONFIG};
use crate::engine::game_sim::{GameEngine, GamePlan};
use crate::models::{GameResult, Player, Team};
use crate::tactics::TacticalSettings;
use crate::SCHEMA_VERSION;
use anyhow::{bail, Context};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Team as sent by a host. Balanced tactics are generated when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamData {
    pub name: String,
    pub players: Vec<Player>,
    #[serde(default)]
    pub tactics: Option<TacticalSettings>,
}

impl TeamData {
    pub fn into_team(self) -> Team {
        match self.tactics {
            Some(tactics) => Team::new(self.name, self.players, tactics),
            None => Team::with_balanced_tactics(self.name, self.players),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRequest {
    pub schema_version: u8,
    pub seed: u64,
    pub home_team: TeamData,
    pub away_team: TeamData,
    /// Engine tuning; realistic defaults when absent
    #[serde(default)]
    pub config: Option<EngineConfig>,
    /// Attach every possession result to the response
    #[serde(default)]
    pub include_possessions: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GameResponse {
    pub schema_version: u8,
    #[serde(flatten)]
    pub game: GameResult,
}

/// JSON Schema of [`GameResponse`].
pub fn game_response_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(GameResponse)
}

fn run_request(request_json: &str) -> anyhow::Result<String> {
    let request: GameRequest =
        serde_json::from_str(request_json).context("Invalid JSON request")?;
    if request.schema_version != SCHEMA_VERSION {
        warn!("Rejected request with schema version {}", request.schema_version);
        bail!("Unsupported schema version: {}", request.schema_version);
    }

    let GameRequest { seed, home_team, away_team, config, include_possessions, .. } = request;
    info!("Simulating {} vs {} (seed {})", home_team.name, away_team.name, seed);

    let plan = GamePlan::new(home_team.into_team(), away_team.into_team(), seed)
        .with_config(config.unwrap_or_else(|| DEFAULT_CONFIG.clone()))
        .with_possessions(include_possessions);
    let game = GameEngine::new(plan)
        .context("Game setup failed")?
        .simulate()
        .context("Simulation failed")?;

    info!(
        "Game complete: {} {} - {} {}",
        game.home_team, game.final_score.home, game.final_score.away, game.away_team
    );
    let response = GameResponse { schema_version: SCHEMA_VERSION, game };
    serde_json::to_string(&response).context("Failed to serialize response")
}

/// Simulate a game from a JSON [`GameRequest`] and return a JSON
/// [`GameResponse`].
pub fn simulate_game_json(request_json: &str) -> Result<String, String> {
    run_request(request_json).map_err(|e| {
        error!("Game request failed: {:#}", e);
        format!("{:#}", e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roster(prefix: &str) -> serde_json::Value {
        let positions = ["PG", "SG", "SF", "PF", "C"];
        let players: Vec<_> = (0..10)
            .map(|i| {
                json!({
                    "name": format!("{}{}", prefix, i),
                    "position": positions[i % 5],
                    "attributes": { "form_technique": 60.0, "height": 55.0 }
                })
            })
            .collect();
        json!(players)
    }

    fn request(seed: u64) -> serde_json::Value {
        json!({
            "schema_version": 1,
            "seed": seed,
            "home_team": { "name": "Home", "players": roster("H") },
            "away_team": { "name": "Away", "players": roster("A") }
        })
    }

    #[test]
    fn test_basic_game() {
        let out = simulate_game_json(&request(42).to_string()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["schema_version"], 1);
        assert!(parsed["final_score"]["home"].is_number());
        assert_eq!(parsed["determinism"]["seed"], 42);
        assert!(parsed.get("possessions").is_none());
    }

    #[test]
    fn test_determinism() {
        let req = request(999).to_string();
        assert_eq!(simulate_game_json(&req).unwrap(), simulate_game_json(&req).unwrap());
    }

    #[test]
    fn test_response_matches_schema() {
        let mut req = request(7);
        req["include_possessions"] = json!(true);
        let out = simulate_game_json(&req.to_string()).unwrap();
        let instance: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(instance["possessions"].as_array().is_some_and(|p| !p.is_empty()));

        let schema = serde_json::to_value(game_response_schema()).unwrap();
        let compiled = jsonschema::JSONSchema::compile(&schema).unwrap();
        assert!(compiled.is_valid(&instance));
    }

    #[test]
    fn test_rejects_unknown_schema_version() {
        let mut req = request(1);
        req["schema_version"] = json!(2);
        let err = simulate_game_json(&req.to_string()).unwrap_err();
        assert!(err.contains("Unsupported schema version: 2"));
    }

    #[test]
    fn test_rejects_bad_minutes() {
        let mut req = request(1);
        let mut minutes = serde_json::Map::new();
        for i in 0..10 {
            minutes.insert(format!("H{}", i), json!(if i == 0 { 25 } else { 24 }));
        }
        req["home_team"]["tactics"] = json!({ "minutes_allotment": minutes });
        let err = simulate_game_json(&req.to_string()).unwrap_err();
        assert!(err.contains("Game setup failed"));
        assert!(err.contains("sums to 241"));
    }

    #[test]
    fn test_oversized_minutes_return_error() {
        let mut req = request(1);
        let mut minutes = serde_json::Map::new();
        minutes.insert("H0".into(), json!(u32::MAX));
        for i in 1..10 {
            minutes.insert(format!("H{}", i), json!(241));
        }
        req["home_team"]["tactics"] = json!({ "minutes_allotment": minutes });
        let err = simulate_game_json(&req.to_string()).unwrap_err();
        assert!(err.contains("Game setup failed"));
        assert!(err.contains(&format!("sums to {}", u32::MAX)));
    }

    #[test]
    fn test_config_override() {
        let mut req = request(3);
        req["config"] = json!({ "clock": { "max_overtime_periods": 0 } });
        let out = simulate_game_json(&req.to_string()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["overtime_periods"], 0);
    }

    #[test]
    fn test_malformed_json() {
        let err = simulate_game_json("{ not json").unwrap_err();
        assert!(err.starts_with("Invalid JSON request"));
    }
}
