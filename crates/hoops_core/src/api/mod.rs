pub mod json_api;

pub use json_api::{
    game_response_schema, simulate_game_json, GameRequest, GameResponse, TeamData,
};
