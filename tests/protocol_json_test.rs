//! Observation JSON decodes into a presentation-side model

use serde::Deserialize;

use color_match::core::GameState;
use color_match::session::protocol::build_observation;
use color_match::types::{TileColor, PALETTE};

#[derive(Debug, Deserialize)]
struct Tile {
    id: u32,
    color: String,
    matched: bool,
    revealed: bool,
}

#[derive(Debug, Deserialize)]
struct Observation {
    #[serde(rename = "type")]
    msg_type: String,
    generation: u32,
    phase: String,
    attempts: u32,
    matches: u32,
    selection: Vec<u8>,
    tiles: Vec<Tile>,
}

#[test]
fn observation_decodes_and_carries_the_board() {
    let mut gs = GameState::new(8);
    gs.start();
    let partner = gs.board().partner_of(0).unwrap();
    gs.select(0);
    gs.select(partner);

    let line = serde_json::to_string(&build_observation(1, &gs.snapshot())).unwrap();
    let obs: Observation = serde_json::from_str(&line).unwrap();

    assert_eq!(obs.msg_type, "observation");
    assert_eq!(obs.generation, 1);
    assert_eq!(obs.phase, "resolving");
    assert_eq!(obs.attempts, 1);
    assert_eq!(obs.matches, 1);
    assert_eq!(obs.selection, vec![0, partner as u8]);
    assert_eq!(obs.tiles.len(), 16);
    assert!(obs.tiles[0].matched && obs.tiles[0].revealed);
    assert!(obs.tiles[partner].matched);

    for color in PALETTE {
        let n = obs.tiles.iter().filter(|t| t.color == color.as_str()).count();
        assert_eq!(n, 2);
    }
    assert!(obs
        .tiles
        .iter()
        .all(|t| TileColor::from_str(&t.color).is_some()));

    let ids: Vec<u32> = obs.tiles.iter().map(|t| t.id).collect();
    assert_eq!(ids, (0..16).collect::<Vec<_>>());
}
