//! WebAssembly bindings for the Younger Dryas engine.
//!
//! A browser front end owns the canvas and mouse; it asks this wrapper which
//! hex sits under the cursor, what colour to paint it and whether a claim or
//! build is allowed, then re-reads the JSON snapshot after every mutation.

use wasm_bindgen::prelude::*;

use crate::actions::GameAction;
use crate::board::Improvement;
use crate::config::GameConfig;
use crate::game::GameState;
use crate::hex::HexCoord;
use crate::world::World;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
    world: World,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a game from a JSON config; an empty string uses the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmGame, JsValue> {
        let config = if config_json.trim().is_empty() {
            GameConfig::default()
        } else {
            GameConfig::from_json_str(config_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };

        let state = GameState::with_rules(config.rules)
            .map_err(|e| JsValue::from_str(&format!("Invalid rules: {}", e)))?;

        Ok(WasmGame {
            state,
            world: World::generate(&config.world),
        })
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.state.to_json()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the current player ID
    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> u8 {
        self.state.current_player
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Winner ID, or undefined while playing or after a tie
    #[wasm_bindgen(js_name = getWinner)]
    pub fn get_winner(&self) -> Option<u8> {
        self.state.winner()
    }

    // ==================== Geometry ====================

    /// Hex under a world-space pixel as `[col, row]`
    #[wasm_bindgen(js_name = pixelToHex)]
    pub fn pixel_to_hex(&self, px: f64, py: f64) -> Vec<i32> {
        let coord = self.world.hex_at(px, py);
        vec![coord.col, coord.row]
    }

    /// Centre of a hex as `[x, y]`
    #[wasm_bindgen(js_name = hexToPixel)]
    pub fn hex_to_pixel(&self, col: i32, row: i32) -> Vec<f64> {
        let (x, y) = self.world.grid().hex_to_pixel(HexCoord::new(col, row));
        vec![x, y]
    }

    /// Corner points of a hex as a flat `[x0, y0, x1, y1, ...]` array
    #[wasm_bindgen(js_name = hexCorners)]
    pub fn hex_corners(&self, col: i32, row: i32) -> Vec<f64> {
        self.world
            .grid()
            .corners(HexCoord::new(col, row))
            .iter()
            .flat_map(|&(x, y)| [x, y])
            .collect()
    }

    /// Terrain fill colour as a `#rrggbb` string
    #[wasm_bindgen(js_name = colorAt)]
    pub fn color_at(&self, col: i32, row: i32) -> String {
        self.world.color_at(HexCoord::new(col, row)).css()
    }

    /// Biome name for a hex, or undefined on an empty world
    #[wasm_bindgen(js_name = terrainAt)]
    pub fn terrain_at(&self, col: i32, row: i32) -> Option<String> {
        self.world
            .terrain_at(HexCoord::new(col, row))
            .map(|t| t.name().to_string())
    }

    // ==================== Rules ====================

    #[wasm_bindgen(js_name = canClaim)]
    pub fn can_claim(&self, col: i32, row: i32) -> bool {
        self.state.can_claim(HexCoord::new(col, row))
    }

    #[wasm_bindgen(js_name = claimHex)]
    pub fn claim_hex(&mut self, col: i32, row: i32) -> bool {
        self.state.claim_hex(HexCoord::new(col, row))
    }

    #[wasm_bindgen(js_name = canBuild)]
    pub fn can_build(&self, col: i32, row: i32, kind: &str) -> Result<bool, JsValue> {
        let improvement = parse_improvement(kind)?;
        Ok(self.state.can_build(HexCoord::new(col, row), improvement))
    }

    #[wasm_bindgen(js_name = buildImprovement)]
    pub fn build_improvement(&mut self, col: i32, row: i32, kind: &str) -> Result<bool, JsValue> {
        let improvement = parse_improvement(kind)?;
        Ok(self.state.build_improvement(HexCoord::new(col, row), improvement))
    }

    #[wasm_bindgen(js_name = endTurn)]
    pub fn end_turn(&mut self) {
        self.state.end_turn();
    }

    /// Apply an action given as JSON
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, action_json: &str) -> Result<bool, JsValue> {
        let action: GameAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid action: {}", e)))?;
        Ok(self.state.apply_action(action))
    }

    /// Get valid actions for the selected hex as JSON array
    #[wasm_bindgen(js_name = getValidActions)]
    pub fn get_valid_actions(&self, col: i32, row: i32) -> String {
        let actions = self.state.valid_actions(HexCoord::new(col, row));
        serde_json::to_string(&actions).unwrap_or_else(|_| "[]".to_string())
    }

    /// Current score for a player
    pub fn points(&self, player: u8) -> u32 {
        self.state.calculate_points(player)
    }

    /// The last `count` log lines as a JSON array
    #[wasm_bindgen(js_name = recentLogs)]
    pub fn recent_logs(&self, count: usize) -> String {
        serde_json::to_string(&self.state.recent_logs(count)).unwrap_or_else(|_| "[]".to_string())
    }
}

fn parse_improvement(kind: &str) -> Result<Improvement, JsValue> {
    kind.parse::<Improvement>()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
