//! A scripted play session: one world, one game, commands applied in order.

use crate::command::Command;
use dryas_core::{GameConfig, GamePhase, GameState, HexCoord, Improvement, PlayerId, World};
use tracing::{info, warn};

/// Drives a game the way a presentation layer would
pub struct Session {
    world: World,
    game: GameState,
}

impl Session {
    /// Create a session from a validated config
    pub fn new(config: &GameConfig) -> anyhow::Result<Self> {
        let game = GameState::with_rules(config.rules.clone())?;
        let world = World::generate(&config.world);

        info!(
            players = game.player_count(),
            width = config.world.width,
            height = config.world.height,
            seed = ?config.world.noise.seed,
            "Session started"
        );

        Ok(Self { world, game })
    }

    #[cfg(test)]
    pub fn from_parts(world: World, game: GameState) -> Self {
        Self { world, game }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    #[cfg(test)]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Run every line of a script, returning the output lines.
    ///
    /// Malformed lines are reported in the output and skipped.
    pub fn run_script(&mut self, script: &str) -> Vec<String> {
        let mut output = Vec::new();

        for (idx, line) in script.lines().enumerate() {
            let line_no = idx + 1;
            match Command::parse_line(line) {
                Ok(Some(command)) => output.extend(self.execute(command)),
                Ok(None) => {}
                Err(e) => {
                    warn!(line = line_no, "Skipping script line: {}", e);
                    output.push(format!("line {line_no}: {e}"));
                }
            }
        }

        output
    }

    /// Apply one command, returning the lines to show
    pub fn execute(&mut self, command: Command) -> Vec<String> {
        info!(?command, player = self.game.current_player, "Applying command");

        match command {
            Command::Claim(coord) => self.claim(coord),
            Command::Build(coord, improvement) => self.build(coord, improvement),
            Command::Click { x, y } => self.click(x, y),
            Command::End => self.with_new_log_lines(|game| game.end_turn()),
            Command::Status => self.status(),
            Command::Log(count) => self.game.recent_logs(count),
            Command::Terrain(coord) => vec![self.describe_terrain(coord)],
        }
    }

    fn claim(&mut self, coord: HexCoord) -> Vec<String> {
        if let Err(reason) = self.game.check_claim(coord) {
            warn!(%coord, %reason, "Claim rejected");
        }
        self.with_new_log_lines(|game| {
            game.claim_hex(coord);
        })
    }

    fn build(&mut self, coord: HexCoord, improvement: Improvement) -> Vec<String> {
        if let Err(reason) = self.game.check_build(coord, improvement) {
            warn!(%coord, %improvement, %reason, "Build rejected");
        }
        self.with_new_log_lines(|game| {
            game.build_improvement(coord, improvement);
        })
    }

    fn click(&mut self, x: f64, y: f64) -> Vec<String> {
        let coord = self.world.hex_at(x, y);
        info!(x, y, %coord, "Click resolved");

        match self.game.hex(coord).owner {
            Some(owner) => vec![format!(
                "Hex {coord} is owned by Player {}",
                u32::from(owner) + 1
            )],
            None => self.claim(coord),
        }
    }

    /// Run a mutation and return the log lines it produced
    fn with_new_log_lines(&mut self, mutate: impl FnOnce(&mut GameState)) -> Vec<String> {
        let before = self.game.log().total_recorded();
        mutate(&mut self.game);
        let added = self.game.log().total_recorded() - before;
        if added == 0 {
            return Vec::new();
        }
        self.game.recent_logs(added)
    }

    fn status(&self) -> Vec<String> {
        let mut lines = Vec::new();

        match self.game.phase {
            GamePhase::Active => lines.push(format!(
                "Turn {} - Player {} to play ({} claim(s) left)",
                self.game.turn_number,
                self.game.active_player().number(),
                self.game.claims_remaining()
            )),
            GamePhase::GameOver { winner: Some(id) } => {
                lines.push(format!("Game over - Player {} won", u32::from(id) + 1))
            }
            GamePhase::GameOver { winner: None } => {
                lines.push("Game over - tie".to_string())
            }
        }

        for player in &self.game.players {
            lines.push(format!(
                "Player {} ({}): {} points, {} hexes, resources: {}",
                player.number(),
                player.color.css(),
                self.game.calculate_points(player.id),
                player.owned_hexes.len(),
                player.resources
            ));
        }

        lines
    }

    fn describe_terrain(&self, coord: HexCoord) -> String {
        let record = self.game.hex(coord);
        let owner = record
            .owner
            .map(|id: PlayerId| format!("Player {}", u32::from(id) + 1))
            .unwrap_or_else(|| "unowned".to_string());
        let improvement = record
            .improvement
            .map(|i| i.to_string())
            .unwrap_or_else(|| "no improvement".to_string());

        match self.world.terrain_at(coord) {
            Some(terrain) => format!(
                "Hex {coord}: {} {} - {owner}, {improvement}",
                terrain.name(),
                self.world.color_at(coord).css()
            ),
            None => format!("Hex {coord}: no terrain - {owner}, {improvement}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dryas_core::{HexGrid, RulesConfig, Terrain};
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        let terrain = Terrain::from_values(2, 2, vec![0.1, 0.3, 0.5, 0.9]).unwrap();
        let world = World::from_parts(HexGrid::new(40.0), terrain);
        let game = GameState::with_rules(RulesConfig {
            points_to_win: 100,
            ..RulesConfig::default()
        })
        .unwrap();
        Session::from_parts(world, game)
    }

    #[test]
    fn test_claim_and_build_print_log_lines() {
        let mut s = session();
        let out = s.run_script("claim 0 0\nbuild 0 0 farm\nclaim 1 0\n");

        assert_eq!(
            out,
            vec![
                "Turn 1 - Player 1: Claimed hex at (0, 0)",
                "Turn 1 - Player 1: Built farm at (0, 0)",
                "Turn 1 - Player 1: Failed to claim hex at (1, 0) - no claims remaining this turn",
            ]
        );
    }

    #[test]
    fn test_malformed_lines_are_reported_and_skipped() {
        let mut s = session();
        let out = s.run_script("# opening\nfly 1 2\nclaim 2\nclaim 2 2\n");

        assert_eq!(out.len(), 3);
        assert_eq!(out[0], "line 2: Unknown command 'fly'");
        assert_eq!(out[1], "line 3: 'claim' expects COL ROW");
        assert_eq!(out[2], "Turn 1 - Player 1: Claimed hex at (2, 2)");
    }

    #[test]
    fn test_click_claims_hex_under_pixel() {
        let mut s = session();
        let (x, y) = s.world().grid().hex_to_pixel(HexCoord::new(3, 1));

        let out = s.execute(Command::Click { x, y });
        assert_eq!(out, vec!["Turn 1 - Player 1: Claimed hex at (3, 1)"]);

        s.execute(Command::End);
        let out = s.execute(Command::Click { x, y });
        assert_eq!(out, vec!["Hex (3, 1) is owned by Player 1"]);
        assert_eq!(s.game().hex(HexCoord::new(3, 1)).owner, Some(0));
    }

    #[test]
    fn test_end_prints_game_over() {
        let terrain = Terrain::from_values(1, 1, vec![0.5]).unwrap();
        let world = World::from_parts(HexGrid::default(), terrain);
        let mut s = Session::from_parts(world, GameState::new());

        s.run_script("claim 0 0\nbuild 0 0 settlement\nend\n");
        let out = s.execute(Command::End);
        assert_eq!(
            out,
            vec![
                "Turn 1 - Player 2: Ended turn, gained resources: none",
                "Turn 2 - Player 1: Game Over! Player 1 wins with 6 points!",
            ]
        );
        assert!(s.execute(Command::End).is_empty());
    }

    #[test]
    fn test_status_and_terrain() {
        let mut s = session();
        s.run_script("claim 1 0\n");

        let status = s.execute(Command::Status);
        assert_eq!(status[0], "Turn 1 - Player 1 to play (0 claim(s) left)");
        assert_eq!(
            status[1],
            "Player 1 (#c80000): 1 points, 1 hexes, resources: 10 food, 10 wood, 10 stone"
        );

        assert_eq!(
            s.execute(Command::Terrain(HexCoord::new(3, 0))),
            vec!["Hex (3, 0): Plains #228b22 - unowned, no improvement"]
        );
        assert_eq!(
            s.execute(Command::Terrain(HexCoord::new(1, 0))),
            vec!["Hex (1, 0): Plains #228b22 - Player 1, no improvement"]
        );
    }
}
