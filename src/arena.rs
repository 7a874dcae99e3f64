use crate::bot::Bot;
use crate::piece::{PieceType, TeamType};
use crate::position::{BOARD_SIZE, Position};
use crate::referee::Referee;
use crate::state::{GameError, GameState, GameStatus};
use std::time::{Duration, Instant};

pub struct MatchConfig {
    pub time_per_move: Duration,
    pub max_moves: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            time_per_move: Duration::from_secs(5),
            max_moves: 300,
        }
    }
}

#[derive(Debug)]
pub enum MatchResult {
    Winner {
        winner_name: String,
        team: TeamType,
        moves: usize,
    },
    Draw {
        moves: usize,
    },
}

impl MatchResult {
    pub fn winner(&self) -> Option<&str> {
        match self {
            MatchResult::Winner { winner_name, .. } => Some(winner_name),
            MatchResult::Draw { .. } => None,
        }
    }
}

/// Drives 2-4 bots through one full game. Timeouts, resignations, and
/// illegal moves are handled as surrender of the offending team, so a
/// multi-player match keeps going until one team survives or the move
/// budget runs out.
pub struct Match {
    config: MatchConfig,
    referee: Referee,
    state: GameState,
    bots: Vec<Box<dyn Bot>>,
    verbose: bool,
}

impl Match {
    pub fn new(bots: Vec<Box<dyn Bot>>, config: MatchConfig, verbose: bool) -> Result<Self, GameError> {
        let referee = Referee::new(bots.len() as u8)?;
        let state = referee.new_game()?;
        Ok(Match {
            config,
            referee,
            state,
            bots,
            verbose,
        })
    }

    fn bot_index(&self, team: TeamType) -> usize {
        self.referee
            .teams()
            .iter()
            .position(|&t| t == team)
            .expect("current turn is a participating team")
    }

    pub fn play(&mut self) -> MatchResult {
        let teams: Vec<TeamType> = self.referee.teams().to_vec();
        for (i, bot) in self.bots.iter_mut().enumerate() {
            bot.game_start(teams[i]);
        }

        if self.verbose {
            println!("Match starting:");
            for (i, bot) in self.bots.iter().enumerate() {
                println!("  {}: {}", teams[i], bot.name());
            }
            println!("\nInitial board:");
            println!("{}", display_board(&self.state, None));
        }

        while !self.state.is_game_over() && self.state.move_count() < self.config.max_moves {
            let team = self.state.current_turn();
            let idx = self.bot_index(team);

            if self.verbose {
                println!(
                    "\nMove {}: {} ({}) to play",
                    self.state.move_count() + 1,
                    self.bots[idx].name(),
                    team
                );
            }

            let start = Instant::now();
            let choice =
                self.bots[idx].choose_move(&self.state, &self.referee, self.config.time_per_move);
            let elapsed = start.elapsed();

            if elapsed > self.config.time_per_move {
                if self.verbose {
                    println!(
                        "TIMEOUT: {} took {:?} (limit: {:?})",
                        self.bots[idx].name(),
                        elapsed,
                        self.config.time_per_move
                    );
                }
                self.state = self.referee.surrender(&self.state, team);
                continue;
            }

            let Some((from, to)) = choice else {
                if self.verbose {
                    println!("{} returned no move, resigning", self.bots[idx].name());
                }
                self.state = self.referee.surrender(&self.state, team);
                continue;
            };

            match self.referee.try_move(&self.state, from, to) {
                Ok(outcome) if outcome.applied() => {
                    if self.verbose {
                        println!("{} plays: {} (took {:?})", self.bots[idx].name(), outcome.mov, elapsed);
                    }
                    for bot in &mut self.bots {
                        bot.notify_move(&outcome.mov);
                    }
                    self.state = outcome.state;
                    if self.verbose {
                        println!("{}", display_board(&self.state, None));
                    }
                }
                Ok(outcome) => {
                    if self.verbose {
                        println!(
                            "ILLEGAL MOVE: {} - {}",
                            self.bots[idx].name(),
                            outcome.validation.reason.unwrap_or_default()
                        );
                    }
                    self.state = self.referee.surrender(&self.state, team);
                }
                Err(e) => {
                    if self.verbose {
                        println!("ILLEGAL MOVE: {} - {}", self.bots[idx].name(), e);
                    }
                    self.state = self.referee.surrender(&self.state, team);
                }
            }
        }

        for bot in &mut self.bots {
            bot.game_end();
        }

        let moves = self.state.move_count();
        match self.state.status() {
            GameStatus::Winner(team) => {
                let idx = self.bot_index(team);
                if self.verbose {
                    println!("\n{} wins as {}!", self.bots[idx].name(), team);
                }
                MatchResult::Winner {
                    winner_name: self.bots[idx].name().to_string(),
                    team,
                    moves,
                }
            }
            _ => {
                if self.verbose {
                    println!("\nDraw after {} moves", moves);
                }
                MatchResult::Draw { moves }
            }
        }
    }
}

/// Single-character code for a piece type, paired with the team index in
/// the rendered board.
pub(crate) fn piece_letter(piece_type: PieceType) -> char {
    match piece_type {
        PieceType::Farmer => 'F',
        PieceType::Ram => 'R',
        PieceType::Trap => 'T',
        PieceType::Knight => 'N',
        PieceType::Templar => 'M',
        PieceType::Scout => 'S',
        PieceType::Trebuchet => 'B',
        PieceType::Treasure => 'E',
        PieceType::King => 'K',
    }
}

pub(crate) fn team_digit(team: TeamType) -> char {
    match team {
        TeamType::Our => '0',
        TeamType::Opponent => '1',
        TeamType::Opponent2 => '2',
        TeamType::Opponent3 => '3',
    }
}

/// Render the board as text, top row last so Our side reads at the
/// bottom. With a viewer given, enemy Traps are hidden exactly as a UI
/// for that player would hide them.
pub fn display_board(state: &GameState, viewer: Option<TeamType>) -> String {
    let mut out = String::new();
    out.push_str("    ");
    for x in 0..BOARD_SIZE {
        out.push_str(&format!("{x:2} "));
    }
    out.push('\n');

    for y in (0..BOARD_SIZE).rev() {
        out.push_str(&format!("{y:2}  "));
        for x in 0..BOARD_SIZE {
            let square = Position::new(x, y).expect("render scan stays on the board");
            let cell = match state.piece_at(square) {
                Some(p) if viewer.map_or(true, |v| p.visible_to(v)) => {
                    format!("{}{}", piece_letter(p.piece_type), team_digit(p.team))
                }
                _ if square.is_in_forbidden_zone() => "##".to_string(),
                _ => " .".to_string(),
            };
            out.push_str(&cell);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// Round-robin tournament over bot factories. Factories sidestep the
/// ownership problem of reusing one bot instance across matches: every
/// pairing gets fresh bots.
pub struct Tournament {
    entries: Vec<(String, Box<dyn Fn() -> Box<dyn Bot>>)>,
    config_factory: Box<dyn Fn() -> MatchConfig>,
    verbose: bool,
}

impl Tournament {
    pub fn new(config_factory: Box<dyn Fn() -> MatchConfig>, verbose: bool) -> Self {
        Tournament {
            entries: Vec::new(),
            config_factory,
            verbose,
        }
    }

    pub fn add_bot(&mut self, name: String, factory: Box<dyn Fn() -> Box<dyn Bot>>) {
        self.entries.push((name, factory));
    }

    /// Each pair plays twice, once with each seat order.
    pub fn run_round_robin(&mut self) -> TournamentResults {
        let mut results = TournamentResults::new(self.entries.iter().map(|(n, _)| n.clone()));

        for i in 0..self.entries.len() {
            for j in (i + 1)..self.entries.len() {
                for (first, second) in [(i, j), (j, i)] {
                    if self.verbose {
                        println!(
                            "\nMatch: {} vs {}",
                            self.entries[first].0, self.entries[second].0
                        );
                    }
                    let bots = vec![(self.entries[first].1)(), (self.entries[second].1)()];
                    let result = match Match::new(bots, (self.config_factory)(), self.verbose) {
                        Ok(mut m) => m.play(),
                        Err(e) => {
                            if self.verbose {
                                println!("match setup failed: {e}");
                            }
                            continue;
                        }
                    };
                    results.record(&self.entries[first].0, &self.entries[second].0, &result);
                }
            }
        }

        results
    }
}

#[derive(Debug, Default)]
pub struct Standing {
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

#[derive(Debug)]
pub struct TournamentResults {
    standings: Vec<(String, Standing)>,
}

impl TournamentResults {
    fn new(names: impl Iterator<Item = String>) -> Self {
        TournamentResults {
            standings: names.map(|n| (n, Standing::default())).collect(),
        }
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut Standing> {
        self.standings
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    fn record(&mut self, first: &str, second: &str, result: &MatchResult) {
        match result.winner() {
            Some(winner) => {
                let winner = winner.to_string();
                let loser = if winner == first { second } else { first };
                if let Some(s) = self.entry_mut(&winner) {
                    s.wins += 1;
                }
                if let Some(s) = self.entry_mut(loser) {
                    s.losses += 1;
                }
            }
            None => {
                for name in [first, second] {
                    if let Some(s) = self.entry_mut(name) {
                        s.draws += 1;
                    }
                }
            }
        }
    }

    pub fn standings(&self) -> &[(String, Standing)] {
        &self.standings
    }

    pub fn display(&self) {
        println!("\nTournament Results:");
        println!("==================");
        for (name, standing) in &self.standings {
            println!(
                "{name}: {} wins, {} draws, {} losses",
                standing.wins, standing.draws, standing.losses
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::FirstMoveBot;
    use crate::piece::GamePiece;

    #[test]
    fn test_match_between_baseline_bots_terminates() {
        let bots: Vec<Box<dyn Bot>> = vec![
            Box::new(FirstMoveBot::new("a".to_string())),
            Box::new(FirstMoveBot::new("b".to_string())),
        ];
        let config = MatchConfig {
            time_per_move: Duration::from_secs(5),
            max_moves: 40,
        };
        let mut game = Match::new(bots, config, false).unwrap();
        // Either somebody wins inside the budget or the match is drawn;
        // the point is that play() returns
        match game.play() {
            MatchResult::Winner { moves, .. } => assert!(moves <= 40),
            MatchResult::Draw { moves } => assert!(moves <= 40),
        }
    }

    #[test]
    fn test_display_board_hides_enemy_traps_from_a_viewer() {
        let pos = |x, y| Position::new(x, y).unwrap();
        let state = GameState::from_pieces(
            vec![
                GamePiece::new(PieceType::Trap, TeamType::Opponent, pos(8, 8)),
                GamePiece::new(PieceType::King, TeamType::Our, pos(7, 5)),
            ],
            TeamType::Our,
        );
        let omniscient = display_board(&state, None);
        assert!(omniscient.contains("T1"));

        let our_view = display_board(&state, Some(TeamType::Our));
        assert!(!our_view.contains("T1"));
        assert!(our_view.contains("K0"));

        let their_view = display_board(&state, Some(TeamType::Opponent));
        assert!(their_view.contains("T1"));
    }

    #[test]
    fn test_wrong_roster_size_is_rejected() {
        let bots: Vec<Box<dyn Bot>> = vec![Box::new(FirstMoveBot::new("solo".to_string()))];
        assert!(Match::new(bots, MatchConfig::default(), false).is_err());
    }
}
