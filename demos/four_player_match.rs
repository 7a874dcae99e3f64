/// Example of a four-player match, including a hand-rolled rand-backed bot.
use citadel_arena::*;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Picks a uniformly random legal move each turn.
pub struct RandomBot {
    name: String,
}

impl RandomBot {
    pub fn new(name: String) -> Self {
        RandomBot { name }
    }
}

impl Bot for RandomBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(
        &mut self,
        state: &GameState,
        referee: &Referee,
        _time_limit: Duration,
    ) -> Option<(Position, Position)> {
        let moves = referee.legal_moves(state, state.current_turn());
        let mut rng = rand::thread_rng();
        moves.choose(&mut rng).map(|mv| (mv.from, mv.to))
    }

    fn game_start(&mut self, team: TeamType) {
        println!("{} starting as {}", self.name, team);
    }
}

fn main() {
    println!("Four-Player Citadel Match\n");

    let bots: Vec<Box<dyn Bot>> = vec![
        Box::new(GreedyBot::new("Greedy North".to_string())),
        Box::new(GreedyBot::new("Greedy South".to_string())),
        Box::new(RandomBot::new("Random East".to_string())),
        Box::new(RandomBot::new("Random West".to_string())),
    ];

    let config = MatchConfig {
        time_per_move: Duration::from_secs(1),
        max_moves: 400,
    };

    let mut match_game = Match::new(bots, config, true).expect("four bots is a valid roster");
    let result = match_game.play();

    println!("\nMatch completed!");
    if let Some(winner) = result.winner() {
        println!("Winner: {}", winner);
    } else {
        println!("Draw!");
    }
}
