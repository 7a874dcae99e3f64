use citadel_arena::*;
use std::time::Duration;

fn main() {
    println!("Simple Citadel Match Demo\n");

    // Create two bots
    let bot1 = Box::new(FirstMoveBot::new("Steady Alice".to_string()));
    let bot2 = Box::new(GreedyBot::new("Greedy Bob".to_string()));

    // Configure match with shorter time limits
    let config = MatchConfig {
        time_per_move: Duration::from_millis(500),
        max_moves: 60,
    };

    // Run the match with verbose output
    let mut match_game =
        Match::new(vec![bot1, bot2], config, true).expect("two bots is a valid roster");
    let result = match_game.play();

    // Print summary
    println!("\n{}", "=".repeat(60));
    match &result {
        MatchResult::Winner {
            winner_name,
            team,
            moves,
        } => {
            println!("{} won as {} in {} moves!", winner_name, team, moves);
        }
        MatchResult::Draw { moves } => {
            println!("Draw after {} moves", moves);
        }
    }
    println!("{}", "=".repeat(60));
}
