use citadel_arena::*;
use std::time::Duration;

fn main() {
    println!("Citadel Arena - Bot Match System");
    println!("================================\n");

    // Create some example bots
    let bot1 = Box::new(FirstMoveBot::new("FirstMove1".to_string()));
    let bot2 = Box::new(GreedyBot::new("Greedy1".to_string()));

    // Configure match
    let config = MatchConfig {
        time_per_move: Duration::from_secs(2),
        max_moves: 200,
    };

    // Play a match
    let mut match_game = match Match::new(vec![bot1, bot2], config, true) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("failed to set up match: {e}");
            std::process::exit(1);
        }
    };
    let result = match_game.play();

    // Display result
    println!("\n================================");
    println!("Match Result:");
    match result {
        MatchResult::Winner {
            winner_name,
            team,
            moves,
        } => {
            println!("  {} wins as {} in {} moves!", winner_name, team, moves);
        }
        MatchResult::Draw { moves } => {
            println!("  Draw after {} moves", moves);
        }
    }
    println!("================================");
}
