use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower_http::services::ServeDir;

use crate::arena::{piece_letter, team_digit};
use crate::bot::{Bot, FirstMoveBot, GreedyBot};
use crate::piece::TeamType;
use crate::position::{BOARD_SIZE, Position};
use crate::referee::Referee;
use crate::state::{GameState, GameStatus};

#[derive(Clone, Copy, Debug)]
enum BotType {
    Greedy,
    FirstMove,
}

#[derive(Clone)]
pub struct AppState {
    game: Arc<Mutex<WebGame>>,
}

struct WebGame {
    referee: Arc<Referee>,
    state: GameState,
    player_team: TeamType,
    bot_type: BotType,
}

#[derive(Serialize, Deserialize)]
pub struct NewGameRequest {
    players: u8,
    player_team: String,
    bot_type: String,
}

#[derive(Serialize)]
pub struct GameResponse {
    board: Vec<Vec<String>>,
    current_turn: String,
    status: String,
    legal_moves: Vec<MoveResponse>,
    material: Vec<MaterialResponse>,
    game_over: bool,
    winner: Option<String>,
    message: String,
}

#[derive(Serialize)]
pub struct MaterialResponse {
    team: String,
    score: u32,
    eliminated: bool,
}

#[derive(Serialize, Deserialize)]
pub struct MoveRequest {
    from_x: i32,
    from_y: i32,
    to_x: i32,
    to_y: i32,
}

#[derive(Serialize, Deserialize)]
pub struct ValidMovesRequest {
    x: i32,
    y: i32,
}

#[derive(Serialize, Clone)]
pub struct MoveResponse {
    from_x: i32,
    from_y: i32,
    to_x: i32,
    to_y: i32,
}

impl AppState {
    pub fn new() -> Self {
        let referee = Arc::new(Referee::new(2).expect("two players is a supported count"));
        let state = referee.new_game().expect("fresh two-player board");
        let game = WebGame {
            referee,
            state,
            player_team: TeamType::Our,
            bot_type: BotType::Greedy,
        };
        AppState {
            game: Arc::new(Mutex::new(game)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn team_to_string(team: TeamType) -> String {
    team.name().to_string()
}

fn string_to_team(s: &str) -> TeamType {
    match s.to_lowercase().as_str() {
        "opponent" => TeamType::Opponent,
        "opponent2" => TeamType::Opponent2,
        "opponent3" => TeamType::Opponent3,
        _ => TeamType::Our,
    }
}

fn string_to_bot(s: &str) -> BotType {
    match s.to_lowercase().as_str() {
        "firstmove" | "first-move" => BotType::FirstMove,
        _ => BotType::Greedy,
    }
}

fn get_bot_instance(bot_type: BotType) -> Box<dyn Bot> {
    match bot_type {
        BotType::Greedy => Box::new(GreedyBot::new("Greedy Bot".to_string())),
        BotType::FirstMove => Box::new(FirstMoveBot::new("First Move Bot".to_string())),
    }
}

fn status_to_string(status: GameStatus) -> String {
    match status {
        GameStatus::NotStarted => "not started".to_string(),
        GameStatus::InProgress => "in progress".to_string(),
        GameStatus::Paused => "paused".to_string(),
        GameStatus::Check => "check".to_string(),
        GameStatus::Checkmate => "checkmate".to_string(),
        GameStatus::Stalemate => "stalemate".to_string(),
        GameStatus::Draw => "draw".to_string(),
        GameStatus::Winner(team) => format!("{} wins", team),
    }
}

/// Serialize the board for one viewer: enemy Traps render as empty
/// squares, forbidden zones as "#". Cell codes are piece letter + team
/// digit, matching the text renderer.
fn board_for_viewer(state: &GameState, viewer: TeamType) -> Vec<Vec<String>> {
    let mut board = vec![vec![".".to_string(); BOARD_SIZE as usize]; BOARD_SIZE as usize];
    for y in 0..BOARD_SIZE {
        for x in 0..BOARD_SIZE {
            let square = Position::new(x, y).expect("grid scan stays on the board");
            let cell = match state.piece_at(square) {
                Some(p) if p.visible_to(viewer) => rendered_cell(p.piece_type, p.team),
                _ if square.is_in_forbidden_zone() => "#".to_string(),
                _ => ".".to_string(),
            };
            board[y as usize][x as usize] = cell;
        }
    }
    board
}

fn rendered_cell(piece_type: crate::piece::PieceType, team: TeamType) -> String {
    format!("{}{}", piece_letter(piece_type), team_digit(team))
}

/// Let the configured bot play every non-human team until it is the
/// human's turn again or the game ends.
fn run_bot_turns(game: &mut WebGame) -> String {
    let mut messages = Vec::new();
    while !game.state.is_game_over() && game.state.current_turn() != game.player_team {
        let mut bot = get_bot_instance(game.bot_type);
        let choice = bot.choose_move(&game.state, &game.referee, Duration::from_secs(5));
        let Some((from, to)) = choice else {
            let team = game.state.current_turn();
            game.state = game.referee.surrender(&game.state, team);
            messages.push(format!("{team} resigned"));
            continue;
        };
        match game.referee.try_move(&game.state, from, to) {
            Ok(outcome) if outcome.applied() => {
                messages.push(format!("Bot played: {} -> {}", from, to));
                game.state = outcome.state;
            }
            _ => {
                // A bot proposing an illegal move forfeits
                let team = game.state.current_turn();
                game.state = game.referee.surrender(&game.state, team);
                messages.push(format!("{team} forfeited on an illegal move"));
            }
        }
    }
    messages.join("; ")
}

#[axum::debug_handler]
async fn new_game(State(app_state): State<AppState>, Json(req): Json<NewGameRequest>) -> Response {
    let player_team = string_to_team(&req.player_team);
    let bot_type = string_to_bot(&req.bot_type);

    let message = {
        let mut game = app_state.game.lock().unwrap();
        let referee = match Referee::new(req.players) {
            Ok(r) => Arc::new(r),
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": e.to_string() })),
                )
                    .into_response();
            }
        };
        let state = match referee.new_game() {
            Ok(s) => s,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": e.to_string() })),
                )
                    .into_response();
            }
        };
        if !referee.teams().contains(&player_team) {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": format!("{player_team} is not seated in a {}-player game", req.players)
                })),
            )
                .into_response();
        }

        game.referee = referee;
        game.state = state;
        game.player_team = player_team;
        game.bot_type = bot_type;

        let bot_message = run_bot_turns(&mut game);
        if bot_message.is_empty() {
            "Your turn!".to_string()
        } else {
            bot_message
        }
    };

    let Json(mut game_response) = get_game_state(State(app_state)).await;
    game_response.message = message;
    Json(game_response).into_response()
}

#[axum::debug_handler]
async fn make_move(State(app_state): State<AppState>, Json(req): Json<MoveRequest>) -> Response {
    let message = {
        let mut game = app_state.game.lock().unwrap();

        if game.state.is_game_over() {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "Game is over" })),
            )
                .into_response();
        }
        if game.state.current_turn() != game.player_team {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "Not your turn" })),
            )
                .into_response();
        }

        let (from, to) = match (
            Position::new(req.from_x, req.from_y),
            Position::new(req.to_x, req.to_y),
        ) {
            (Ok(from), Ok(to)) => (from, to),
            _ => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": "Square is off the board" })),
                )
                    .into_response();
            }
        };

        match game.referee.try_move(&game.state, from, to) {
            Ok(outcome) if outcome.applied() => {
                game.state = outcome.state;
            }
            Ok(outcome) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                        "error": format!(
                            "Invalid move: {}",
                            outcome.validation.reason.unwrap_or_default()
                        )
                    })),
                )
                    .into_response();
            }
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": format!("Invalid move: {e}") })),
                )
                    .into_response();
            }
        }

        run_bot_turns(&mut game)
    };

    let Json(mut game_response) = get_game_state(State(app_state)).await;
    game_response.message = message;
    Json(game_response).into_response()
}

#[axum::debug_handler]
async fn valid_moves(
    State(app_state): State<AppState>,
    Json(req): Json<ValidMovesRequest>,
) -> Response {
    let game = app_state.game.lock().unwrap();
    let Ok(from) = Position::new(req.x, req.y) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Square is off the board" })),
        )
            .into_response();
    };

    let destinations: Vec<MoveResponse> = game
        .referee
        .valid_moves_from(&game.state, from)
        .into_iter()
        .map(|to| MoveResponse {
            from_x: from.x,
            from_y: from.y,
            to_x: to.x,
            to_y: to.y,
        })
        .collect();
    Json(serde_json::json!({ "moves": destinations })).into_response()
}

async fn get_game_state(State(app_state): State<AppState>) -> Json<GameResponse> {
    let game = app_state.game.lock().unwrap();

    let legal_moves: Vec<MoveResponse> =
        if !game.state.is_game_over() && game.state.current_turn() == game.player_team {
            game.referee
                .legal_moves(&game.state, game.player_team)
                .iter()
                .map(|m| MoveResponse {
                    from_x: m.from.x,
                    from_y: m.from.y,
                    to_x: m.to.x,
                    to_y: m.to.y,
                })
                .collect()
        } else {
            Vec::new()
        };

    let material: Vec<MaterialResponse> = game
        .referee
        .teams()
        .iter()
        .map(|&team| MaterialResponse {
            team: team_to_string(team),
            score: game.state.material_score(team),
            eliminated: game.state.is_eliminated(team),
        })
        .collect();

    let winner = match game.state.status() {
        GameStatus::Winner(team) => Some(team_to_string(team)),
        _ => None,
    };

    Json(GameResponse {
        board: board_for_viewer(&game.state, game.player_team),
        current_turn: team_to_string(game.state.current_turn()),
        status: status_to_string(game.state.status()),
        legal_moves,
        material,
        game_over: game.state.is_game_over(),
        winner,
        message: String::new(),
    })
}

pub async fn run_server() -> Result<(), Box<dyn std::error::Error>> {
    let app_state = AppState::new();

    let app = Router::new()
        .route("/api/new-game", post(new_game))
        .route("/api/move", post(make_move))
        .route("/api/valid-moves", post(valid_moves))
        .route("/api/game-state", get(get_game_state))
        .nest_service("/", ServeDir::new("static"))
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    println!("Web server running at http://127.0.0.1:3000");

    axum::serve(listener, app).await?;
    Ok(())
}
