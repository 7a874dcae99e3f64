pub mod arena;
pub mod board;
pub mod bot;
pub mod moves;
pub mod piece;
pub mod plugin;
pub mod position;
pub mod referee;
pub mod rules;
pub mod state;
pub mod turn;
pub mod validators;
pub mod web;
pub mod win;

pub use arena::*;
pub use bot::*;
pub use moves::*;
pub use piece::*;
pub use plugin::*;
pub use position::*;
pub use referee::*;
pub use rules::*;
pub use state::*;
pub use turn::*;
pub use win::*;
