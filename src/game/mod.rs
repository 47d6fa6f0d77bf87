pub mod grid;
pub mod state;

pub use grid::{GridCell, GridLayout, Rect};
pub use state::{GamePhase, GameState, PushOutcome, DEFAULT_CAPACITY};
