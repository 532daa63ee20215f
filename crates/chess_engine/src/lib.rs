pub mod ai;
pub mod analysis;
pub mod evaluation;
pub mod search;

pub use ai::ChessAI;
pub use analysis::analyse_root_moves;
pub use evaluation::evaluate;
pub use search::{
    minimax, search, search_with_stats, SearchOutcome, DEFAULT_SEARCH_DEPTH, INFINITY, MATE_SCORE,
};
