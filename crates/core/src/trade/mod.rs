//! Trade balance and recommendation engine.

mod trade_engine;
mod trade_model;
mod trade_session;


pub use trade_engine::{
    active_pool, compute_recommendations, compute_result, MAX_RECOMMENDATIONS, SAFE_MARGIN,
};
pub use trade_model::{
    Asset, OwnerHoldings, RecommendationCandidate, Recommendations, RosterSide, Side,
    TradeResult, Winner, PICK_POSITION,
};
pub use trade_session::{TradeEvaluation, TradeSession};
