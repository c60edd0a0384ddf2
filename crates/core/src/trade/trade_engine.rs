use std::collections::HashSet;

use super::trade_model::{
    Asset, OwnerHoldings, RecommendationCandidate, Recommendations, RosterSide, Side,
    TradeResult, Winner,
};

/// Default threshold under which a trade counts as balanced.
pub const SAFE_MARGIN: f64 = 50.0;

pub const MAX_RECOMMENDATIONS: usize = 5;

/// Keeps active assets, dropping later duplicates of an id.
pub fn active_pool(assets: impl IntoIterator<Item = Asset>) -> Vec<Asset> {
    let mut seen = HashSet::new();
    assets
        .into_iter()
        .filter(|asset| asset.is_active() && seen.insert(asset.id.clone()))
        .collect()
}

pub fn compute_result(side_a: &RosterSide, side_b: &RosterSide) -> TradeResult {
    let total_a = side_a.total();
    let total_b = side_b.total();
    let winner = if total_a == total_b {
        Winner::Even
    } else if total_a > total_b {
        Winner::A
    } else {
        Winner::B
    };

    TradeResult {
        total_a,
        total_b,
        winner,
        diff: (total_a - total_b).abs(),
    }
}

/// Best-fit additions for the lighter side of an unbalanced trade.
///
/// Nothing is suggested while `diff <= margin`. Candidates come from `pool`
/// minus assets already on either side. When the heavier side is bound to an
/// owner, only that owner's holdings are eligible; an owner missing from
/// `holdings` yields no candidates. Ties keep pool order.
pub fn compute_recommendations(
    side_a: &RosterSide,
    side_b: &RosterSide,
    pool: &[Asset],
    holdings: &OwnerHoldings,
    margin: f64,
) -> Recommendations {
    let result = compute_result(side_a, side_b);
    let mut recommendations = Recommendations::default();
    if result.diff <= margin {
        return recommendations;
    }

    let target = if result.total_a > result.total_b {
        Side::B
    } else {
        Side::A
    };
    let opposing = match target {
        Side::A => side_b,
        Side::B => side_a,
    };

    let restriction: Option<HashSet<&str>> = opposing.owner_id.as_ref().map(|owner| {
        holdings
            .get(owner)
            .map(|ids| ids.iter().map(String::as_str).collect())
            .unwrap_or_default()
    });

    let mut candidates: Vec<RecommendationCandidate> = pool
        .iter()
        .filter(|asset| !side_a.contains(&asset.id) && !side_b.contains(&asset.id))
        .filter(|asset| {
            restriction
                .as_ref()
                .map_or(true, |ids| ids.contains(asset.id.as_str()))
        })
        .map(|asset| RecommendationCandidate {
            asset: asset.clone(),
            match_score: (asset.value - result.diff).abs(),
        })
        .collect();

    // Vec::sort_by is stable.
    candidates.sort_by(|x, y| x.match_score.total_cmp(&y.match_score));
    candidates.truncate(MAX_RECOMMENDATIONS);

    match target {
        Side::A => recommendations.a = candidates,
        Side::B => recommendations.b = candidates,
    }
    recommendations
}
