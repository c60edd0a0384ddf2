use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use super::trade_engine::{compute_recommendations, compute_result};
use super::trade_model::{Asset, OwnerHoldings, Recommendations, RosterSide, Side, TradeResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEvaluation {
    pub result: TradeResult,
    pub recommendations: Recommendations,
}

/// An in-progress trade: both sides plus the optional league context used to
/// bind sides to owners.
#[derive(Debug, Clone, Default)]
pub struct TradeSession {
    side_a: RosterSide,
    side_b: RosterSide,
    holdings: Option<OwnerHoldings>,
}

impl TradeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(&self, side: Side) -> &RosterSide {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut RosterSide {
        match side {
            Side::A => &mut self.side_a,
            Side::B => &mut self.side_b,
        }
    }

    pub fn holdings(&self) -> Option<&OwnerHoldings> {
        self.holdings.as_ref()
    }

    /// Sets the league context (owner id to rostered asset ids).
    pub fn load_league(&mut self, holdings: OwnerHoldings) {
        self.holdings = Some(holdings);
    }

    pub fn set_owner(&mut self, side: Side, owner_id: Option<String>) {
        self.side_mut(side).owner_id = owner_id;
    }

    /// Adds `asset` to `side`, ignoring duplicates.
    ///
    /// With a league loaded and no owner on the other side yet, the other
    /// side is bound to whichever owner rosters the added asset.
    pub fn add(&mut self, side: Side, asset: Asset) -> bool {
        let asset_id = asset.id.clone();
        if !self.side_mut(side).add(asset) {
            return false;
        }

        let other = side.other();
        if self.side(other).owner_id.is_none() {
            if let Some(owner) = self.owner_of(&asset_id) {
                debug!("Binding side {:?} to owner {} via {}", other, owner, asset_id);
                self.side_mut(other).owner_id = Some(owner);
            }
        }
        true
    }

    pub fn remove(&mut self, side: Side, asset_id: &str) -> Option<Asset> {
        self.side_mut(side).remove(asset_id)
    }

    /// Empties both sides and unbinds both owners. The league stays loaded.
    pub fn clear(&mut self) {
        self.side_a.clear();
        self.side_b.clear();
    }

    /// `clear` plus dropping the league context.
    pub fn clear_league(&mut self) {
        self.clear();
        self.holdings = None;
    }

    /// Refreshes side values from a new valuation pool. Assets missing from
    /// the pool keep their previous value.
    pub fn reprice(&mut self, pool: &[Asset]) {
        let prices: HashMap<&str, f64> = pool.iter().map(|a| (a.id.as_str(), a.value)).collect();
        for asset in self
            .side_a
            .assets
            .iter_mut()
            .chain(self.side_b.assets.iter_mut())
        {
            if let Some(value) = prices.get(asset.id.as_str()) {
                asset.value = *value;
            }
        }
    }

    pub fn result(&self) -> TradeResult {
        compute_result(&self.side_a, &self.side_b)
    }

    pub fn evaluate(&self, pool: &[Asset], margin: f64) -> TradeEvaluation {
        let empty = OwnerHoldings::new();
        let holdings = self.holdings.as_ref().unwrap_or(&empty);
        TradeEvaluation {
            result: self.result(),
            recommendations: compute_recommendations(
                &self.side_a,
                &self.side_b,
                pool,
                holdings,
                margin,
            ),
        }
    }

    /// Owner whose roster holds `asset_id`. Smallest owner id wins if several do.
    fn owner_of(&self, asset_id: &str) -> Option<String> {
        self.holdings
            .as_ref()?
            .iter()
            .filter(|(_, ids)| ids.iter().any(|id| id == asset_id))
            .map(|(owner, _)| owner)
            .min()
            .cloned()
    }
}
