//! Settlement engine
//!
//! Runs resolution, aggregation and planning as one step and remembers the
//! last result. Callers that recompute on every redraw get the cached
//! outcome back as long as the resolved expense list hashes the same.

use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};

use crate::error::{TripsplitError, TripsplitResult};
use crate::models::{SettlementTransfer, SharedExpense};

use super::balance::{aggregate, participant_set, BalanceMap, SkippedExpense};
use super::identity::IdentityResolver;
use super::settlement::SettlementPlanner;

/// Everything derived from one expense snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementOutcome {
    pub balances: BalanceMap,
    pub transfers: Vec<SettlementTransfer>,
    pub skipped: Vec<SkippedExpense>,
    /// Hex SHA-256 of the resolved expense list
    pub content_hash: String,
}

/// Memoizing front end for the settlement pipeline
#[derive(Debug, Default)]
pub struct SettlementEngine {
    planner: SettlementPlanner,
    last: Mutex<Option<Arc<SettlementOutcome>>>,
}

impl SettlementEngine {
    pub fn new(planner: SettlementPlanner) -> Self {
        Self {
            planner,
            last: Mutex::new(None),
        }
    }

    /// Build an engine using the configured zero tolerance
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self::new(SettlementPlanner::new(epsilon))
    }

    pub fn planner(&self) -> &SettlementPlanner {
        &self.planner
    }

    /// Compute balances and transfers, reusing the previous outcome when the
    /// resolved input is unchanged
    pub fn compute<R>(
        &self,
        expenses: &[SharedExpense],
        resolver: &R,
    ) -> TripsplitResult<Arc<SettlementOutcome>>
    where
        R: IdentityResolver + ?Sized,
    {
        let content_hash = content_hash(expenses, resolver);

        let mut last = self
            .last
            .lock()
            .map_err(|e| TripsplitError::Logic(format!("Settlement cache lock poisoned: {}", e)))?;

        if let Some(cached) = last.as_ref() {
            if cached.content_hash == content_hash {
                return Ok(Arc::clone(cached));
            }
        }

        let aggregation = aggregate(expenses, resolver);
        let transfers = self.planner.plan(&aggregation.balances)?;

        let outcome = Arc::new(SettlementOutcome {
            balances: aggregation.balances,
            transfers,
            skipped: aggregation.skipped,
            content_hash,
        });
        *last = Some(Arc::clone(&outcome));

        Ok(outcome)
    }

    /// Drop the remembered outcome
    pub fn invalidate(&self) {
        if let Ok(mut last) = self.last.lock() {
            *last = None;
        }
    }
}

/// Hash the parts of each expense that affect the outcome, after resolution
pub fn content_hash<R>(expenses: &[SharedExpense], resolver: &R) -> String
where
    R: IdentityResolver + ?Sized,
{
    let mut hasher = Sha256::new();

    for expense in expenses {
        hasher.update(expense.id.as_uuid().as_bytes());
        hasher.update(expense.total_amount.to_bits().to_le_bytes());
        hasher.update(resolver.resolve(&expense.payer_id).as_bytes());
        hasher.update([0x1f_u8]);
        for member in participant_set(expense, resolver) {
            hasher.update(member.as_bytes());
            hasher.update([0x1f_u8]);
        }
        hasher.update([0x1e_u8]);
    }

    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::identity::LiteralResolver;

    fn expenses() -> Vec<SharedExpense> {
        vec![
            SharedExpense::new(100.0, "A", vec!["B".into()]),
            SharedExpense::new(90.0, "B", vec!["A".into(), "C".into()]),
        ]
    }

    #[test]
    fn test_compute_matches_pipeline() {
        let engine = SettlementEngine::default();
        let outcome = engine.compute(&expenses(), &LiteralResolver).unwrap();

        assert_eq!(outcome.balances.len(), 3);
        assert!((outcome.balances["A"].net_balance - 20.0).abs() < 1e-9);
        assert!(!outcome.transfers.is_empty());
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_same_input_returns_cached_outcome() {
        let engine = SettlementEngine::default();
        let input = expenses();

        let first = engine.compute(&input, &LiteralResolver).unwrap();
        let second = engine.compute(&input, &LiteralResolver).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_changed_input_recomputes() {
        let engine = SettlementEngine::default();
        let mut input = expenses();

        let first = engine.compute(&input, &LiteralResolver).unwrap();
        input[0].total_amount = 120.0;
        let second = engine.compute(&input, &LiteralResolver).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_ne!(first.content_hash, second.content_hash);
        assert!((second.balances["A"].net_balance - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_directory_change_recomputes() {
        let engine = SettlementEngine::default();
        let input = expenses();
        let renamed = |id: &str| if id == "C" { "Carol".to_string() } else { id.to_string() };

        let first = engine.compute(&input, &LiteralResolver).unwrap();
        let second = engine.compute(&input, &renamed).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(second.balances.contains_key("Carol"));
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let engine = SettlementEngine::default();
        let input = expenses();

        let first = engine.compute(&input, &LiteralResolver).unwrap();
        engine.invalidate();
        let second = engine.compute(&input, &LiteralResolver).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[test]
    fn test_hash_depends_on_order() {
        let input = expenses();
        let reversed: Vec<_> = input.iter().rev().cloned().collect();
        assert_ne!(
            content_hash(&input, &LiteralResolver),
            content_hash(&reversed, &LiteralResolver)
        );
    }

    #[test]
    fn test_engine_is_sync() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<SettlementEngine>();
    }
}
