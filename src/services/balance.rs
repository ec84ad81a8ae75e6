//! Balance aggregation
//!
//! Folds a list of shared expenses into one [`ParticipantBalance`] per
//! participant. Every expense is split equally between the payer and the
//! resolved participants; nothing is rounded along the way.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::{ExpenseId, ParticipantBalance, SharedExpense};

use super::identity::IdentityResolver;

/// Balances keyed by canonical participant name
pub type BalanceMap = BTreeMap<String, ParticipantBalance>;

/// An expense left out of aggregation because it failed validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedExpense {
    pub expense_id: ExpenseId,
    pub reason: String,
}

/// Output of [`aggregate`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub balances: BalanceMap,
    pub skipped: Vec<SkippedExpense>,
}

impl Aggregation {
    /// Sum of all net balances; zero up to floating-point residue
    pub fn net_total(&self) -> f64 {
        self.balances.values().map(|b| b.net_balance).sum()
    }
}

/// The canonical participant set of one expense: the payer plus every
/// resolved participant, deduplicated
pub fn participant_set<R>(expense: &SharedExpense, resolver: &R) -> BTreeSet<String>
where
    R: IdentityResolver + ?Sized,
{
    let mut members = BTreeSet::new();
    members.insert(resolver.resolve(&expense.payer_id));
    for pid in &expense.participant_ids {
        members.insert(resolver.resolve(pid));
    }
    members
}

/// Aggregate expenses into per-participant balances
///
/// Invalid expenses are skipped and reported rather than aborting the run.
pub fn aggregate<R>(expenses: &[SharedExpense], resolver: &R) -> Aggregation
where
    R: IdentityResolver + ?Sized,
{
    let mut result = Aggregation::default();

    for expense in expenses {
        if let Err(e) = expense.validate() {
            result.skipped.push(SkippedExpense {
                expense_id: expense.id,
                reason: e.to_string(),
            });
            continue;
        }

        let payer = resolver.resolve(&expense.payer_id);
        let members = participant_set(expense, resolver);
        let share = expense.total_amount / members.len() as f64;

        result
            .balances
            .entry(payer.clone())
            .or_insert_with(|| ParticipantBalance::new(payer))
            .total_paid += expense.total_amount;

        for member in members {
            result
                .balances
                .entry(member.clone())
                .or_insert_with(|| ParticipantBalance::new(member))
                .total_owed += share;
        }
    }

    for balance in result.balances.values_mut() {
        balance.refresh_net();
    }

    result
}
