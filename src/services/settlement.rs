//! Settlement planning
//!
//! Collapses a balance map into point-to-point transfers using greedy
//! largest-first netting: the biggest creditor is paired with the biggest
//! debtor until one side is exhausted.
//!
//! The result has at most `creditors + debtors - 1` transfers. It is not
//! guaranteed to be the global minimum; finding that is a subset-sum style
//! search and is not attempted.

use crate::config::settings::DEFAULT_SETTLEMENT_EPSILON;
use crate::error::{TripsplitError, TripsplitResult};
use crate::models::{ParticipantBalance, SettlementTransfer};

use super::balance::BalanceMap;

/// Plans transfers that bring every balance back to zero
#[derive(Debug, Clone, Copy)]
pub struct SettlementPlanner {
    epsilon: f64,
}

impl Default for SettlementPlanner {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_SETTLEMENT_EPSILON,
        }
    }
}

impl SettlementPlanner {
    /// Create a planner with a custom zero tolerance
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Zero tolerance for a single balance, independent of the rest of the map
    pub fn balance_tolerance(&self, net: f64) -> f64 {
        self.epsilon * net.abs().max(1.0)
    }

    pub fn is_creditor(&self, balance: &ParticipantBalance) -> bool {
        balance.is_creditor(self.balance_tolerance(balance.net_balance))
    }

    pub fn is_debtor(&self, balance: &ParticipantBalance) -> bool {
        balance.is_debtor(self.balance_tolerance(balance.net_balance))
    }

    /// Tolerance for the money left over once netting stops, scaled to the
    /// largest balance
    pub fn residue_tolerance(&self, balances: &BalanceMap) -> f64 {
        let largest = balances
            .values()
            .map(|b| b.net_balance.abs())
            .fold(0.0_f64, f64::max);
        self.epsilon * largest.max(1.0)
    }

    /// Compute the transfer list for a balance map
    ///
    /// # Errors
    ///
    /// Returns [`TripsplitError::Logic`] when a balance is not finite or the
    /// balances do not net to zero, either because the iteration cap was hit
    /// or because one side still carries money once the other is exhausted.
    pub fn plan(&self, balances: &BalanceMap) -> TripsplitResult<Vec<SettlementTransfer>> {
        if let Some(b) = balances.values().find(|b| !b.net_balance.is_finite()) {
            return Err(TripsplitError::Logic(format!(
                "balance of {} overflowed ({})",
                b.participant, b.net_balance
            )));
        }

        // (name, remaining, tolerance)
        let mut creditors: Vec<(&str, f64, f64)> = balances
            .values()
            .filter(|b| self.is_creditor(b))
            .map(|b| {
                let tol = self.balance_tolerance(b.net_balance);
                (b.participant.as_str(), b.net_balance, tol)
            })
            .collect();
        let mut debtors: Vec<(&str, f64, f64)> = balances
            .values()
            .filter(|b| self.is_debtor(b))
            .map(|b| {
                let tol = self.balance_tolerance(b.net_balance);
                (b.participant.as_str(), -b.net_balance, tol)
            })
            .collect();

        creditors.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        debtors.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let cap = creditors.len() + debtors.len();
        let mut transfers = Vec::new();
        let (mut i, mut j, mut iterations) = (0, 0, 0);

        while i < creditors.len() && j < debtors.len() {
            if iterations >= cap {
                return Err(TripsplitError::Logic(format!(
                    "settlement did not converge within {} iterations",
                    cap
                )));
            }
            iterations += 1;

            let amount = creditors[i].1.min(debtors[j].1);
            if amount > creditors[i].2.min(debtors[j].2) {
                transfers.push(SettlementTransfer::new(debtors[j].0, creditors[i].0, amount));
            }

            creditors[i].1 -= amount;
            debtors[j].1 -= amount;

            if creditors[i].1 <= creditors[i].2 {
                i += 1;
            }
            if debtors[j].1 <= debtors[j].2 {
                j += 1;
            }
        }

        let residue: f64 = creditors[i..].iter().map(|c| c.1).sum::<f64>()
            + debtors[j..].iter().map(|d| d.1).sum::<f64>();
        if residue > self.residue_tolerance(balances) {
            return Err(TripsplitError::Logic(format!(
                "balances do not net to zero ({:.6} left unsettled)",
                residue
            )));
        }

        Ok(transfers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SharedExpense;
    use crate::services::balance::aggregate;
    use crate::services::identity::LiteralResolver;
    use std::collections::BTreeMap;

    const EPS: f64 = 1e-6;

    fn balances(entries: &[(&str, f64)]) -> BalanceMap {
        entries
            .iter()
            .map(|(name, net)| {
                let mut b = ParticipantBalance::new(*name);
                b.net_balance = *net;
                (name.to_string(), b)
            })
            .collect()
    }

    fn expense(amount: f64, payer: &str, with: &[&str]) -> SharedExpense {
        SharedExpense::new(amount, payer, with.iter().map(|s| s.to_string()).collect())
    }

    fn apply(map: &BalanceMap, transfers: &[SettlementTransfer]) -> BTreeMap<String, f64> {
        let mut remaining: BTreeMap<String, f64> = map
            .iter()
            .map(|(k, b)| (k.clone(), b.net_balance))
            .collect();
        for t in transfers {
            *remaining.get_mut(&t.debtor).unwrap() += t.amount;
            *remaining.get_mut(&t.creditor).unwrap() -= t.amount;
        }
        remaining
    }

    #[test]
    fn test_two_participants() {
        let agg = aggregate(&[expense(100.0, "A", &["B"])], &LiteralResolver);
        let transfers = SettlementPlanner::default().plan(&agg.balances).unwrap();

        assert_eq!(transfers, vec![SettlementTransfer::new("B", "A", 50.0)]);
    }

    #[test]
    fn test_three_participants_one_payer() {
        let agg = aggregate(&[expense(90.0, "A", &["B", "C"])], &LiteralResolver);
        let transfers = SettlementPlanner::default().plan(&agg.balances).unwrap();

        assert_eq!(
            transfers,
            vec![
                SettlementTransfer::new("B", "A", 30.0),
                SettlementTransfer::new("C", "A", 30.0),
            ]
        );
    }

    #[test]
    fn test_thirds_settle_within_epsilon() {
        let agg = aggregate(&[expense(100.0, "A", &["B", "C"])], &LiteralResolver);
        let transfers = SettlementPlanner::default().plan(&agg.balances).unwrap();

        assert_eq!(transfers.len(), 2);
        let paid: f64 = transfers.iter().map(|t| t.amount).sum();
        assert!((paid - 200.0 / 3.0).abs() < EPS);
        for remaining in apply(&agg.balances, &transfers).values() {
            assert!(remaining.abs() < EPS);
        }
    }

    #[test]
    fn test_largest_creditor_and_debtor_matched_first() {
        let map = balances(&[("A", 70.0), ("B", 30.0), ("C", -80.0), ("D", -20.0)]);
        let transfers = SettlementPlanner::default().plan(&map).unwrap();

        assert_eq!(
            transfers,
            vec![
                SettlementTransfer::new("C", "A", 70.0),
                SettlementTransfer::new("C", "B", 10.0),
                SettlementTransfer::new("D", "B", 20.0),
            ]
        );
    }

    #[test]
    fn test_ties_broken_by_name() {
        let map = balances(&[("Zed", 10.0), ("Amy", 10.0), ("Bob", -20.0)]);
        let transfers = SettlementPlanner::default().plan(&map).unwrap();

        assert_eq!(transfers[0].creditor, "Amy");
        assert_eq!(transfers[1].creditor, "Zed");
    }

    #[test]
    fn test_settled_participants_ignored() {
        let map = balances(&[("A", 0.0), ("B", 1e-12), ("C", 5.0), ("D", -5.0)]);
        let transfers = SettlementPlanner::default().plan(&map).unwrap();

        assert_eq!(transfers, vec![SettlementTransfer::new("D", "C", 5.0)]);
    }

    #[test]
    fn test_empty_balances() {
        let transfers = SettlementPlanner::default().plan(&BalanceMap::new()).unwrap();
        assert!(transfers.is_empty());
    }

    #[test]
    fn test_unbalanced_input_is_logic_error() {
        let map = balances(&[("A", 50.0), ("B", -20.0)]);
        let err = SettlementPlanner::default().plan(&map).unwrap_err();
        assert!(err.is_logic());

        let only_debtors = balances(&[("A", -5.0)]);
        assert!(SettlementPlanner::default().plan(&only_debtors).is_err());
    }

    #[test]
    fn test_transfer_bound_and_completeness() {
        let people = ["A", "B", "C", "D", "E", "F"];
        let mut expenses = Vec::new();
        for i in 0..30 {
            let payer = people[(i * 7) % people.len()];
            let with: Vec<&str> = people.iter().copied().skip(i % 4).take(2 + i % 3).collect();
            expenses.push(expense(12.34 + i as f64 * 5.55, payer, &with));
        }
        let agg = aggregate(&expenses, &LiteralResolver);
        let planner = SettlementPlanner::default();
        let transfers = planner.plan(&agg.balances).unwrap();

        let tol = planner.residue_tolerance(&agg.balances);
        let nonzero = agg
            .balances
            .values()
            .filter(|b| planner.is_creditor(b) || planner.is_debtor(b))
            .count();
        assert!(transfers.len() <= nonzero.saturating_sub(1));

        for t in &transfers {
            assert_ne!(t.debtor, t.creditor);
            assert!(t.amount > 0.0);
        }
        for remaining in apply(&agg.balances, &transfers).values() {
            assert!(remaining.abs() < tol * 10.0);
        }
    }

    #[test]
    fn test_small_debts_kept_next_to_large_ones() {
        let agg = aggregate(
            &[expense(1e9, "A", &["B"]), expense(800.0, "C", &["D"])],
            &LiteralResolver,
        );
        let transfers = SettlementPlanner::default().plan(&agg.balances).unwrap();

        assert_eq!(
            transfers,
            vec![
                SettlementTransfer::new("B", "A", 5e8),
                SettlementTransfer::new("D", "C", 400.0),
            ]
        );
    }

    #[test]
    fn test_small_debtor_paired_with_large_creditor() {
        let map = balances(&[("A", 1_000_400.0), ("B", -1_000_000.0), ("C", -400.0)]);
        let transfers = SettlementPlanner::default().plan(&map).unwrap();

        assert_eq!(
            transfers,
            vec![
                SettlementTransfer::new("B", "A", 1_000_000.0),
                SettlementTransfer::new("C", "A", 400.0),
            ]
        );
    }

    #[test]
    fn test_overflowing_balances_are_logic_error() {
        let agg = aggregate(
            &[expense(1e308, "A", &["B"]), expense(1e308, "A", &["B"])],
            &LiteralResolver,
        );
        assert!(!agg.balances["A"].net_balance.is_finite());

        let err = SettlementPlanner::default().plan(&agg.balances).unwrap_err();
        assert!(err.is_logic());

        let map = balances(&[("A", f64::NAN), ("B", -1.0)]);
        assert!(SettlementPlanner::default().plan(&map).unwrap_err().is_logic());
    }

    #[test]
    fn test_deterministic() {
        let expenses = vec![
            expense(100.0, "A", &["B", "C"]),
            expense(45.5, "C", &["A"]),
            expense(12.0, "B", &["A", "C", "D"]),
        ];
        let planner = SettlementPlanner::default();

        let first = aggregate(&expenses, &LiteralResolver);
        let second = aggregate(&expenses, &LiteralResolver);
        assert_eq!(first, second);
        assert_eq!(
            planner.plan(&first.balances).unwrap(),
            planner.plan(&second.balances).unwrap()
        );
    }
}
