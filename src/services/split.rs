//! Split service
//!
//! Feeds stored expenses and the directories into the settlement engine and
//! records transfers reported as paid.

use std::sync::Arc;

use crate::error::{TripsplitError, TripsplitResult};
use crate::models::{SettlementTransfer, SharedExpense};
use crate::storage::Storage;

use super::engine::{SettlementEngine, SettlementOutcome};
use super::identity::{DirectoryResolver, IdentityResolver};

/// Service that computes balances and settlement plans from storage
pub struct SplitService<'a> {
    storage: &'a Storage,
    engine: &'a SettlementEngine,
}

impl<'a> SplitService<'a> {
    pub fn new(storage: &'a Storage, engine: &'a SettlementEngine) -> Self {
        Self { storage, engine }
    }

    /// Expenses in scope: one trip, or everything when `trip` is None
    pub fn expenses(&self, trip: Option<&str>) -> TripsplitResult<Vec<SharedExpense>> {
        match trip {
            Some(trip) => self.storage.expenses.get_by_trip(trip),
            None => self.storage.expenses.get_all(),
        }
    }

    /// Resolve a single identifier against the current directories
    pub fn resolve(&self, id: &str) -> TripsplitResult<String> {
        let members = self.storage.members.get_all()?;
        let contacts = self.storage.contacts.get_all()?;
        Ok(DirectoryResolver::new(&members, &contacts).resolve(id))
    }

    /// Balances, transfers and skipped expenses for the given scope
    pub fn outcome(&self, trip: Option<&str>) -> TripsplitResult<Arc<SettlementOutcome>> {
        let expenses = self.expenses(trip)?;
        let members = self.storage.members.get_all()?;
        let contacts = self.storage.contacts.get_all()?;

        let resolver = DirectoryResolver::new(&members, &contacts);
        self.engine.compute(&expenses, &resolver)
    }

    /// Record that `debtor` paid `creditor`
    ///
    /// Only an audit entry is written; balances keep being derived from the
    /// expenses. The returned flag tells whether the transfer is part of the
    /// current plan.
    pub fn mark_paid(
        &self,
        debtor: &str,
        creditor: &str,
        amount: f64,
        trip: Option<&str>,
    ) -> TripsplitResult<(SettlementTransfer, bool)> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(TripsplitError::Validation(format!(
                "Payment amount must be a positive number, got {}",
                amount
            )));
        }

        let debtor = self.resolve(debtor)?;
        let creditor = self.resolve(creditor)?;
        if debtor.is_empty() || creditor.is_empty() {
            return Err(TripsplitError::Validation(
                "Debtor and creditor are required".into(),
            ));
        }
        if debtor == creditor {
            return Err(TripsplitError::Validation(format!(
                "{} cannot pay themselves",
                debtor
            )));
        }

        let outcome = self.outcome(trip)?;
        let tolerance = self.engine.planner().balance_tolerance(amount).max(0.005);
        let planned = outcome.transfers.iter().any(|t| {
            t.debtor == debtor
                && t.creditor == creditor
                && (t.amount - amount).abs() <= tolerance
        });

        let transfer = SettlementTransfer::new(debtor, creditor, amount);
        let note = match trip {
            Some(trip) => format!("Trip: {}", trip),
            None => "All expenses".to_string(),
        };
        let note = if planned {
            note
        } else {
            format!("{} (not in current plan)", note)
        };

        self.storage.log_settle(
            format!("{}->{}", transfer.debtor, transfer.creditor),
            &transfer,
            Some(note),
        )?;

        Ok((transfer, planned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::TripsplitPaths;
    use crate::models::FamilyMember;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TripsplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add(storage: &Storage, expense: SharedExpense) {
        storage.expenses.upsert(expense).unwrap();
    }

    #[test]
    fn test_outcome_for_trip() {
        let (_temp_dir, storage) = create_test_storage();
        add(
            &storage,
            SharedExpense::new(90.0, "A", vec!["B".into(), "C".into()]).with_trip("Rome"),
        );
        add(&storage, SharedExpense::new(500.0, "B", vec!["A".into()]));

        let engine = SettlementEngine::default();
        let service = SplitService::new(&storage, &engine);
        let outcome = service.outcome(Some("rome")).unwrap();

        assert_eq!(outcome.transfers.len(), 2);
        assert!((outcome.balances["A"].net_balance - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_outcome_resolves_member_ids() {
        let (_temp_dir, storage) = create_test_storage();
        let alice = FamilyMember::new("Alice");
        storage.members.upsert(alice.clone()).unwrap();
        add(
            &storage,
            SharedExpense::new(40.0, alice.id.to_string(), vec!["Bob".into()]),
        );

        let engine = SettlementEngine::default();
        let outcome = SplitService::new(&storage, &engine).outcome(None).unwrap();

        assert!(outcome.balances.contains_key("Alice"));
        assert_eq!(outcome.transfers[0].to_string(), "Bob owes Alice 20.00");
    }

    #[test]
    fn test_mark_paid_writes_audit_only() {
        let (_temp_dir, storage) = create_test_storage();
        add(&storage, SharedExpense::new(100.0, "A", vec!["B".into()]));

        let engine = SettlementEngine::default();
        let service = SplitService::new(&storage, &engine);

        let (transfer, planned) = service.mark_paid("B", "A", 50.0, None).unwrap();
        assert!(planned);
        assert_eq!(transfer.amount, 50.0);

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Settle);

        // Balances are unchanged
        let outcome = service.outcome(None).unwrap();
        assert_eq!(outcome.transfers.len(), 1);
    }

    #[test]
    fn test_mark_paid_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let engine = SettlementEngine::default();
        let service = SplitService::new(&storage, &engine);

        assert!(service.mark_paid("A", "B", 0.0, None).unwrap_err().is_validation());
        assert!(service.mark_paid("A", "A", 5.0, None).unwrap_err().is_validation());

        let (_, planned) = service.mark_paid("A", "B", 5.0, None).unwrap();
        assert!(!planned);
    }
}
