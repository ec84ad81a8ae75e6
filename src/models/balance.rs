//! Per-participant balance and settlement transfer models

use serde::{Deserialize, Serialize};
use std::fmt;

/// What one participant paid and owes across a set of expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantBalance {
    /// Canonical participant name
    pub participant: String,
    /// Sum of amounts this participant paid
    pub total_paid: f64,
    /// Sum of equal shares this participant is responsible for
    pub total_owed: f64,
    /// `total_paid - total_owed`; positive means they are owed money
    pub net_balance: f64,
}

impl ParticipantBalance {
    pub fn new(participant: impl Into<String>) -> Self {
        Self {
            participant: participant.into(),
            total_paid: 0.0,
            total_owed: 0.0,
            net_balance: 0.0,
        }
    }

    /// Recompute the net balance from paid and owed totals
    pub fn refresh_net(&mut self) {
        self.net_balance = self.total_paid - self.total_owed;
    }

    pub fn is_creditor(&self, epsilon: f64) -> bool {
        self.net_balance > epsilon
    }

    pub fn is_debtor(&self, epsilon: f64) -> bool {
        self.net_balance < -epsilon
    }

    pub fn is_settled(&self, epsilon: f64) -> bool {
        self.net_balance.abs() <= epsilon
    }
}

/// One point-to-point payment that moves money from a debtor to a creditor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementTransfer {
    pub debtor: String,
    pub creditor: String,
    pub amount: f64,
}

impl SettlementTransfer {
    pub fn new(debtor: impl Into<String>, creditor: impl Into<String>, amount: f64) -> Self {
        Self {
            debtor: debtor.into(),
            creditor: creditor.into(),
            amount,
        }
    }
}

impl fmt::Display for SettlementTransfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} owes {} {:.2}", self.debtor, self.creditor, self.amount)
    }
}
