//! Expense display formatting
//!
//! Register-style lists and detail views for shared expenses. Participant
//! ids are shown through the resolver so directory names appear instead of
//! raw ids.

use crate::models::SharedExpense;
use crate::services::identity::IdentityResolver;

use super::format::{format_amount, truncate};

/// Format a single expense as a register row
pub fn format_expense_row<R>(expense: &SharedExpense, resolver: &R, symbol: &str) -> String
where
    R: IdentityResolver + ?Sized,
{
    let description = if expense.description.is_empty() {
        "(no description)".to_string()
    } else {
        expense.description.clone()
    };

    format!(
        "{:<12} {} {:<24} {:>12}  {:<14} {}",
        expense.id.to_string(),
        expense.date.format("%Y-%m-%d"),
        truncate(&description, 24),
        format_amount(expense.total_amount, symbol),
        truncate(&resolver.resolve(&expense.payer_id), 14),
        expense.trip.as_deref().unwrap_or("")
    )
}

/// Format a list of expenses as a register
pub fn format_expense_register<R>(expenses: &[SharedExpense], resolver: &R, symbol: &str) -> String
where
    R: IdentityResolver + ?Sized,
{
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:<10} {:<24} {:>12}  {:<14} {}\n",
        "ID", "Date", "Description", "Amount", "Paid by", "Trip"
    ));
    output.push_str(&"-".repeat(84));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format_expense_row(expense, resolver, symbol));
        output.push('\n');
    }

    output
}

/// Format expense details for display
pub fn format_expense_details<R>(expense: &SharedExpense, resolver: &R, symbol: &str) -> String
where
    R: IdentityResolver + ?Sized,
{
    let mut output = String::new();

    output.push_str(&format!("Expense:      {}\n", expense.id));
    output.push_str(&format!("Date:         {}\n", expense.date.format("%Y-%m-%d")));
    output.push_str(&format!(
        "Amount:       {}\n",
        format_amount(expense.total_amount, symbol)
    ));
    if !expense.description.is_empty() {
        output.push_str(&format!("Description:  {}\n", expense.description));
    }
    if let Some(trip) = &expense.trip {
        output.push_str(&format!("Trip:         {}\n", trip));
    }
    output.push_str(&format!(
        "Paid by:      {}\n",
        resolver.resolve(&expense.payer_id)
    ));

    if expense.participant_ids.is_empty() {
        output.push_str("Shared with:  (nobody, personal expense)\n");
    } else {
        let names: Vec<String> = expense
            .participant_ids
            .iter()
            .map(|id| resolver.resolve(id))
            .collect();
        output.push_str(&format!("Shared with:  {}\n", names.join(", ")));
    }

    output.push_str(&format!(
        "Created:      {}\n",
        expense.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::identity::LiteralResolver;

    #[test]
    fn test_register() {
        let expenses = vec![
            SharedExpense::new(90.0, "alice", vec!["bob".into()])
                .with_description("Dinner")
                .with_trip("Rome"),
        ];
        let output = format_expense_register(&expenses, &LiteralResolver, "$");

        assert!(output.contains("Description"));
        assert!(output.contains("Dinner"));
        assert!(output.contains("$90.00"));
        assert!(output.contains("Rome"));
    }

    #[test]
    fn test_empty_register() {
        assert_eq!(
            format_expense_register(&[], &LiteralResolver, "$"),
            "No expenses found.\n"
        );
    }

    #[test]
    fn test_details_use_resolver() {
        let expense = SharedExpense::new(40.0, "m1", vec!["m2".into()]);
        let resolver = |id: &str| match id {
            "m1" => "Alice".to_string(),
            "m2" => "Bob".to_string(),
            other => other.to_string(),
        };

        let output = format_expense_details(&expense, &resolver, "$");
        assert!(output.contains("Paid by:      Alice"));
        assert!(output.contains("Shared with:  Bob"));
    }
}
