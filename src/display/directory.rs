//! Family member and contact display formatting

use crate::models::{Contact, FamilyMember};

/// Format the family member list
pub fn format_member_list(members: &[FamilyMember]) -> String {
    if members.is_empty() {
        return "No family members found.".to_string();
    }

    let name_width = members
        .iter()
        .map(|m| m.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<name_width$}\n",
        "ID",
        "Name",
        name_width = name_width
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}\n",
        "",
        "",
        name_width = name_width
    ));

    for member in members {
        output.push_str(&format!(
            "{:<12}  {:<name_width$}\n",
            member.id.to_string(),
            member.name,
            name_width = name_width
        ));
    }

    output
}

/// Format the contact list
pub fn format_contact_list(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return "No contacts found.".to_string();
    }

    let name_width = contacts
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<name_width$}  {}\n",
        "ID",
        "Name",
        "Email",
        name_width = name_width
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}  {:-<5}\n",
        "",
        "",
        "",
        name_width = name_width
    ));

    for contact in contacts {
        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {}\n",
            contact.id.to_string(),
            contact.name,
            contact.email.as_deref().unwrap_or("-"),
            name_width = name_width
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_list() {
        let members = vec![FamilyMember::new("Alice"), FamilyMember::new("Ben")];
        let output = format_member_list(&members);

        assert!(output.contains("Alice"));
        assert!(output.contains(&members[1].id.to_string()));
        assert_eq!(format_member_list(&[]), "No family members found.");
    }

    #[test]
    fn test_contact_list() {
        let contacts = vec![
            Contact::new("Carol", Some("carol@example.com".into())),
            Contact::new("Dave", None),
        ];
        let output = format_contact_list(&contacts);

        assert!(output.contains("carol@example.com"));
        assert!(output.contains("Dave"));
    }
}
