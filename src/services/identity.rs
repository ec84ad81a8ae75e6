//! Identity resolution
//!
//! Maps a raw participant identifier to the display name the rest of the
//! engine keys balances by. Resolution never fails: an identifier nobody
//! recognizes is used verbatim.

use crate::models::{Contact, FamilyMember};

/// Maps raw participant identifiers to canonical display names
pub trait IdentityResolver {
    fn resolve(&self, id: &str) -> String;
}

impl<F> IdentityResolver for F
where
    F: Fn(&str) -> String,
{
    fn resolve(&self, id: &str) -> String {
        self(id)
    }
}

/// Resolver that treats every identifier as its own display name
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralResolver;

impl IdentityResolver for LiteralResolver {
    fn resolve(&self, id: &str) -> String {
        id.trim().to_string()
    }
}

/// Resolver backed by the family-member and contact directories
///
/// Order: family member id, then contact email or name, then the raw id.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryResolver<'a> {
    members: &'a [FamilyMember],
    contacts: &'a [Contact],
}

impl<'a> DirectoryResolver<'a> {
    pub fn new(members: &'a [FamilyMember], contacts: &'a [Contact]) -> Self {
        Self { members, contacts }
    }
}

impl IdentityResolver for DirectoryResolver<'_> {
    fn resolve(&self, id: &str) -> String {
        let id = id.trim();

        if let Some(member) = self.members.iter().find(|m| m.id.matches(id)) {
            return member.name.clone();
        }

        if let Some(contact) = self.contacts.iter().find(|c| c.matches(id)) {
            return contact.name.clone();
        }

        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> (Vec<FamilyMember>, Vec<Contact>) {
        let members = vec![FamilyMember::new("Alice"), FamilyMember::new("Ben")];
        let contacts = vec![
            Contact::new("Carol", Some("carol@example.com".into())),
            Contact::new("Dave", None),
        ];
        (members, contacts)
    }

    #[test]
    fn test_member_id_resolves_to_name() {
        let (members, contacts) = directory();
        let resolver = DirectoryResolver::new(&members, &contacts);

        assert_eq!(resolver.resolve(&members[0].id.as_uuid().to_string()), "Alice");
        assert_eq!(resolver.resolve(&members[1].id.to_string()), "Ben");
    }

    #[test]
    fn test_contact_email_and_name() {
        let (members, contacts) = directory();
        let resolver = DirectoryResolver::new(&members, &contacts);

        assert_eq!(resolver.resolve("CAROL@example.com"), "Carol");
        assert_eq!(resolver.resolve("dave"), "Dave");
    }

    #[test]
    fn test_unknown_falls_back_to_raw_id() {
        let (members, contacts) = directory();
        let resolver = DirectoryResolver::new(&members, &contacts);

        assert_eq!(resolver.resolve(" stranger@example.com "), "stranger@example.com");
    }

    #[test]
    fn test_member_takes_precedence_over_contact() {
        let member = FamilyMember::new("Alice");
        let contact = Contact::new(member.id.to_string(), None);
        let members = vec![member];
        let contacts = vec![contact];
        let resolver = DirectoryResolver::new(&members, &contacts);

        assert_eq!(resolver.resolve(&members[0].id.to_string()), "Alice");
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |id: &str| id.to_uppercase();
        assert_eq!(resolver.resolve("bob"), "BOB");
        assert_eq!(LiteralResolver.resolve(" bob "), "bob");
    }
}
