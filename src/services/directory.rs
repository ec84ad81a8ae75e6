//! Directory service
//!
//! Manages the family members and contacts that participant identifiers
//! resolve against.

use crate::audit::EntityType;
use crate::error::{TripsplitError, TripsplitResult};
use crate::models::{Contact, FamilyMember};
use crate::storage::Storage;

/// Service for family member and contact management
pub struct DirectoryService<'a> {
    storage: &'a Storage,
}

impl<'a> DirectoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a family member
    pub fn add_member(&self, name: &str) -> TripsplitResult<FamilyMember> {
        let name = name.trim();
        let member = FamilyMember::new(name);
        member
            .validate()
            .map_err(|e| TripsplitError::Validation(e.to_string()))?;

        if self.storage.members.find(name)?.is_some() {
            return Err(TripsplitError::Duplicate {
                entity_type: "Family member",
                identifier: name.to_string(),
            });
        }

        self.storage.members.upsert(member.clone())?;
        self.storage.members.save()?;

        self.storage.log_create(
            EntityType::FamilyMember,
            member.id.to_string(),
            Some(member.name.clone()),
            &member,
        )?;

        Ok(member)
    }

    /// Add a contact
    pub fn add_contact(&self, name: &str, email: Option<&str>) -> TripsplitResult<Contact> {
        let contact = Contact::new(name.trim(), email.map(str::to_string));
        contact
            .validate()
            .map_err(|e| TripsplitError::Validation(e.to_string()))?;

        let clash = self.storage.contacts.find(&contact.name)?.is_some()
            || match &contact.email {
                Some(email) => self.storage.contacts.find(email)?.is_some(),
                None => false,
            };
        if clash {
            return Err(TripsplitError::Duplicate {
                entity_type: "Contact",
                identifier: contact.to_string(),
            });
        }

        self.storage.contacts.upsert(contact.clone())?;
        self.storage.contacts.save()?;

        self.storage.log_create(
            EntityType::Contact,
            contact.id.to_string(),
            Some(contact.name.clone()),
            &contact,
        )?;

        Ok(contact)
    }

    pub fn list_members(&self) -> TripsplitResult<Vec<FamilyMember>> {
        self.storage.members.get_all()
    }

    pub fn list_contacts(&self) -> TripsplitResult<Vec<Contact>> {
        self.storage.contacts.get_all()
    }

    /// Remove a family member by ID or name
    pub fn remove_member(&self, identifier: &str) -> TripsplitResult<FamilyMember> {
        let member = self
            .storage
            .members
            .find(identifier)?
            .ok_or_else(|| TripsplitError::member_not_found(identifier))?;

        self.storage.members.delete(member.id)?;
        self.storage.members.save()?;

        self.storage.log_delete(
            EntityType::FamilyMember,
            member.id.to_string(),
            Some(member.name.clone()),
            &member,
        )?;

        Ok(member)
    }

    /// Remove a contact by ID, email or name
    pub fn remove_contact(&self, identifier: &str) -> TripsplitResult<Contact> {
        let contact = self
            .storage
            .contacts
            .find(identifier)?
            .ok_or_else(|| TripsplitError::contact_not_found(identifier))?;

        self.storage.contacts.delete(contact.id)?;
        self.storage.contacts.save()?;

        self.storage.log_delete(
            EntityType::Contact,
            contact.id.to_string(),
            Some(contact.name.clone()),
            &contact,
        )?;

        Ok(contact)
    }
}
