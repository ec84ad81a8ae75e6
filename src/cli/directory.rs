//! Family member and contact CLI commands

use clap::Subcommand;

use crate::display::{format_contact_list, format_member_list};
use crate::error::{TripsplitError, TripsplitResult};
use crate::services::DirectoryService;
use crate::storage::Storage;

/// Family member subcommands
#[derive(Subcommand)]
pub enum MemberCommands {
    /// Add a family member
    Add {
        /// Member name
        name: String,
    },
    /// List family members
    List,
    /// Remove a family member
    Remove {
        /// Member ID or name
        member: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Contact subcommands
#[derive(Subcommand)]
pub enum ContactCommands {
    /// Add a contact
    Add {
        /// Contact name
        name: String,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
    },
    /// List contacts
    List,
    /// Remove a contact
    Remove {
        /// Contact ID, email or name
        contact: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a family member command
pub fn handle_member_command(storage: &Storage, cmd: MemberCommands) -> TripsplitResult<()> {
    let service = DirectoryService::new(storage);

    match cmd {
        MemberCommands::Add { name } => {
            let member = service.add_member(&name)?;
            println!("Added family member: {} ({})", member.name, member.id);
        }

        MemberCommands::List => {
            let members = service.list_members()?;
            print!("{}", format_member_list(&members));
            if members.is_empty() {
                println!();
            }
        }

        MemberCommands::Remove { member, force } => {
            let found = storage
                .members
                .find(&member)?
                .ok_or_else(|| TripsplitError::member_not_found(&member))?;

            if !force {
                println!("About to remove family member: {}", found.name);
                println!("Expenses that reference this member will show the raw ID afterwards.");
                println!("Use --force to confirm removal");
                return Ok(());
            }

            let removed = service.remove_member(&found.id.to_string())?;
            println!("Removed family member: {}", removed.name);
        }
    }

    Ok(())
}

/// Handle a contact command
pub fn handle_contact_command(storage: &Storage, cmd: ContactCommands) -> TripsplitResult<()> {
    let service = DirectoryService::new(storage);

    match cmd {
        ContactCommands::Add { name, email } => {
            let contact = service.add_contact(&name, email.as_deref())?;
            println!("Added contact: {} ({})", contact, contact.id);
        }

        ContactCommands::List => {
            let contacts = service.list_contacts()?;
            print!("{}", format_contact_list(&contacts));
            if contacts.is_empty() {
                println!();
            }
        }

        ContactCommands::Remove { contact, force } => {
            let found = storage
                .contacts
                .find(&contact)?
                .ok_or_else(|| TripsplitError::contact_not_found(&contact))?;

            if !force {
                println!("About to remove contact: {}", found);
                println!("Use --force to confirm removal");
                return Ok(());
            }

            let removed = service.remove_contact(&found.id.to_string())?;
            println!("Removed contact: {}", removed.name);
        }
    }

    Ok(())
}
