use std::sync::Arc;

use clap::Subcommand;
use resqlink_core::{ContactBook, ContactDraft, Database, KvContactStore};

#[derive(Subcommand)]
pub enum ContactsAction {
    /// List emergency contacts in alert order
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an emergency contact
    Add {
        name: String,
        phone: String,
        /// Relationship (defaults to "Emergency Contact")
        #[arg(long, default_value = "")]
        relationship: String,
    },
    /// Edit an existing contact; omitted fields keep their value
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        relationship: Option<String>,
    },
    /// Remove a contact
    Remove { id: String },
}

fn book() -> Result<ContactBook, Box<dyn std::error::Error>> {
    let db = Arc::new(Database::open()?);
    Ok(ContactBook::new(Arc::new(KvContactStore::new(db))))
}

pub fn run(action: ContactsAction) -> Result<(), Box<dyn std::error::Error>> {
    let book = book()?;

    match action {
        ContactsAction::List { json } => {
            let contacts = book.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&contacts)?);
            } else if contacts.is_empty() {
                println!("No emergency contacts yet. Add one with `resqlink contacts add`.");
            } else {
                for c in &contacts {
                    println!("{}  {} <{}> ({})", c.id, c.name, c.phone, c.relationship);
                }
            }
        }
        ContactsAction::Add {
            name,
            phone,
            relationship,
        } => {
            let contact = book.add(&ContactDraft::new(name, phone).with_relationship(relationship))?;
            println!("{}", serde_json::to_string_pretty(&contact)?);
        }
        ContactsAction::Edit {
            id,
            name,
            phone,
            relationship,
        } => {
            let current = book
                .list()?
                .into_iter()
                .find(|c| c.id == id)
                .ok_or_else(|| format!("No emergency contact with id '{id}'"))?;
            let draft = ContactDraft::new(
                name.unwrap_or(current.name),
                phone.unwrap_or(current.phone),
            )
            .with_relationship(relationship.unwrap_or(current.relationship));
            let contact = book.update(&id, &draft)?;
            println!("{}", serde_json::to_string_pretty(&contact)?);
        }
        ContactsAction::Remove { id } => {
            let removed = book.remove(&id)?;
            println!("Removed {} ({})", removed.name, removed.id);
        }
    }
    Ok(())
}
