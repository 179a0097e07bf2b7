//! Buy command handler

use anyhow::{bail, Result};

use biblio_core::{purchase_links, LibraryManager};

use crate::output::{Output, OutputFormat};

/// Print retailer purchase links for a shelved book
pub fn links(
    manager: &LibraryManager,
    external_id: String,
    isbn: Option<String>,
    output: &Output,
) -> Result<()> {
    let state = manager.shelves();
    let Some(entry) = state.get(&external_id) else {
        bail!("No shelved book with id '{}'", external_id);
    };

    let author = entry.authors.first().map(String::as_str).unwrap_or("");
    let links = purchase_links(&entry.title, author, isbn.as_deref());
    if links.is_empty() {
        bail!("Nothing to search for: the book has no title");
    }

    match output.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&links)?);
        }
        OutputFormat::Quiet => {
            for link in &links {
                println!("{}", link.url);
            }
        }
        OutputFormat::Human => {
            println!("Where to buy \"{}\":", entry.title);
            for link in &links {
                println!("  {:15} {}", link.name, link.url);
            }
        }
    }

    Ok(())
}
