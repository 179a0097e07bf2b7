//! Book command handlers

use anyhow::{bail, Context, Result};

use biblio_core::{BookEntry, LibraryManager, Shelf};

use crate::output::Output;

/// Add a book to a shelf
pub fn add(
    manager: &LibraryManager,
    external_id: String,
    title: String,
    authors: Vec<String>,
    cover: Option<String>,
    shelf: Shelf,
    output: &Output,
) -> Result<()> {
    let mut entry = BookEntry::new(external_id.clone(), title.clone()).with_authors(authors);
    if let Some(url) = cover {
        entry = entry.with_cover(url);
    }

    let added = manager.add_book(entry, shelf)?;
    if added {
        output.success(&format!("Added \"{}\" to {}", title, shelf));
    } else {
        output.message(&format!("{} is already shelved", external_id));
    }

    Ok(())
}

/// List shelved books
pub fn list(manager: &LibraryManager, shelf: Option<Shelf>, output: &Output) -> Result<()> {
    let state = manager.shelves();
    output.print_shelves(&state, shelf);
    Ok(())
}

/// Remove a book from whichever shelf holds it
pub fn remove(manager: &LibraryManager, external_id: String, output: &Output) -> Result<()> {
    let removed = manager.remove_book(&external_id)?;
    if !removed {
        bail!("No shelved book with id '{}'", external_id);
    }
    output.success(&format!("Removed {}", external_id));
    Ok(())
}

/// Update reading progress for an in-progress book
pub fn progress(
    manager: &LibraryManager,
    external_id: String,
    value: i64,
    output: &Output,
) -> Result<()> {
    let updated = manager.update_progress(&external_id, value)?;
    if !updated {
        bail!(
            "No in-progress book with id '{}'. Progress applies to the current shelf only.",
            external_id
        );
    }

    let clamped = value.clamp(0, 100);
    output.success(&format!("Progress for {} set to {}%", external_id, clamped));
    Ok(())
}

/// Write the shelf state as JSON to a file, or stdout for "-"
pub fn export(manager: &LibraryManager, path: String, output: &Output) -> Result<()> {
    let state = manager.shelves();
    let json = serde_json::to_string_pretty(&state)?;

    if path == "-" {
        println!("{}", json);
        return Ok(());
    }

    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path))?;
    output.success(&format!("Exported {} books to {}", state.total(), path));
    Ok(())
}

/// Remove all shelved books
pub fn clear(manager: &LibraryManager, yes: bool, output: &Output) -> Result<()> {
    if !yes {
        bail!("This removes every shelved book. Re-run with --yes to confirm.");
    }
    manager.clear()?;
    output.success("Cleared all shelves");
    Ok(())
}
