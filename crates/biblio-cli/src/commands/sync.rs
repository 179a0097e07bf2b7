//! Sync command handler

use anyhow::{bail, Result};

use biblio_core::LibraryManager;

use crate::output::Output;

/// Reconcile local shelves with the remote backend
pub async fn sync(manager: &LibraryManager, output: &Output) -> Result<()> {
    let Some(session) = manager.session() else {
        bail!("Not logged in. Run `biblio login <username>` first.");
    };

    output.message(&format!("Syncing library for {}...", session.id));

    let applied = manager.sync_with_backend().await?;
    if applied {
        let total = manager.shelves().total();
        output.success(&format!("Sync complete - {} books shelved", total));
    } else {
        output.success("Sync complete - local shelves kept");
    }

    Ok(())
}
