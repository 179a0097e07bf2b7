//! Status command handler

use anyhow::Result;

use biblio_core::{Config, LibraryManager, Shelf};

use crate::output::{Output, OutputFormat};

/// Show session, backend, and shelf information
pub fn show(manager: &LibraryManager, config: &Config, output: &Output) -> Result<()> {
    let state = manager.shelves();
    let session = manager.session();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "user": session.as_ref().map(|s| s.id.clone()),
                    "api_url": config.api_url,
                    "data_dir": config.data_dir,
                    "library_file": config.library_path(),
                    "counts": {
                        "current": state.shelf(Shelf::InProgress).len(),
                        "want": state.shelf(Shelf::WishedFor).len(),
                        "finished": state.shelf(Shelf::Completed).len(),
                        "total": state.total()
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", state.total());
        }
        OutputFormat::Human => {
            println!("BiblioDrift Status");
            println!("==================");
            println!();
            println!("Session:");
            match session {
                Some(s) => println!("  Logged in as {}", s.id),
                None => println!("  Not logged in"),
            }
            println!();
            println!("Backend:");
            println!("  URL: {}", config.api_url);
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Library:  {}", config.library_path().display());
            println!();
            println!("Shelves:");
            for shelf in Shelf::ALL {
                println!("  {:12} {}", format!("{}:", shelf), state.shelf(shelf).len());
            }
            println!("  {:12} {}", "total:", state.total());
        }
    }

    Ok(())
}
