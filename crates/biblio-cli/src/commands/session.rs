//! Login and logout command handlers

use std::io::{self, Write};

use anyhow::{bail, Result};

use biblio_core::{HttpLibraryService, LibraryManager};

use crate::output::Output;

/// Log in against the backend and store the session locally
pub async fn login(
    manager: &LibraryManager,
    service: &HttpLibraryService,
    username: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password()?,
    };

    let ok = service.login(&username, &password).await?;
    if !ok {
        bail!("Login failed: invalid username or password");
    }

    manager.set_session(&username)?;
    output.success(&format!("Logged in as {}", username));

    // Pull the backend library straight away so the shelves reflect it
    if manager.sync_with_backend().await? {
        let total = manager.shelves().total();
        output.message(&format!("Fetched {} books from the backend", total));
    }

    Ok(())
}

/// Clear the stored session
pub fn logout(manager: &LibraryManager, output: &Output) -> Result<()> {
    if manager.session().is_none() {
        output.message("Not logged in.");
        return Ok(());
    }

    manager.clear_session()?;
    output.success("Logged out");
    Ok(())
}

fn prompt_password() -> Result<String> {
    print!("Password: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let password = input.trim_end_matches(['\r', '\n']).to_string();

    if password.is_empty() {
        bail!("Password cannot be empty");
    }
    Ok(password)
}
