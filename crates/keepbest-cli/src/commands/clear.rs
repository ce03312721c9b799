use crate::output::Output;
use color_eyre::Result;
use media_dedupe_config::{CredentialStore, PathManager};
use std::fs;

pub async fn run_clear(session: bool, credentials: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();

    if credentials {
        return clear_credentials(&path_manager, output);
    }

    if session {
        return clear_session(&path_manager, output);
    }

    output.warn("No clear option specified. Use --session or --credentials");
    output.println("\nExample: keepbest clear --session");
    Ok(())
}

fn clear_credentials(path_manager: &PathManager, output: &Output) -> Result<()> {
    let credentials_file = path_manager.credentials_file();

    if credentials_file.exists() {
        fs::remove_file(&credentials_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to remove credentials file at {}: {}", credentials_file.display(), e))?;
        output.success(format!("Cleared credentials: {}", credentials_file.display()));
    } else {
        output.info("No credentials file found to clear");
    }

    Ok(())
}

/// Forget the token and user id; the device id survives so the server keeps
/// seeing the same device
fn clear_session(path_manager: &PathManager, output: &Output) -> Result<()> {
    if !path_manager.credentials_file().exists() {
        output.info("No credentials file found, nothing to clear");
        return Ok(());
    }

    let mut cred_store = CredentialStore::new(path_manager.credentials_file());
    cred_store.load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials: {:#}", e))?;

    if cred_store.get_access_token().is_none() && cred_store.get_user_id().is_none() {
        output.info("No stored session to clear");
        return Ok(());
    }

    cred_store.clear_session();
    cred_store.save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {:#}", e))?;
    output.success("Logged out; run 'keepbest login' to sign in again");
    Ok(())
}
