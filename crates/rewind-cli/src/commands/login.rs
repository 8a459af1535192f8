use super::{load_credentials, prompts};
use crate::output::Output;
use chrono::{Duration, Utc};
use color_eyre::Result;
use rewind_config::{CredentialStore, PathManager};

pub fn run_login(user_id_arg: Option<String>, expires_in_hours: Option<i64>, output: &Output) -> Result<()> {
    let path_manager = PathManager::new().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create configuration directories: {}", e))?;
    let mut cred_store = load_credentials(&path_manager)?;

    let user_id = match user_id_arg {
        Some(id) => id,
        None => {
            let existing = cred_store.get_user_id().cloned();
            prompts::prompt_string("User ID", existing.as_deref())?
        }
    };
    let token = prompts::prompt_secret("Access token")?;

    store_session(&mut cred_store, &user_id, &token, expires_in_hours)?;
    cred_store
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;

    tracing::info!("Stored session for user {}", user_id.trim());
    output.success(format!("Logged in as {}", user_id.trim()));
    Ok(())
}

pub fn run_logout(output: &Output) -> Result<()> {
    let path_manager = PathManager::new().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    if !path_manager.credentials_file().exists() {
        output.info("No stored session");
        return Ok(());
    }

    let mut cred_store = load_credentials(&path_manager)?;
    cred_store.clear_session();
    cred_store
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;
    output.success("Logged out");
    Ok(())
}

fn store_session(
    cred_store: &mut CredentialStore,
    user_id: &str,
    token: &str,
    expires_in_hours: Option<i64>,
) -> Result<()> {
    let user_id = user_id.trim();
    let token = token.trim();
    if user_id.is_empty() {
        return Err(color_eyre::eyre::eyre!("User ID cannot be empty"));
    }
    if token.is_empty() {
        return Err(color_eyre::eyre::eyre!("Access token cannot be empty"));
    }

    cred_store.clear_session();
    cred_store.set_user_id(user_id.to_string());
    cred_store.set_access_token(token.to_string());
    if let Some(hours) = expires_in_hours {
        if hours <= 0 {
            return Err(color_eyre::eyre::eyre!("--expires-in must be positive"));
        }
        let expires = Duration::try_hours(hours)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| color_eyre::eyre::eyre!("--expires-in of {} hours is too large", hours))?;
        cred_store.set_token_expires(expires);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_session_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CredentialStore::new(dir.path().join("credentials.toml"));

        store_session(&mut store, " user-1 ", "token", Some(2)).unwrap();
        let session = store.session().unwrap();
        assert_eq!(session.user_id, "user-1");
        assert!(store.get_token_expires().is_some());
    }

    #[test]
    fn test_store_session_rejects_blank_token() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CredentialStore::new(dir.path().join("credentials.toml"));
        assert!(store_session(&mut store, "user-1", "  ", None).is_err());
    }

    #[test]
    fn test_store_session_rejects_out_of_range_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CredentialStore::new(dir.path().join("credentials.toml"));
        assert!(store_session(&mut store, "user-1", "token", Some(i64::MAX / 1000)).is_err());
        assert!(store_session(&mut store, "user-1", "token", Some(i64::MAX)).is_err());
    }

    #[test]
    fn test_relogin_drops_old_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CredentialStore::new(dir.path().join("credentials.toml"));
        store_session(&mut store, "user-1", "old", Some(1)).unwrap();
        store_session(&mut store, "user-1", "new", None).unwrap();
        assert!(store.get_token_expires().is_none());
    }
}
