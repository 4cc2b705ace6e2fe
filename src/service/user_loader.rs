use crate::db::models::NewUser;
use crate::db::users::CredentialStore;
use crate::error::StockroomError;
use std::{fs, path::Path};
use tracing::{info, warn};

/// Read `username,password,first_name,last_name` lines from `path`.
///
/// A missing file yields an empty list. Blank lines are skipped, malformed
/// lines are logged and skipped.
pub fn load_from_file(path: &Path) -> Result<Vec<NewUser>, StockroomError> {
    if !path.exists() {
        info!(path = %path.display(), "users file not found; skipping load");
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)?;
    let loaded = contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(idx, line)| {
            parse_line(line)
                .inspect_err(|fields| {
                    warn!(
                        path = %path.display(),
                        line = idx + 1,
                        fields,
                        "expected 4 comma separated fields; skipping"
                    );
                })
                .ok()
        })
        .collect();

    Ok(loaded)
}

/// Split one line into a user; on failure returns the field count seen.
fn parse_line(line: &str) -> Result<NewUser, usize> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    let [username, password, first_name, last_name] = fields.as_slice() else {
        return Err(fields.len());
    };
    Ok(NewUser {
        username: username.to_string(),
        password: password.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    })
}

/// Add every user, skipping names that already exist. Returns how many were added.
pub async fn seed(store: &CredentialStore, users: Vec<NewUser>) -> Result<usize, StockroomError> {
    let mut added = 0;
    for user in users {
        match store
            .add_user(&user.username, &user.password, &user.first_name, &user.last_name)
            .await
        {
            Ok(()) => added += 1,
            Err(StockroomError::UserExists(username)) => {
                info!(username, "user already present; skipping");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(added)
}
