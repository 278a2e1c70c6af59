use crate::errors::FixtureError;
use crate::types::Credential;
use std::path::Path;
use tracing::debug;

/// Header of the column holding usernames in the CSV fixture.
pub const USERNAME_COLUMN: &str = "Username";

const USERNAMES_FILE: &str = "usernames.csv";
const PASSWORD_FILE: &str = "password.txt";
const NEW_PASSWORD_FILE: &str = "new_password.txt";

/// Parses a CSV file with a header row and returns the `Username` column in
/// file order. Duplicates and ordering are preserved; nothing is cached, so
/// repeated calls re-read from disk.
pub fn load_usernames(path: &Path) -> Result<Vec<Credential>, FixtureError> {
    let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let headers = reader.headers().map_err(|source| FixtureError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    let column = headers
        .iter()
        .position(|h| h == USERNAME_COLUMN)
        .ok_or_else(|| FixtureError::MissingColumn {
            path: path.to_path_buf(),
            column: USERNAME_COLUMN.to_string(),
        })?;

    let mut credentials = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| FixtureError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(username) = record.get(column) {
            credentials.push(Credential::new(username));
        }
    }

    if credentials.is_empty() {
        return Err(FixtureError::Empty {
            path: path.to_path_buf(),
        });
    }

    debug!(count = credentials.len(), path = %path.display(), "loaded usernames");
    Ok(credentials)
}

/// Reads a single-value secret file, trimming surrounding whitespace. An
/// empty or all-whitespace file is treated the same as a missing record.
pub fn load_secret(path: &Path) -> Result<String, FixtureError> {
    let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let secret = content.trim();
    if secret.is_empty() {
        return Err(FixtureError::EmptySecret {
            path: path.to_path_buf(),
        });
    }

    Ok(secret.to_string())
}

/// All three fixtures a run needs, loaded once at suite start from a data
/// directory laid out as `usernames.csv` / `password.txt` / `new_password.txt`.
#[derive(Debug, Clone)]
pub struct FixtureSet {
    pub credentials: Vec<Credential>,
    pub initial_password: String,
    pub new_password: String,
}

impl FixtureSet {
    pub fn load(data_dir: &Path) -> Result<Self, FixtureError> {
        let credentials = load_usernames(&data_dir.join(USERNAMES_FILE))?;
        let initial_password = load_secret(&data_dir.join(PASSWORD_FILE))?;
        let new_password = load_secret(&data_dir.join(NEW_PASSWORD_FILE))?;
        Ok(Self {
            credentials,
            initial_password,
            new_password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn usernames_preserve_order_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "usernames.csv",
            "Id,Username\n1,a@x.com\n2,b@x.com\n3,a@x.com\n",
        );

        let credentials = load_usernames(&path).unwrap();
        let names: Vec<_> = credentials.iter().map(|c| c.username.as_str()).collect();
        assert_eq!(names, vec!["a@x.com", "b@x.com", "a@x.com"]);
    }

    #[test]
    fn usernames_reload_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "usernames.csv", "Username\nfirst\nsecond\n");

        let once = load_usernames(&path).unwrap();
        let twice = load_usernames(&path).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_usernames_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_usernames(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, FixtureError::Unreadable { .. }));
    }

    #[test]
    fn missing_username_column_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "usernames.csv", "Email,Name\na@x.com,A\n");
        let err = load_usernames(&path).unwrap_err();
        assert!(matches!(err, FixtureError::MissingColumn { .. }));
    }

    #[test]
    fn zero_data_rows_fail_fast() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "usernames.csv", "Username\n");
        let err = load_usernames(&path).unwrap_err();
        assert!(matches!(err, FixtureError::Empty { .. }));
    }

    #[test]
    fn secret_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "password.txt", "  S3cret!\n");
        assert_eq!(load_secret(&path).unwrap(), "S3cret!");
    }

    #[test]
    fn missing_secret_file_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_secret(&dir.path().join("password.txt")).unwrap_err();
        assert!(matches!(err, FixtureError::Unreadable { .. }));
    }

    #[test]
    fn blank_secret_is_rejected_as_empty_secret() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "password.txt", "   \n\n");
        let err = load_secret(&path).unwrap_err();
        assert!(matches!(err, FixtureError::EmptySecret { .. }));
        assert!(err.to_string().contains("secret file"));
    }

    #[test]
    fn fixture_set_loads_all_three_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "usernames.csv", "Username\na@x.com\n");
        write(dir.path(), "password.txt", "P0\n");
        write(dir.path(), "new_password.txt", "P1\n");

        let fixtures = FixtureSet::load(dir.path()).unwrap();
        assert_eq!(fixtures.credentials.len(), 1);
        assert_eq!(fixtures.initial_password, "P0");
        assert_eq!(fixtures.new_password, "P1");
    }
}
