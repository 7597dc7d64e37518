//! CSV rendering of Outscan user records.
//!
//! Columns are fixed and written in API order. File targets are written to a
//! temporary sibling first and renamed into place, so a failed run never
//! leaves a truncated export behind.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use outscan_backend::UserRecord;
use tempfile::NamedTempFile;

/// Raised with `--fail-on-empty` when the listing has no users
#[derive(Debug, thiserror::Error)]
#[error("Outscan returned no users; nothing exported")]
pub struct EmptyExport;

pub const HEADER: [&str; 5] = ["FullName", "Email", "SuperUser", "SWATLIST", "SWATAPPLICATIONS"];

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

fn row(user: &UserRecord) -> [&str; 5] {
    [
        &user.vcfullname,
        &user.vcemail,
        &user.superuser,
        &user.swatlist,
        &user.swatapplications,
    ]
}

/// Write the header and one row per user. Returns the number of data rows.
pub fn write_users<W: Write>(users: &[UserRecord], writer: W) -> Result<usize> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);

    csv_writer
        .write_record(HEADER)
        .context("Writing CSV header")?;
    for user in users {
        csv_writer
            .write_record(row(user))
            .with_context(|| format!("Writing row for {}", user.vcemail))?;
    }
    csv_writer.flush().context("Flushing CSV output")?;

    Ok(users.len())
}

/// Export to `path`, replacing any existing file, or to stdout for `-`.
pub fn export_to_path(users: &[UserRecord], path: &Path) -> Result<usize> {
    if is_dash(path) {
        let stdout = io::stdout();
        return write_users(users, stdout.lock());
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Creating temporary file in {}", dir.display()))?;
    let rows = write_users(users, io::BufWriter::new(temp.as_file_mut()))?;
    temp.persist(path)
        .with_context(|| format!("Writing output file {}", path.display()))?;

    log::info!("Wrote {} rows to {}", rows, path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn user(name: &str, email: &str, superuser: &str, list: &str, apps: &str) -> UserRecord {
        UserRecord {
            vcfullname: name.to_string(),
            vcemail: email.to_string(),
            superuser: superuser.to_string(),
            swatlist: list.to_string(),
            swatapplications: apps.to_string(),
        }
    }

    fn render(users: &[UserRecord]) -> String {
        let mut buf = Vec::new();
        write_users(users, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_known_record_line() {
        let output = render(&[user("Jane Doe", "jane@x.com", "0", "L1", "A1")]);
        assert_eq!(
            output,
            "FullName,Email,SuperUser,SWATLIST,SWATAPPLICATIONS\nJane Doe,jane@x.com,0,L1,A1\n"
        );
    }

    #[test]
    fn test_empty_list_writes_header_only() {
        assert_eq!(
            render(&[]),
            "FullName,Email,SuperUser,SWATLIST,SWATAPPLICATIONS\n"
        );
    }

    #[test]
    fn test_row_count_and_order() {
        let users: Vec<UserRecord> = (0..25)
            .map(|i| user(&format!("User {i}"), &format!("u{i}@x.com"), "0", "", ""))
            .collect();

        let output = render(&users);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), users.len() + 1);
        assert_eq!(lines[1], "User 0,u0@x.com,0,,");
        assert_eq!(lines[25], "User 24,u24@x.com,0,,");
    }

    #[test]
    fn test_special_characters_round_trip() {
        let users = vec![
            user("Doe, Jane", "jane@x.com", "1", "L1,L2", "A \"quoted\" app"),
            user("Multi\nLine", "m@x.com", "0", "", "A1"),
        ];

        let output = render(&users);
        assert!(output.contains("\"Doe, Jane\""));

        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), HEADER);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Doe, Jane");
        assert_eq!(&rows[0][3], "L1,L2");
        assert_eq!(&rows[0][4], "A \"quoted\" app");
        assert_eq!(&rows[1][0], "Multi\nLine");
    }

    #[test]
    fn test_export_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SWAT.csv");
        fs::write(&path, "stale contents that are longer than the new export\n".repeat(10)).unwrap();

        let rows = export_to_path(&[user("Jane Doe", "jane@x.com", "0", "L1", "A1")], &path).unwrap();

        assert_eq!(rows, 1);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "FullName,Email,SuperUser,SWATLIST,SWATAPPLICATIONS\nJane Doe,jane@x.com,0,L1,A1\n"
        );
        // no temporary files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_export_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("SWAT.csv");

        assert!(export_to_path(&[], &path).is_err());
        assert!(!path.exists());
    }
}
