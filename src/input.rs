use std::{
    io,
    path::{Path, PathBuf},
};

use itertools::Itertools;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("The identifier file {0:?} does not exist.")]
    NotFound(PathBuf),
    #[error("An I/O error occurred when reading the identifier file: {0}")]
    IOError(io::Error),
    #[error("The identifier file {0:?} lists no account.")]
    Empty(PathBuf),
}

/// Reads one `name#tag` per line; fails if none remain.
pub fn read_identifiers(path: &Path) -> Result<Vec<String>, InputError> {
    let text = fs_err::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => InputError::NotFound(path.to_owned()),
        _ => InputError::IOError(e),
    })?;
    let identifiers = parse_identifiers(&text);
    if identifiers.is_empty() {
        return Err(InputError::Empty(path.to_owned()));
    }
    Ok(identifiers)
}

/// Trimmed lines, skipping blank ones and `#` comments.
pub fn parse_identifiers(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::{parse_identifiers, read_identifiers, InputError};

    #[test]
    fn skips_blanks_and_comments() {
        let text = "# accounts\nkarlphets#NA1\n\n   \n  Foo  \r\n#Bar#NA1\n  # indented comment\nBaz#EUW\n";
        assert_eq!(parse_identifiers(text), ["karlphets#NA1", "Foo", "Baz#EUW"]);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.txt");
        assert!(matches!(
            read_identifiers(&path),
            Err(InputError::NotFound(p)) if p == path
        ));
    }

    #[test]
    fn empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.txt");
        fs_err::write(&path, "# nothing yet\n\n").unwrap();
        assert!(matches!(read_identifiers(&path), Err(InputError::Empty(_))));
    }

    #[test]
    fn reads_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.txt");
        fs_err::write(&path, "b#NA1\na#NA1\n").unwrap();
        assert_eq!(read_identifiers(&path).unwrap(), ["b#NA1", "a#NA1"]);
    }
}
