use std::fs;
use std::io;
use std::path::Path;

/// Reads `path` into a string, treating a missing file as `None` rather than
/// an error. Any other I/O failure is returned as-is.
pub fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) => match e.kind() {
            io::ErrorKind::NotFound => Ok(None),
            _ => Err(e),
        },
    }
}

/// Writes `contents` to `path`, creating the parent directory if needed and
/// replacing any existing file.
pub fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_optional_missing() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        assert_eq!(None, read_optional(&dir.path().join("nope.html"))?);
        Ok(())
    }

    #[test]
    fn test_write_file_creates_parent() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("a").join("b.html");
        write_file(&path, "<p>hi</p>")?;
        assert_eq!(Some("<p>hi</p>".to_owned()), read_optional(&path)?);
        Ok(())
    }
}
