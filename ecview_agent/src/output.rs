//! Writes the current sample line so readers never see a partial write.

use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

/// Write to a sibling temp file, then rename over `path`.
pub fn write_sample(path: &Path, line: &str) -> io::Result<()> {
    let tmp = sibling_tmp(path);
    fs::write(&tmp, line)?;
    fs::rename(&tmp, path)
}

fn sibling_tmp(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("sample"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_previous_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed");
        write_sample(&path, "1 2 3 4\n").unwrap();
        write_sample(&path, "2 5 6 7\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "2 5 6 7\n");
        assert!(!dir.path().join("feed.tmp").exists());
    }
}
