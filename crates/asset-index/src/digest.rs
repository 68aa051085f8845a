//! Content digests for asset files
//!
//! A digest is the git blob object id: SHA-1 over `"blob " + size + "\0"`
//! followed by the file content. Clients only see the first
//! [`CONTENT_VERSION_LEN`] hex characters.

use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Hex characters kept in a content version.
pub const CONTENT_VERSION_LEN: usize = 6;

/// Full 40-character blob id of `content`.
pub fn blob_id(content: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("blob {}\0", content.len()).as_bytes());
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Truncated blob id used as the asset's cache-busting version.
pub fn content_version(content: &[u8]) -> String {
    truncate(blob_id(content))
}

/// Blob id of a file on disk, streamed in chunks.
pub fn blob_id_of_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let size = file.metadata()?.len();

    let mut hasher = Sha1::new();
    hasher.update(format!("blob {size}\0").as_bytes());

    let mut buf = [0u8; 8192];
    let mut read_total = 0u64;
    loop {
        let read = file.read(&mut buf)?;
        if read == 0 {
            break;
        }
        read_total += read as u64;
        hasher.update(&buf[..read]);
    }
    if read_total != size {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("{} changed size while hashing", path.display()),
        ));
    }
    Ok(format!("{:x}", hasher.finalize()))
}

pub fn content_version_of_file(path: &Path) -> io::Result<String> {
    blob_id_of_file(path).map(truncate)
}

fn truncate(mut id: String) -> String {
    id.truncate(CONTENT_VERSION_LEN);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_git_hash_object() {
        // `printf '' | git hash-object --stdin`
        assert_eq!(blob_id(b""), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
        // `echo 'hello world' | git hash-object --stdin`
        assert_eq!(
            blob_id(b"hello world\n"),
            "3b18e512dba79e4c8300dd08aeb37f8e728b8dad"
        );
    }

    #[test]
    fn content_version_is_six_hex_chars() {
        assert_eq!(content_version(b"hello world\n"), "3b18e5");
    }

    #[test]
    fn size_prefix_changes_the_digest() {
        use sha1::{Digest, Sha1};
        let raw = format!("{:x}", Sha1::digest(b"1\n2\n"));
        assert_ne!(blob_id(b"1\n2\n"), raw);
    }

    #[test]
    fn file_digest_matches_in_memory_digest() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("file1.txt");
        std::fs::write(&path, "1\n2\n").unwrap();

        assert_eq!(blob_id_of_file(&path).unwrap(), blob_id(b"1\n2\n"));
        assert_eq!(content_version_of_file(&path).unwrap(), content_version(b"1\n2\n"));
    }
}
