use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Hex SHA-256 of an in-memory output
pub fn output_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Hex SHA-256 of a committed output file; two runs over the same input and
/// seed must produce the same value.
pub fn file_digest(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_and_memory_digests_agree() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"occurrenceID\nVBA1\n").unwrap();
        file.flush().unwrap();

        assert_eq!(
            file_digest(file.path()).unwrap(),
            output_digest(b"occurrenceID\nVBA1\n")
        );
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            output_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
