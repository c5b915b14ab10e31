//! File hashing: streaming SHA-256 through a fixed-size buffer.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::HashResult;
use crate::error::ScanError;
use crate::utils::config::HashingConsts;

/// Hash a file with a freshly allocated read buffer. Workers should prefer
/// [`hash_file_with_buffer`] and reuse one buffer across files.
pub fn hash_file(path: &Path) -> Result<HashResult, ScanError> {
    let mut buffer = vec![0u8; HashingConsts::READ_BUFFER_SIZE];
    hash_file_with_buffer(path, &mut buffer)
}

/// Hash a file by reading it sequentially into `buffer` until EOF. Memory use is the buffer,
/// regardless of file size. The file handle is read directly (no extra `BufReader` layer).
pub fn hash_file_with_buffer(path: &Path, buffer: &mut [u8]) -> Result<HashResult, ScanError> {
    let io_err = |source: std::io::Error| ScanError::FileIo {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(io_err)?;
    let mut hasher = Sha256::new();
    loop {
        let n = match file.read(buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(io_err(e)),
        };
        hasher.update(&buffer[..n]);
    }
    Ok(HashResult {
        path: path.to_path_buf(),
        digest: format!("{:x}", hasher.finalize()),
    })
}

/// SHA-256 of an in-memory slice, same format as [`hash_file`].
pub fn hash_bytes(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// True if `s` looks like a digest this module produces (64 lowercase hex chars).
pub fn is_hex_digest(s: &str) -> bool {
    s.len() == HashingConsts::DIGEST_HEX_LEN
        && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
