use crate::error::FsError;
use crate::models::hash::{HashAlgorithm, HashResult};
use sha2::Digest;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

const CHUNK_SIZE: usize = 4096;

enum DigestState {
    Md5(md5::Context),
    Sha1(sha1::Sha1),
    Sha256(sha2::Sha256),
}

impl DigestState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5    => DigestState::Md5(md5::Context::new()),
            HashAlgorithm::Sha1   => DigestState::Sha1(sha1::Sha1::new()),
            HashAlgorithm::Sha256 => DigestState::Sha256(sha2::Sha256::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            DigestState::Md5(c)    => c.consume(data),
            DigestState::Sha1(h)   => h.update(data),
            DigestState::Sha256(h) => h.update(data),
        }
    }

    fn finish_hex(self) -> String {
        match self {
            DigestState::Md5(c)    => hex::encode(c.compute().0),
            DigestState::Sha1(h)   => hex::encode(h.finalize()),
            DigestState::Sha256(h) => hex::encode(h.finalize()),
        }
    }
}

/// Stream `reader` through `algorithm` in fixed-size chunks.
pub fn digest_reader<R: Read>(mut reader: R, algorithm: HashAlgorithm) -> io::Result<String> {
    let mut state = DigestState::new(algorithm);
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0)  => break,
            Ok(n)  => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        state.update(&buf[..n]);
    }
    Ok(state.finish_hex())
}

/// Hex digest of a regular file's contents.
///
/// The file is not locked; if it changes mid-read the digest matches neither version.
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<HashResult, FsError> {
    let meta = fs::metadata(path).map_err(|e| FsError::from_io(path, e))?;
    if !meta.is_file() {
        return Err(FsError::NotAFile(path.to_path_buf()));
    }

    debug!(path = %path.display(), %algorithm, bytes = meta.len(), "hashing file");
    let file = File::open(path).map_err(|e| FsError::from_io(path, e))?;
    let digest_hex = digest_reader(file, algorithm).map_err(|e| FsError::from_io(path, e))?;

    Ok(HashResult { path: path.to_path_buf(), algorithm, digest_hex })
}

/// Parse the algorithm name, then hash.
pub fn hash_file_named(path: &Path, algorithm: &str) -> Result<HashResult, FsError> {
    let algorithm: HashAlgorithm = algorithm.parse()?;
    hash_file(path, algorithm)
}
