use crate::error::FsError;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    pub fn label(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5    => "MD5",
            HashAlgorithm::Sha1   => "SHA1",
            HashAlgorithm::Sha256 => "SHA256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for HashAlgorithm {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5"              => Ok(HashAlgorithm::Md5),
            "sha1" | "sha-1"   => Ok(HashAlgorithm::Sha1),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            _ => Err(FsError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashResult {
    pub path:       PathBuf,
    pub algorithm:  HashAlgorithm,
    pub digest_hex: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!("md5".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Md5);
        assert_eq!("SHA1".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha1);
        assert_eq!("sha-256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "crc32".parse::<HashAlgorithm>().unwrap_err();
        assert!(matches!(err, FsError::UnsupportedAlgorithm(ref s) if s == "crc32"));
    }
}
