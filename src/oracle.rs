//! Password validation against the encrypted archive.
//!
//! The contract is three-way and must stay that way: a wrong password is an
//! ordinary `Ok(Verdict::Wrong)`, the right password is `Ok(Verdict::Correct)`,
//! and anything wrong with the archive itself is an `Err` that aborts the
//! whole search. Collapsing the last case into `Wrong` would keep the search
//! grinding against a broken archive.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Error, Result};

/// Outcome of testing a single candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Wrong,
    Correct,
}

/// Decides whether a candidate is the archive's password.
///
/// Implementations take `&mut self` because real codec handles seek; each
/// worker in a sharded search owns its own oracle.
pub trait Oracle {
    fn test(&mut self, candidate: &str) -> Result<Verdict>;
}

/// Oracle backed by a real ZIP archive via the `zip` crate.
pub struct ZipOracle {
    archive: ZipArchive<File>,
    /// Index of the entry candidates are tested against: the first one that
    /// refuses to open without a password. Real archives often lead with
    /// directories or unencrypted members, so index 0 cannot be assumed.
    entry_index: usize,
    read_buffer: Vec<u8>,
}

impl ZipOracle {
    /// Opens the archive read-only and validates it up front: a missing or
    /// corrupt file, an empty archive, and an archive with no encrypted
    /// entries at all are structural failures before any candidate is tested.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file)?;

        if archive.len() == 0 {
            return Err(Error::EmptyArchive);
        }

        let mut entry_index = None;
        for index in 0..archive.len() {
            match archive.by_index(index) {
                // Readable without a password: a directory or plain member.
                Ok(_) => {}
                Err(ZipError::UnsupportedArchive(_)) | Err(ZipError::InvalidPassword) => {
                    entry_index = Some(index);
                    break;
                }
                Err(e) => return Err(Error::Archive(e)),
            }
        }
        let Some(entry_index) = entry_index else {
            return Err(Error::NotEncrypted);
        };

        Ok(Self {
            archive,
            entry_index,
            read_buffer: Vec::new(),
        })
    }

    /// Extracts every entry into `dir` with the given password, creating the
    /// directory as needed. Existing files are fully overwritten, never
    /// appended to, so running this twice leaves the same tree as once.
    pub fn extract_to(&mut self, dir: &Path, password: &str) -> Result<()> {
        fs::create_dir_all(dir)?;
        for index in 0..self.archive.len() {
            let mut entry = self.archive.by_index_decrypt(index, password.as_bytes())?;
            let Some(relative) = entry.enclosed_name() else {
                // Entry name escapes the destination; skip it.
                continue;
            };
            let destination = dir.join(relative);
            if entry.is_dir() {
                fs::create_dir_all(&destination)?;
                continue;
            }
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut output = File::create(&destination)?;
            std::io::copy(&mut entry, &mut output)?;
        }
        Ok(())
    }
}

impl Oracle for ZipOracle {
    fn test(&mut self, candidate: &str) -> Result<Verdict> {
        match self
            .archive
            .by_index_decrypt(self.entry_index, candidate.as_bytes())
        {
            Ok(mut entry) => {
                // ZipCrypto's check byte lets roughly 1 in 256 wrong passwords
                // through; reading the entry to completion validates the CRC
                // and demotes those collisions to Wrong.
                self.read_buffer.clear();
                match entry.read_to_end(&mut self.read_buffer) {
                    Ok(_) => Ok(Verdict::Correct),
                    Err(_) => Ok(Verdict::Wrong),
                }
            }
            Err(ZipError::InvalidPassword) => Ok(Verdict::Wrong),
            Err(e) => Err(Error::Archive(e)),
        }
    }
}
