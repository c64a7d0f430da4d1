//! Snapshot file format for the record store.
//!
//! Layout: LZ4 (size-prepended) of named MessagePack, followed by a 32-byte
//! SHA-256 of everything before it. Writes go to a temp file that is renamed
//! over the target, so a reader sees either the old or the new snapshot.

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

use super::error::{StoreError, StoreResult};
use super::tables::StoreTables;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Snapshots larger than this are refused on read.
const MAX_SNAPSHOT_BYTES: usize = 256 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u32,
    /// Unix milliseconds
    pub saved_at: u64,
    pub tables: StoreTables,
}

impl StoreSnapshot {
    pub fn new(tables: StoreTables) -> Self {
        Self { version: SNAPSHOT_VERSION, saved_at: current_timestamp(), tables }
    }
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}

pub fn encode_snapshot(snapshot: &StoreSnapshot) -> StoreResult<Vec<u8>> {
    let msgpack = to_vec_named(snapshot)?;
    let mut bytes = compress_prepend_size(&msgpack);

    let checksum = Sha256::digest(&bytes);
    bytes.extend_from_slice(&checksum);
    Ok(bytes)
}

pub fn decode_snapshot(bytes: &[u8]) -> StoreResult<StoreSnapshot> {
    if bytes.len() < 4 + 32 {
        return Err(StoreError::Corrupted);
    }
    if bytes.len() > MAX_SNAPSHOT_BYTES {
        return Err(StoreError::Corrupted);
    }

    let (payload, checksum) = bytes.split_at(bytes.len() - 32);
    if Sha256::digest(payload).as_slice() != checksum {
        return Err(StoreError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| StoreError::Decompression)?;
    let snapshot: StoreSnapshot = from_slice(&msgpack)?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(StoreError::VersionMismatch {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    Ok(snapshot)
}

/// A snapshot location on disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Tables stored at this location, or `None` when no snapshot exists yet.
    pub fn read(&self) -> StoreResult<Option<StoreTables>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut file = File::open(&self.path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let snapshot = decode_snapshot(&data)?;
        log::debug!("Loaded {} bytes from {:?}", data.len(), self.path);
        Ok(Some(snapshot.tables))
    }

    /// Atomically replace the snapshot with `tables`.
    pub fn write(&self, tables: &StoreTables) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = encode_snapshot(&StoreSnapshot::new(tables.clone()))?;
        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }
        rename(&temp_path, &self.path)?;

        log::debug!("Saved {} bytes to {:?}", data.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTeam, TagCategory};
    use tempfile::TempDir;

    fn sample_tables() -> StoreTables {
        let mut tables = StoreTables::new();
        tables
            .insert_tag(crate::models::NewTag {
                name: "Post Up".into(),
                category: TagCategory::Offense,
                is_active: true,
            })
            .unwrap();
        tables.insert_team(NewTeam { name: "Hawks".into(), abbreviation: Some("HWK".into()) }).unwrap();
        tables
    }

    #[test]
    fn test_encode_decode() {
        let tables = sample_tables();
        let bytes = encode_snapshot(&StoreSnapshot::new(tables.clone())).unwrap();
        let decoded = decode_snapshot(&bytes).unwrap();
        assert_eq!(decoded.version, SNAPSHOT_VERSION);
        assert_eq!(decoded.tables, tables);
    }

    #[test]
    fn test_tampered_snapshot_rejected() {
        let mut bytes = encode_snapshot(&StoreSnapshot::new(sample_tables())).unwrap();
        bytes[6] ^= 0xFF;
        assert!(matches!(decode_snapshot(&bytes), Err(StoreError::ChecksumMismatch)));
        assert!(matches!(decode_snapshot(&[0u8; 8]), Err(StoreError::Corrupted)));
    }

    #[test]
    fn test_version_mismatch_detected() {
        let mut snapshot = StoreSnapshot::new(StoreTables::new());
        snapshot.version = SNAPSHOT_VERSION + 1;
        let bytes = encode_snapshot(&snapshot).unwrap();
        assert!(matches!(
            decode_snapshot(&bytes),
            Err(StoreError::VersionMismatch { found, .. }) if found == SNAPSHOT_VERSION + 1
        ));
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("nested").join("hoops.snap"));
        assert!(file.read().unwrap().is_none());

        let tables = sample_tables();
        file.write(&tables).unwrap();
        assert!(file.exists());
        assert!(!file.path().with_extension("tmp").exists());
        assert_eq!(file.read().unwrap().unwrap(), tables);
    }
}
