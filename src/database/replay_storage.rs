//! Replay file storage with Zstd compression.
//!
//! Replays are stored as compressed binary files in `{dir}/{key}.r`, where
//! the key is the score hash or `id-{row}` for hashless scores.
//! Data is serialized with `bincode` before compression to minimize size.

use crate::models::replay::ReplayData;
use crate::models::score::ScoreRecord;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zstd::stream::{decode_all, encode_all};

const COMPRESSION_LEVEL: i32 = 19;

#[derive(Debug, Clone)]
pub struct ReplayStore {
    dir: PathBuf,
}

impl ReplayStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File key for a score's replay.
    pub fn key_for(hash: &str, id: i64) -> String {
        if hash.is_empty() {
            format!("id-{}", id)
        } else {
            hash.to_string()
        }
    }

    pub fn replay_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.r", key))
    }

    /// Save replay data to a compressed binary file.
    pub fn save(&self, key: &str, data: &ReplayData) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.replay_path(key);
        let binary_data =
            bincode::serde::encode_to_vec(data, bincode::config::standard()).map_err(|e| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("Serialization error: {}", e),
                )
            })?;

        let compressed_data = encode_all(&binary_data[..], COMPRESSION_LEVEL)?;
        let mut file = File::create(&path)?;
        file.write_all(&compressed_data)?;

        Ok(path)
    }

    /// Load and decompress replay data for `key`.
    pub fn load(&self, key: &str) -> std::io::Result<ReplayData> {
        load_replay_from_path(&self.replay_path(key))
    }

    /// Loads the replay attached to `score`, if it has one.
    pub fn load_for(&self, score: &ScoreRecord) -> std::io::Result<Option<ReplayData>> {
        if !score.has_replay {
            return Ok(None);
        }
        self.load(&Self::key_for(&score.hash, score.id)).map(Some)
    }
}

/// Load replay data from a specific path.
pub fn load_replay_from_path(path: &Path) -> std::io::Result<ReplayData> {
    let file = File::open(path)?;
    let binary_data = decode_all(file)?;

    let (data, _len): (ReplayData, usize) =
        bincode::serde::decode_from_slice(&binary_data, bincode::config::standard()).map_err(
            |e| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("Deserialization error: {}", e),
                )
            },
        )?;

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_decompress() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReplayStore::new(dir.path().join("r"));
        let mut data = ReplayData::new(1.0);
        data.add_press(10_000, 0);
        data.add_release(90_000, 0);

        let path = store.save("test_replay_hash", &data).unwrap();
        assert!(path.exists());

        let loaded = store.load("test_replay_hash").unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn hashless_scores_are_keyed_by_row() {
        assert_eq!(ReplayStore::key_for("", 7), "id-7");
        assert_eq!(ReplayStore::key_for("deadbeef", 7), "deadbeef");
    }

    #[test]
    fn corrupt_file_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReplayStore::new(dir.path());
        fs::write(store.replay_path("bad"), b"not zstd").unwrap();
        assert!(store.load("bad").is_err());
    }
}
