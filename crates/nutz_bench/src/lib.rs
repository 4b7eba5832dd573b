//! Benchmark utilities.

#![warn(missing_docs)]

use nutz_core::{Session, StoreConfig};
use rand::Rng;
use tempfile::TempDir;

/// Generate random record data of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate `count` distinct record keys.
pub fn generate_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key_{i:08}")).collect()
}

/// Opens a session over a fresh file in a temporary directory.
///
/// Keep the returned directory alive for as long as the session is used.
pub fn temp_session() -> (TempDir, Session) {
    let dir = TempDir::new().expect("temp dir");
    let session = Session::new(StoreConfig::new(dir.path().join("bench.db")));
    (dir, session)
}
