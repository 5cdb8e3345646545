use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, instrument};

use crate::trial::ResultRow;

use super::codec;
use super::error::{Result, StoreError};

/// A table of result rows kept in one file.
///
/// The store has a single writer: only the process orchestrating a run
/// mutates it, once per batch. Every write replaces the whole file
/// atomically so a reader never sees a half written table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    /// Point at a store file. Nothing is touched on disk until the first
    /// load or persist.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row currently persisted.
    ///
    /// A store that does not exist yet loads as empty.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Vec<ResultRow>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No store file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let rows = codec::decode(&text)?;
        debug!(rows = rows.len(), "Loaded result store");
        Ok(rows)
    }

    /// Write `existing` followed by `new_rows` as the new contents of the
    /// store, returning the number of rows now stored.
    ///
    /// Order is preserved within both inputs, so persisting batch `a` then
    /// batch `b` gives the same file as persisting `a ++ b` once.
    ///
    /// A row that would not load back is a [`StoreError::UnstorableRow`] and
    /// the file is left untouched.
    #[instrument(
        level = "debug",
        skip_all,
        fields(path = %self.path.display(), existing = existing.len(), new = new_rows.len())
    )]
    pub fn merge_and_persist(
        &self,
        existing: &[ResultRow],
        new_rows: &[ResultRow],
    ) -> Result<usize> {
        let merged = [existing, new_rows].concat();
        for (index, row) in merged.iter().enumerate() {
            codec::check_row(row)
                .map_err(|reason| StoreError::UnstorableRow { index, reason })?;
        }
        atomic_write(&self.path, codec::encode(&merged).as_bytes()).map_err(|source| {
            StoreError::Persist {
                path: self.path.clone(),
                source,
            }
        })?;
        info!(
            rows = merged.len(),
            appended = new_rows.len(),
            "Persisted result store"
        );
        Ok(merged.len())
    }

    /// Load, append `new_rows` and persist.
    pub fn append(&self, new_rows: &[ResultRow]) -> Result<usize> {
        let existing = self.load()?;
        self.merge_and_persist(&existing, new_rows)
    }

    /// Number of rows currently persisted.
    pub fn len(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Write to a hidden temp file beside `path`, flush it to disk and rename it
/// over `path`.
fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("results");
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.tmp.{}.{}", name, std::process::id(), nanos));

    let written = fs::File::create(&tmp).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(e) = written.and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    if let Some(parent) = path.parent() {
        if let Ok(dir) = fs::File::open(parent) {
            let _ = dir.sync_all();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::test_util::row;

    fn store_in(dir: &tempfile::TempDir) -> ResultStore {
        ResultStore::open(dir.path().join("results.csv"))
    }

    #[test]
    fn test_missing_store_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().unwrap().is_empty());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_zero_byte_store_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "").unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_persisted_empty_store_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.merge_and_persist(&[], &[]).unwrap(), 0);
        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text.trim_end(), codec::header());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_keeps_prior_rows_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let first = vec![row("Random", 2, 1), row("MCTS_10", 2, 4)];
        let second = vec![row("MCTS_100", 3, 12)];

        assert_eq!(store.append(&first).unwrap(), 2);
        assert_eq!(store.append(&second).unwrap(), 3);
        assert_eq!(store.load().unwrap(), [first, second].concat());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::open(dir.path().join("nested/deeper/results.csv"));
        store.append(&[row("Random", 2, 0)]).unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&[row("Random", 2, 0)]).unwrap();
        store.append(&[row("Random", 2, 5)]).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("results.csv")]);
    }

    #[test]
    fn test_schema_mismatch_is_fatal_and_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let foreign = "score,agent,seed\n12,Random,4\n";
        fs::write(store.path(), foreign).unwrap();

        assert!(matches!(
            store.append(&[row("Random", 2, 0)]),
            Err(StoreError::SchemaMismatch { .. })
        ));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), foreign);
    }

    #[test]
    fn test_row_without_agent_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&[row("Random", 2, 3)]).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        match store.append(&[row("MCTS_10", 2, 5), row("", 2, 7)]) {
            Err(StoreError::UnstorableRow { index, reason }) => {
                assert_eq!(index, 2);
                assert_eq!(reason, "agent is missing");
            }
            other => panic!("expected an unstorable row, got {other:?}"),
        }
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
        assert_eq!(store.load().unwrap(), vec![row("Random", 2, 3)]);
    }

    fn arb_row() -> impl Strategy<Value = ResultRow> {
        (
            0u8..=12,
            prop::sample::select(vec!["Random", "MCTS_10", "MCTS_1000", "odd,label"]),
            1usize..=4,
            prop::option::of(0u8..3),
            prop::option::of(1u64..1000),
        )
            .prop_map(|(score, label, players, policy, samples)| ResultRow {
                score,
                agent_label: label.to_string(),
                player_count: players,
                policy_variant: policy,
                deterministic_samples: samples,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_merge_is_associative(
            original in prop::collection::vec(arb_row(), 0..8),
            a in prop::collection::vec(arb_row(), 0..8),
            b in prop::collection::vec(arb_row(), 0..8),
        ) {
            let dir = tempfile::tempdir().unwrap();
            let sequential = ResultStore::open(dir.path().join("sequential.csv"));
            let once = ResultStore::open(dir.path().join("once.csv"));

            sequential.merge_and_persist(&[], &original).unwrap();
            sequential.merge_and_persist(&sequential.load().unwrap(), &a).unwrap();
            sequential.merge_and_persist(&sequential.load().unwrap(), &b).unwrap();

            once.merge_and_persist(&original, &[a.clone(), b.clone()].concat()).unwrap();

            prop_assert_eq!(sequential.load().unwrap(), once.load().unwrap());
            prop_assert_eq!(
                fs::read(sequential.path()).unwrap(),
                fs::read(once.path()).unwrap()
            );
        }
    }
}
