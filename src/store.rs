//! Persisting `SamplingSet`s as JSON files named by their
//! `SamplingKey`, in a single directory.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::{
    info, io_utils::temporary_file::TemporaryFile, sampling::SamplingSet, task::SamplingKey,
};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("creating store directory {base_dir:?}: {error}")]
    CreateDir {
        base_dir: PathBuf,
        error: std::io::Error,
    },
    #[error("sampling store: {ctx} {path:?}: {error}")]
    IO {
        path: PathBuf,
        ctx: &'static str,
        error: std::io::Error,
    },
    #[error("sampling store: path {path:?} has no file name")]
    NoFileName { path: PathBuf },
    #[error("serializing sampling set to JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(
        "sampling store {path:?} is not in the expected format, at {json_path}: {error}"
    )]
    DataFormat {
        path: PathBuf,
        /// Where in the document the error happened, e.g. `openmp.2[1]`
        json_path: String,
        error: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct SamplingStore {
    base_dir: PathBuf,
}

impl SamplingStore {
    /// Does not access the file system; `base_dir` is created on the
    /// first `save` if missing.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn path(&self, key: &SamplingKey) -> PathBuf {
        self.base_dir.join(key.file_name())
    }

    pub fn exists(&self, key: &SamplingKey) -> bool {
        self.path(key).is_file()
    }

    pub fn load(&self, key: &SamplingKey) -> Result<SamplingSet, StoreError> {
        let path = self.path(key);
        let s = std::fs::read_to_string(&path).map_err(|error| StoreError::IO {
            path: path.clone(),
            ctx: "reading file",
            error,
        })?;
        let deserializer = &mut serde_json::Deserializer::from_str(&s);
        let set: SamplingSet = serde_path_to_error::deserialize(deserializer).map_err(|e| {
            let json_path = e.path().to_string();
            StoreError::DataFormat {
                path: path.clone(),
                json_path,
                error: e.into_inner(),
            }
        })?;
        info!("loaded sampling set from {path:?}");
        Ok(set)
    }

    /// Replaces any existing entry for `key`. The file is written
    /// under a temporary name and renamed into place, so that readers
    /// only ever see complete files.
    pub fn save(&self, key: &SamplingKey, set: &SamplingSet) -> Result<PathBuf, StoreError> {
        let mut s = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        set.serialize(&mut serde_json::Serializer::with_formatter(&mut s, formatter))?;
        s.push(b'\n');

        std::fs::create_dir_all(&self.base_dir).map_err(|error| StoreError::CreateDir {
            base_dir: self.base_dir.clone(),
            error,
        })?;

        let target_path = self.path(key);
        let tmp = TemporaryFile::sibling_of(&target_path).ok_or_else(|| StoreError::NoFileName {
            path: target_path.clone(),
        })?;
        let io_error = |ctx: &'static str, path: &Path| {
            let path = path.to_owned();
            move |error| StoreError::IO { path, ctx, error }
        };
        let mut out =
            File::create(tmp.path()).map_err(io_error("creating file", tmp.path()))?;
        out.write_all(&s)
            .map_err(io_error("writing to file", tmp.path()))?;
        out.flush().map_err(io_error("flushing file", tmp.path()))?;
        drop(out);
        tmp.persist(&target_path)
            .map_err(io_error("renaming to file", &target_path))?;
        info!("saved sampling set to {target_path:?}");
        Ok(target_path)
    }
}
