//! A directory of dataset files.

use std::fs;
use std::path::{Path, PathBuf};

use tabula_sas::SasReadOptions;

use crate::error::{TableError, TableResult};
use crate::table::{table_name, SasTable, SAS_EXTENSION};

/// Whether `path` names a SAS dataset (case-sensitive `.sas7bdat` suffix).
pub fn is_sas_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(SAS_EXTENSION))
}

/// Whether `dir` is a directory holding at least one SAS dataset.
pub fn is_sas_directory<P: AsRef<Path>>(dir: P) -> bool {
    let dir = dir.as_ref();
    dir.is_dir() && dataset_paths(dir).is_ok_and(|paths| !paths.is_empty())
}

/// Dataset files in `dir`, sorted by path.
fn dataset_paths(dir: &Path) -> TableResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_sas_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// The datasets of one directory, one table per `.sas7bdat` file.
#[derive(Debug, Clone)]
pub struct SasCatalog {
    directory: PathBuf,
    options: SasReadOptions,
}

impl SasCatalog {
    /// Open a catalog over an existing directory
    pub fn open<P: AsRef<Path>>(directory: P) -> TableResult<Self> {
        let directory = directory.as_ref().to_path_buf();
        if !directory.exists() {
            return Err(TableError::DirectoryNotFound(directory));
        }
        if !directory.is_dir() {
            return Err(TableError::NotADirectory(directory));
        }
        Ok(Self {
            directory,
            options: SasReadOptions::default(),
        })
    }

    /// Read every table with `options`
    pub fn with_options(mut self, options: SasReadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Catalog name: the directory's own name
    pub fn name(&self) -> String {
        self.directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// All tables, sorted by file name
    pub fn tables(&self) -> TableResult<Vec<SasTable>> {
        let paths = dataset_paths(&self.directory)?;
        if paths.is_empty() {
            log::warn!(
                "directory did not contain any SAS tables: {}",
                self.directory.display()
            );
        }
        Ok(paths
            .into_iter()
            .map(|p| SasTable::with_options(p, self.options.clone()))
            .collect())
    }

    /// Names of all tables, sorted
    pub fn table_names(&self) -> TableResult<Vec<String>> {
        Ok(dataset_paths(&self.directory)?
            .iter()
            .map(|p| table_name(p))
            .collect())
    }

    /// The table with the given name
    pub fn table(&self, name: &str) -> TableResult<SasTable> {
        let path = self.directory.join(format!("{name}{SAS_EXTENSION}"));
        if !path.is_file() {
            return Err(TableError::TableNotFound(name.to_string()));
        }
        Ok(SasTable::with_options(path, self.options.clone()))
    }
}
