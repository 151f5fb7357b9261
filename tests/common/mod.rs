#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use inventory_managed::oracle::{OracleError, TextOracle};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Oracle fake answering column-mapping queries from a fixed script and
/// recording every query it receives.
pub struct ScriptedOracle {
    answers: HashMap<String, String>,
    pub mapped_headers: RefCell<Vec<String>>,
    pub sql_response: Option<String>,
    pub summary_response: Option<String>,
}

impl ScriptedOracle {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            answers: pairs
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            mapped_headers: RefCell::new(Vec::new()),
            sql_response: None,
            summary_response: None,
        }
    }

    pub fn query_count(&self) -> usize {
        self.mapped_headers.borrow().len()
    }
}

impl TextOracle for ScriptedOracle {
    fn map_column(&self, header: &str, _candidates: &[String]) -> Result<String, OracleError> {
        self.mapped_headers.borrow_mut().push(header.to_string());
        Ok(self
            .answers
            .get(header)
            .cloned()
            .unwrap_or_else(|| header.to_uppercase()))
    }

    fn translate_to_sql(&self, _schema: &str, _question: &str) -> Result<String, OracleError> {
        self.sql_response
            .clone()
            .ok_or(OracleError::EmptyResponse)
    }

    fn summarize(&self, _data: &str, _prompt: &str) -> Result<String, OracleError> {
        self.summary_response
            .clone()
            .ok_or(OracleError::EmptyResponse)
    }
}
