// Mock adapters - In-memory port implementations for tests and dry runs

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Transport answering from a fixed url table
#[derive(Default)]
pub struct MockTransportAdapter {
    routes: Mutex<HashMap<String, Result<String, DomainError>>>,
    requests: Mutex<Vec<String>>,
}

impl MockTransportAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        lock(&self.routes).insert(url.into(), Ok(body.into()));
        self
    }

    pub fn with_failure(self, url: impl Into<String>) -> Self {
        let url = url.into();
        let error = DomainError::TransportFail(format!("connection refused: {}", url));
        lock(&self.routes).insert(url, Err(error));
        self
    }

    /// Every url requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl TransportPort for MockTransportAdapter {
    async fn get_text(&self, url: &str) -> Result<String, DomainError> {
        lock(&self.requests).push(url.to_string());
        lock(&self.routes)
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(DomainError::TransportFail(format!("no route for {}", url))))
    }
}

/// Prompt replaying scripted input lines
#[derive(Default)]
pub struct ScriptedPromptAdapter {
    input: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    output: Mutex<Vec<String>>,
}

impl ScriptedPromptAdapter {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: Mutex::new(lines.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Prompts shown so far
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Messages printed so far
    pub fn output(&self) -> Vec<String> {
        lock(&self.output).clone()
    }

    /// Scripted lines not consumed yet
    pub fn remaining(&self) -> usize {
        lock(&self.input).len()
    }
}

#[async_trait]
impl PromptPort for ScriptedPromptAdapter {
    async fn read_line(&self, prompt: &str) -> Result<Option<String>, DomainError> {
        lock(&self.prompts).push(prompt.to_string());
        Ok(lock(&self.input).pop_front())
    }

    async fn say(&self, message: &str) {
        lock(&self.output).push(message.to_string());
    }
}

/// Editor returning a prepared timing model
#[derive(Default)]
pub struct MockEditorAdapter {
    result: Mutex<Option<TimingModel>>,
    sessions: Mutex<Vec<PathBuf>>,
}

impl MockEditorAdapter {
    pub fn new(result: Option<TimingModel>) -> Self {
        Self {
            result: Mutex::new(result),
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Videos the editor was opened for
    pub fn sessions(&self) -> Vec<PathBuf> {
        lock(&self.sessions).clone()
    }
}

#[async_trait]
impl EditorPort for MockEditorAdapter {
    async fn author(&self, video: &Path) -> Result<Option<TimingModel>, DomainError> {
        lock(&self.sessions).push(video.to_path_buf());
        Ok(lock(&self.result).clone())
    }
}

/// Player recording the jobs it was given
#[derive(Default)]
pub struct RecordingPlayerAdapter {
    jobs: Mutex<Vec<PlayerJob>>,
}

impl RecordingPlayerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> Vec<PlayerJob> {
        lock(&self.jobs).clone()
    }
}

#[async_trait]
impl PlayerPort for RecordingPlayerAdapter {
    async fn play(&self, job: &PlayerJob) -> Result<(), DomainError> {
        lock(&self.jobs).push(job.clone());
        Ok(())
    }
}

/// File system kept in memory
#[derive(Default)]
pub struct MockFsAdapter {
    files: Mutex<BTreeMap<PathBuf, String>>,
    read_only: Mutex<Vec<PathBuf>>,
    deleted: Mutex<Vec<PathBuf>>,
}

impl MockFsAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        lock(&self.files).insert(path.into(), content.into());
        self
    }

    /// Make writes to `path` fail
    pub fn with_read_only(self, path: impl Into<PathBuf>) -> Self {
        lock(&self.read_only).push(path.into());
        self
    }

    pub fn content(&self, path: &Path) -> Option<String> {
        lock(&self.files).get(path).cloned()
    }

    pub fn deleted(&self) -> Vec<PathBuf> {
        lock(&self.deleted).clone()
    }
}

#[async_trait]
impl FsPort for MockFsAdapter {
    async fn file_exists(&self, path: &Path) -> Result<bool, DomainError> {
        Ok(lock(&self.files).contains_key(path))
    }

    async fn file_size(&self, path: &Path) -> Result<u64, DomainError> {
        lock(&self.files)
            .get(path)
            .map(|content| content.len() as u64)
            .ok_or_else(|| DomainError::FsFail(format!("No such file: {}", path.display())))
    }

    async fn read_text(&self, path: &Path) -> Result<String, DomainError> {
        lock(&self.files)
            .get(path)
            .cloned()
            .ok_or_else(|| DomainError::FsFail(format!("No such file: {}", path.display())))
    }

    async fn write_text(&self, path: &Path, content: &str) -> Result<(), DomainError> {
        if lock(&self.read_only).iter().any(|p| p == path) {
            return Err(DomainError::FsFail(format!("Read-only file: {}", path.display())));
        }
        lock(&self.files).insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> Result<(), DomainError> {
        match lock(&self.files).remove(path) {
            Some(_) => {
                lock(&self.deleted).push(path.to_path_buf());
                Ok(())
            }
            None => Err(DomainError::FsFail(format!("No such file: {}", path.display()))),
        }
    }
}
