//! Scripted backend and sleeper shared by the sync tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::api::SectionsApi;
use super::bootstrap::Sleeper;
use super::error::SyncError;
use crate::core::section::{Item, Section};

pub fn section(id: &str, title: &str, items: &[(&str, &str, bool)]) -> Section {
    Section {
        id: id.to_string(),
        title: title.to_string(),
        items: items
            .iter()
            .map(|(id, text, completed)| Item {
                id: id.to_string(),
                text: text.to_string(),
                completed: *completed,
            })
            .collect(),
    }
}

/// A request the fake received, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    CreateSection(String),
    AddItem(String, String),
    Toggle(String, String),
    Delete(String, String),
}

/// Replays queued responses. A call with nothing queued fails with a
/// `Status` error.
#[derive(Default)]
pub struct FakeApi {
    lists: Mutex<VecDeque<Result<Vec<Section>, SyncError>>>,
    sections: Mutex<VecDeque<Result<Section, SyncError>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_list(&self, response: Result<Vec<Section>, SyncError>) {
        self.lists.lock().unwrap().push_back(response);
    }

    pub fn push_section(&self, response: Result<Section, SyncError>) {
        self.sections.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::List).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_section(&self) -> Result<Section, SyncError> {
        self.sections
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }
}

pub fn unscripted() -> SyncError {
    SyncError::Status {
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        body: "no scripted response".to_string(),
    }
}

#[async_trait]
impl SectionsApi for FakeApi {
    async fn list_sections(&self) -> Result<Vec<Section>, SyncError> {
        self.record(Call::List);
        self.lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }

    async fn create_section(&self, title: &str) -> Result<Section, SyncError> {
        self.record(Call::CreateSection(title.to_string()));
        self.next_section()
    }

    async fn add_item(&self, section_id: &str, text: &str) -> Result<Section, SyncError> {
        self.record(Call::AddItem(section_id.to_string(), text.to_string()));
        self.next_section()
    }

    async fn toggle_item(&self, section_id: &str, item_id: &str) -> Result<Section, SyncError> {
        self.record(Call::Toggle(section_id.to_string(), item_id.to_string()));
        self.next_section()
    }

    async fn delete_item(&self, section_id: &str, item_id: &str) -> Result<Section, SyncError> {
        self.record(Call::Delete(section_id.to_string(), item_id.to_string()));
        self.next_section()
    }
}

/// Records requested delays and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}
