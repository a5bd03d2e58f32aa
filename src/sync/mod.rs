pub mod api;
pub mod bootstrap;
pub mod dispatch;
pub mod error;
pub mod reconcile;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;

use crate::core::draft::draft_lines;
use crate::core::section::{Section, SectionId};
use api::SectionsApi;
use bootstrap::{LoadResult, RetryPolicy, Sleeper, load_with_retry};
use error::SyncError;

/// What happened when the store tried to load its initial sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Loaded { sections: usize, attempts: u32 },
    /// Every attempt failed; the store is idle with no sections.
    Degraded { attempts: u32 },
    /// The store was already bootstrapped; nothing was fetched.
    AlreadyRan,
}

/// Local mirror of the remote sections and the UI state around them.
///
/// The only mutators of the section list are the bootstrap and the mutation
/// operations below; each successful mutation replaces or appends exactly one
/// section with the server's copy.
#[derive(Debug, Clone)]
pub struct SyncStore {
    sections: Vec<Section>,
    loading: bool,
    open_section: Option<SectionId>,
    drafts: HashMap<SectionId, String>,
    title_input: String,
    submitting: HashSet<SectionId>,
    bootstrapped: bool,
    last_synced: Option<NaiveDateTime>,
}

impl Default for SyncStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncStore {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            loading: true,
            open_section: None,
            drafts: HashMap::new(),
            title_input: String::new(),
            submitting: HashSet::new(),
            bootstrapped: false,
            last_synced: None,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn open_section(&self) -> Option<&str> {
        self.open_section.as_deref()
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open_section.as_deref() == Some(id)
    }

    pub fn title_input(&self) -> &str {
        &self.title_input
    }

    pub fn draft(&self, section_id: &str) -> &str {
        self.drafts.get(section_id).map(String::as_str).unwrap_or("")
    }

    pub fn is_submitting(&self, section_id: &str) -> bool {
        self.submitting.contains(section_id)
    }

    pub fn last_synced(&self) -> Option<NaiveDateTime> {
        self.last_synced
    }

    pub fn set_title_input(&mut self, text: impl Into<String>) {
        self.title_input = text.into();
    }

    pub fn set_draft(&mut self, section_id: impl Into<SectionId>, text: impl Into<String>) {
        self.drafts.insert(section_id.into(), text.into());
    }

    /// Header click: open the section, or close it if it is already open.
    pub fn toggle_open(&mut self, section_id: &str) {
        if self.is_open(section_id) {
            self.open_section = None;
        } else {
            self.open_section = Some(section_id.to_string());
        }
    }

    // Bootstrap

    /// Load the initial sections, retrying while the backend wakes up.
    ///
    /// Runs once per store; later calls return [`BootstrapOutcome::AlreadyRan`].
    pub async fn bootstrap(
        &mut self,
        api: &dyn SectionsApi,
        sleeper: &dyn Sleeper,
        policy: RetryPolicy,
    ) -> BootstrapOutcome {
        if self.bootstrapped {
            log::warn!("Bootstrap requested twice, ignoring");
            return BootstrapOutcome::AlreadyRan;
        }
        self.bootstrapped = true;
        self.loading = true;

        let result = load_with_retry(api, sleeper, policy).await;
        self.apply_load(result)
    }

    fn apply_load(&mut self, result: LoadResult) -> BootstrapOutcome {
        self.loading = false;
        match result {
            LoadResult::Loaded { sections, attempts } => {
                self.open_section = sections.last().map(|s| s.id.clone());
                self.sections = sections;
                self.touch();
                BootstrapOutcome::Loaded {
                    sections: self.sections.len(),
                    attempts,
                }
            }
            LoadResult::Exhausted { attempts, .. } => {
                self.sections.clear();
                BootstrapOutcome::Degraded { attempts }
            }
        }
    }

    // Mutations

    /// Create a section and open it. Empty titles are ignored.
    pub async fn create_section(
        &mut self,
        api: &dyn SectionsApi,
        title: &str,
    ) -> Result<Option<Section>, SyncError> {
        if title.is_empty() {
            return Ok(None);
        }

        let created = api.create_section(title).await?;
        log::info!("Created section {} ({})", created.title, created.id);

        if self.section(&created.id).is_some() {
            // Server reused an id we already hold; keep ids unique.
            self.reconcile(created.clone());
        } else {
            self.sections.push(created.clone());
            self.touch();
        }
        self.open_section = Some(created.id.clone());
        self.title_input.clear();
        Ok(Some(created))
    }

    /// Create a section from the staged title input.
    pub async fn submit_title(
        &mut self,
        api: &dyn SectionsApi,
    ) -> Result<Option<Section>, SyncError> {
        let title = self.title_input.clone();
        self.create_section(api, &title).await
    }

    /// Claim the draft of a section for submission.
    ///
    /// Returns the item texts to send, or `None` when the draft has no
    /// non-blank line or a submission for this section is already in flight.
    pub fn begin_add_items(&mut self, section_id: &str) -> Option<Vec<String>> {
        if self.submitting.contains(section_id) {
            log::debug!("Submission already in flight for section {}", section_id);
            return None;
        }
        let lines = draft_lines(self.draft(section_id));
        if lines.is_empty() {
            return None;
        }
        self.submitting.insert(section_id.to_string());
        Some(lines)
    }

    /// Fold the outcome of a submission started with [`Self::begin_add_items`].
    ///
    /// On success the last snapshot replaces the section and the draft is
    /// cleared. On failure the draft is kept and the error is returned.
    pub fn finish_add_items(
        &mut self,
        section_id: &str,
        result: Result<Option<Section>, SyncError>,
    ) -> Result<Option<Section>, SyncError> {
        self.submitting.remove(section_id);
        let latest = result?;
        if let Some(snapshot) = &latest {
            self.reconcile(snapshot.clone());
        }
        self.drafts.insert(section_id.to_string(), String::new());
        Ok(latest)
    }

    /// Submit every non-blank line of the section's draft as a new item.
    pub async fn add_items(
        &mut self,
        api: &dyn SectionsApi,
        section_id: &str,
    ) -> Result<Option<Section>, SyncError> {
        let Some(lines) = self.begin_add_items(section_id) else {
            return Ok(None);
        };
        log::info!("Adding {} item(s) to section {}", lines.len(), section_id);
        let result = dispatch::submit_items(api, section_id, &lines).await;
        self.finish_add_items(section_id, result)
    }

    /// Flip an item's completed flag on the server and mirror the result.
    pub async fn toggle_item(
        &mut self,
        api: &dyn SectionsApi,
        section_id: &str,
        item_id: &str,
    ) -> Result<Section, SyncError> {
        let updated = api.toggle_item(section_id, item_id).await?;
        self.reconcile(updated.clone());
        Ok(updated)
    }

    pub async fn delete_item(
        &mut self,
        api: &dyn SectionsApi,
        section_id: &str,
        item_id: &str,
    ) -> Result<Section, SyncError> {
        let updated = api.delete_item(section_id, item_id).await?;
        self.reconcile(updated.clone());
        Ok(updated)
    }

    /// Replace the matching section with `updated`. Unknown ids are ignored.
    pub fn reconcile(&mut self, updated: Section) -> bool {
        let replaced = reconcile::reconcile(&mut self.sections, updated);
        if replaced {
            self.touch();
        }
        replaced
    }

    fn touch(&mut self) {
        self.last_synced = Some(chrono::Local::now().naive_local());
    }
}
