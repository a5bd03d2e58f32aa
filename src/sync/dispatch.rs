use super::api::SectionsApi;
use super::error::SyncError;
use crate::core::section::Section;

/// Post each line as a new item, one request at a time.
///
/// Every response is a full snapshot of the section, so only the last one is
/// kept. Requests are never overlapped: a later snapshot must include every
/// earlier insertion. Stops at the first failure.
pub async fn submit_items(
    api: &dyn SectionsApi,
    section_id: &str,
    lines: &[String],
) -> Result<Option<Section>, SyncError> {
    let mut latest = None;
    for (i, text) in lines.iter().enumerate() {
        match api.add_item(section_id, text).await {
            Ok(snapshot) => latest = Some(snapshot),
            Err(e) => {
                log::warn!(
                    "Adding item {}/{} to section {} failed: {}",
                    i + 1,
                    lines.len(),
                    section_id,
                    e
                );
                return Err(e);
            }
        }
    }
    Ok(latest)
}
