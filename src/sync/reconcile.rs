use crate::core::section::Section;

/// Replace the section with the same id as `updated`, keeping its position.
///
/// Returns false and leaves `sections` untouched when no entry matches.
pub fn reconcile(sections: &mut [Section], updated: Section) -> bool {
    match sections.iter_mut().find(|s| s.id == updated.id) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => {
            log::warn!(
                "Ignoring snapshot for unknown section {} ({})",
                updated.id,
                updated.title
            );
            false
        }
    }
}
