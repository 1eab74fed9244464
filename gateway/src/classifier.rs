//! Storage key → audit action label.
//!
//! Used for audit readability only, never for authorization. The label
//! depends on the key shape alone; document content is never inspected.

use crate::common::types::{ActionLabel, MutationKind};

/// Classifies `key` for an operation of the given kind.
///
/// Rules are evaluated in order on the lower-cased key; the first match wins.
pub fn classify(kind: MutationKind, key: Option<&str>) -> ActionLabel {
    let key = match key {
        Some(key) if !key.is_empty() => key.to_lowercase(),
        _ => return ActionLabel::generic(kind),
    };

    if key.ends_with("projects.json") {
        return ActionLabel::ProjectsListUpdate;
    }
    if key.contains("/projects/") && key.ends_with("/index.json") {
        return match kind {
            MutationKind::Write => ActionLabel::ProjectSave,
            MutationKind::Delete => ActionLabel::ProjectDelete,
        };
    }
    if key.ends_with("areas.json") {
        return ActionLabel::AreasUpdate;
    }
    if key.contains("/areas/") && key.ends_with("/index.json") {
        return match kind {
            MutationKind::Write => ActionLabel::AreaUpdate,
            MutationKind::Delete => ActionLabel::AreaDelete,
        };
    }
    ActionLabel::generic(kind)
}
