//! Event classification
//!
//! Decides whether an inbound notification should trigger a pipeline run.
//! Only tag creations qualify; everything else is reported back as ignored,
//! which is a normal outcome rather than an error.

use crate::event::{RefType, WebhookEvent};

/// Outcome of classifying an inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The event is a tag creation; run the pipeline for this tag.
    Proceed { tag: String },
    /// The event does not trigger a run; carries a human-readable cause.
    Ignored { reason: String },
}

/// Classifies an inbound event
///
/// Proceeds only for a `create` event whose reference is a tag. Pure
/// function over the event, no I/O.
pub fn classify(event: &WebhookEvent) -> Decision {
    if event.event_kind != "create" {
        return Decision::Ignored {
            reason: format!("event \"{}\" is not a create event", event.event_kind),
        };
    }

    if event.ref_type != RefType::Tag {
        return Decision::Ignored {
            reason: format!("reference \"{}\" is not a tag", event.ref_name),
        };
    }

    Decision::Proceed {
        tag: event.ref_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(event_kind: &str, ref_name: &str, ref_type: RefType) -> WebhookEvent {
        WebhookEvent {
            event_kind: event_kind.to_string(),
            ref_name: ref_name.to_string(),
            ref_type,
        }
    }

    #[test]
    fn test_tag_creation_proceeds() {
        let decision = classify(&event("create", "v1.2.3", RefType::Tag));
        assert_eq!(
            decision,
            Decision::Proceed {
                tag: "v1.2.3".to_string()
            }
        );
    }

    #[test]
    fn test_branch_creation_is_ignored() {
        let decision = classify(&event("create", "feature/login", RefType::Branch));
        assert!(matches!(decision, Decision::Ignored { .. }));
    }

    #[test]
    fn test_non_create_events_are_ignored() {
        for kind in ["push", "delete", "pull_request", ""] {
            let decision = classify(&event(kind, "v1.2.3", RefType::Tag));
            assert!(
                matches!(decision, Decision::Ignored { .. }),
                "event kind {kind:?} should be ignored"
            );
        }
    }

    #[test]
    fn test_unknown_ref_type_is_ignored() {
        let decision = classify(&event("create", "something", RefType::Other));
        assert!(matches!(decision, Decision::Ignored { .. }));
    }
}
