//! Pure field-mapping functions
//!
//! Applies one tenant's [`MappingConfig`] to a ticket's status, priority, and
//! user-identity fields. No I/O, no side effects beyond the ticket passed in.
//!
//! Lookup policy differs by field kind: an unmapped status or priority passes
//! through unchanged, while an unmapped user in the hub→external direction is
//! a hard error. A user the external system knows nothing about cannot be
//! represented there, but a status it does not recognize can still be stored
//! verbatim.

use super::MappingConfig;
use crate::error::{BridgeError, Result};
use crate::ticket::Ticket;

/// Map the status into the external vocabulary; unmapped values pass through
pub fn map_status_to_external(ticket: &mut Ticket, config: &MappingConfig) {
    if let Some(mapped) = config.status_to_external.get(&ticket.status) {
        ticket.status = mapped.clone();
    }
}

/// Map the status into the hub vocabulary; unmapped values pass through
pub fn map_status_to_hub(ticket: &mut Ticket, config: &MappingConfig) {
    if let Some(mapped) = config.status_to_hub.get(&ticket.status) {
        ticket.status = mapped.clone();
    }
}

/// Map the priority into the external vocabulary; unmapped values pass through
pub fn map_priority_to_external(ticket: &mut Ticket, config: &MappingConfig) {
    if let Some(mapped) = config.priority_to_external.get(&ticket.priority) {
        ticket.priority = mapped.clone();
    }
}

/// Map a user identity into the external vocabulary
///
/// `None` input maps to `None` without consulting the table. A missing table
/// entry is an error. An entry whose external id is empty yields the original
/// id unchanged.
pub fn map_user_to_external(
    user_id: Option<&str>,
    config: &MappingConfig,
) -> Result<Option<String>> {
    let Some(user_id) = user_id else {
        return Ok(None);
    };

    let mapping = config.user_to_external.get(user_id).ok_or_else(|| {
        BridgeError::Mapping(format!("No external identity mapped for user {}", user_id))
    })?;

    if mapping.external_id.is_empty() {
        return Ok(Some(user_id.to_string()));
    }

    Ok(Some(mapping.external_id.clone()))
}

/// Map a user identity into the hub vocabulary
///
/// `None` input maps to `None` without consulting the table. A missing table
/// entry yields `None`; the caller decides whether to keep the original id.
pub fn map_user_to_hub(user_id: Option<&str>, config: &MappingConfig) -> Option<String> {
    let user_id = user_id?;
    config.user_to_hub.get(user_id).cloned()
}

/// Apply all hub→external mappings to a ticket
///
/// Status and priority are mapped pass-through style; requester, assignee,
/// and every comment and attachment creator go through the hard-error user
/// mapping.
pub fn apply_outbound(ticket: &mut Ticket, config: &MappingConfig) -> Result<()> {
    map_status_to_external(ticket, config);
    map_priority_to_external(ticket, config);

    ticket.requester = map_user_to_external(ticket.requester.as_deref(), config)?;
    ticket.assignee = map_user_to_external(ticket.assignee.as_deref(), config)?;

    for comment in &mut ticket.comments {
        if let Some(mapped) = map_user_to_external(Some(comment.creator.as_str()), config)? {
            comment.creator = mapped;
        }
    }
    for attachment in &mut ticket.attachments {
        if let Some(mapped) = map_user_to_external(Some(attachment.creator.as_str()), config)? {
            attachment.creator = mapped;
        }
    }

    Ok(())
}

/// Apply all external→hub mappings to a ticket
///
/// Status is mapped pass-through style; users that have no inbound entry
/// keep their external identity. Priorities have no inbound table to apply.
pub fn apply_inbound(ticket: &mut Ticket, config: &MappingConfig) {
    map_status_to_hub(ticket, config);

    if let Some(mapped) = map_user_to_hub(ticket.requester.as_deref(), config) {
        ticket.requester = Some(mapped);
    }
    if let Some(mapped) = map_user_to_hub(ticket.assignee.as_deref(), config) {
        ticket.assignee = Some(mapped);
    }

    for comment in &mut ticket.comments {
        if let Some(mapped) = map_user_to_hub(Some(comment.creator.as_str()), config) {
            comment.creator = mapped;
        }
    }
    for attachment in &mut ticket.attachments {
        if let Some(mapped) = map_user_to_hub(Some(attachment.creator.as_str()), config) {
            attachment.creator = mapped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::UserIdMapping;

    fn ticket_with(status: &str, priority: &str) -> Ticket {
        Ticket::new("SYM-1", "https://hub/tickets/SYM-1", "acme", "subject")
            .with_description("description")
            .with_status(status)
            .with_priority(priority)
    }

    #[test]
    fn test_status_mapped_outbound() {
        let config = MappingConfig::new().with_status_to_external("Open", "In progress");
        let mut ticket = ticket_with("Open", "Major");

        map_status_to_external(&mut ticket, &config);
        assert_eq!(ticket.status, "In progress");
    }

    #[test]
    fn test_unmapped_status_passes_through() {
        let config = MappingConfig::new().with_status_to_external("Open", "In progress");
        let mut ticket = ticket_with("ClosePending", "Major");

        map_status_to_external(&mut ticket, &config);
        assert_eq!(ticket.status, "ClosePending");
    }

    #[test]
    fn test_unmapped_priority_passes_through() {
        let config = MappingConfig::new();
        let mut ticket = ticket_with("Open", "Major");

        map_priority_to_external(&mut ticket, &config);
        assert_eq!(ticket.priority, "Major");
    }

    #[test]
    fn test_user_outbound_missing_entry_is_error() {
        let config = MappingConfig::new();
        let result = map_user_to_external(Some("nobody@acme.com"), &config);
        assert!(matches!(result, Err(BridgeError::Mapping(_))));
    }

    #[test]
    fn test_user_outbound_empty_mapping_keeps_original() {
        let config = MappingConfig::new()
            .with_user_to_external("john.doe@acme.com", UserIdMapping::new("", "username"));
        let mapped = map_user_to_external(Some("john.doe@acme.com"), &config).unwrap();
        assert_eq!(mapped.as_deref(), Some("john.doe@acme.com"));
    }

    #[test]
    fn test_absent_user_never_consults_table() {
        // An empty table would error on any lookup; None must short-circuit
        let config = MappingConfig::new();
        assert_eq!(map_user_to_external(None, &config).unwrap(), None);
        assert_eq!(map_user_to_hub(None, &config), None);
    }

    #[test]
    fn test_user_mapping_is_directionally_asymmetric() {
        let config = MappingConfig::new()
            .with_user_to_external("a", UserIdMapping::new("x", "username"));

        let outbound = map_user_to_external(Some("a"), &config).unwrap();
        assert_eq!(outbound.as_deref(), Some("x"));

        // No inbound entry for "x": the mapping stays one-way
        assert_eq!(map_user_to_hub(Some("x"), &config), None);
    }

    #[test]
    fn test_apply_outbound_maps_all_creators() {
        let config = MappingConfig::new()
            .with_status_to_external("Open", "In progress")
            .with_priority_to_external("Major", "5")
            .with_user_to_external("john.doe@acme.com", UserIdMapping::new("jdoe", "username"))
            .with_user_to_external("peter.smith@acme.com", UserIdMapping::new("psmith", "username"));

        let mut ticket = ticket_with("Open", "Major")
            .with_requester("john.doe@acme.com")
            .with_assignee("peter.smith@acme.com")
            .with_comment("john.doe@acme.com", "first");

        apply_outbound(&mut ticket, &config).unwrap();

        assert_eq!(ticket.status, "In progress");
        assert_eq!(ticket.priority, "5");
        assert_eq!(ticket.requester.as_deref(), Some("jdoe"));
        assert_eq!(ticket.assignee.as_deref(), Some("psmith"));
        assert_eq!(ticket.comments[0].creator, "jdoe");
    }

    #[test]
    fn test_apply_inbound_keeps_unmapped_users() {
        let config = MappingConfig::new()
            .with_status_to_hub("Resolved", "Close")
            .with_user_to_hub("jdoe", "john.doe@acme.com");

        let mut ticket = ticket_with("Resolved", "5")
            .with_requester("jdoe")
            .with_assignee("someone-unknown");

        apply_inbound(&mut ticket, &config);

        assert_eq!(ticket.status, "Close");
        assert_eq!(ticket.requester.as_deref(), Some("john.doe@acme.com"));
        // Unknown inbound users keep their external identity
        assert_eq!(ticket.assignee.as_deref(), Some("someone-unknown"));
        // Inbound priorities cross unchanged
        assert_eq!(ticket.priority, "5");
    }
}
