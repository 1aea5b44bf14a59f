//! Structural ticket validation
//!
//! Applied at the protocol boundary before a ticket is mapped or transmitted
//! in either direction. Validation is fail-fast: the first missing field is
//! reported and checking stops there.

use crate::error::{BridgeError, Result};
use crate::ticket::Ticket;

/// Check a ticket for structural completeness
///
/// Required non-empty: hub id, hub link, subject, tenant id, description,
/// priority, status. Every comment needs a creator and text; every attachment
/// needs a name, creator, link, and size.
pub fn validate(ticket: &Ticket) -> Result<()> {
    require(&ticket.hub_id, "ticket.hub_id")?;
    require(&ticket.hub_link, "ticket.hub_link")?;
    require(&ticket.subject, "ticket.subject")?;
    require(ticket.tenant_id.as_str(), "ticket.tenant_id")?;
    require(&ticket.description, "ticket.description")?;
    require(&ticket.priority, "ticket.priority")?;
    require(&ticket.status, "ticket.status")?;

    for comment in &ticket.comments {
        require(&comment.creator, "comment.creator")?;
        require(&comment.text, "comment.text")?;
    }

    for attachment in &ticket.attachments {
        require(&attachment.name, "attachment.name")?;
        require(&attachment.creator, "attachment.creator")?;
        require(&attachment.link, "attachment.link")?;
        if attachment.size.is_none() {
            return Err(BridgeError::missing_field("attachment.size"));
        }
    }

    Ok(())
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.is_empty() {
        return Err(BridgeError::missing_field(field));
    }
    Ok(())
}
