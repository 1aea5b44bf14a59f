//! Ticket record
//!
//! The canonical record exchanged across the boundary in both directions.
//! The same shape is used for the hub's view and the external system's view;
//! only the vocabulary of status/priority/user fields differs.

use super::TenantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A ticket crossing the sync boundary
///
/// `hub_id` and `external_id` are each set exactly once: the hub id arrives
/// with the first inbound sync, the external id is assigned by the external
/// store on first acceptance. All later updates refer to the same pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Identifier on the hub side
    pub hub_id: String,

    /// Deep link into the hub
    pub hub_link: String,

    /// Identifier in the external system, assigned on first acceptance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Deep link into the external system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,

    /// Tenant whose mapping config applies to this ticket
    pub tenant_id: TenantId,

    /// Ticket subject
    pub subject: String,

    /// Ticket description
    pub description: String,

    /// Status, in whichever system's vocabulary the ticket currently sits
    pub status: String,

    /// Priority, same convention as status
    pub priority: String,

    /// Requester identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester: Option<String>,

    /// Assignee identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Last modification timestamp
    pub last_modified: DateTime<Utc>,

    /// Comments on the ticket
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,

    /// Attachments on the ticket
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// A ticket comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Identity of the comment author
    pub creator: String,

    /// Comment body
    pub text: String,
}

/// A ticket attachment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// File name
    pub name: String,

    /// Identity of the uploader
    pub creator: String,

    /// Link to the attachment content
    pub link: String,

    /// Size in bytes; `None` means the source system never reported one
    pub size: Option<u64>,
}

impl Ticket {
    /// Create a ticket as the hub would first present it
    pub fn new(
        hub_id: impl Into<String>,
        hub_link: impl Into<String>,
        tenant_id: impl Into<TenantId>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            hub_id: hub_id.into(),
            hub_link: hub_link.into(),
            external_id: None,
            external_link: None,
            tenant_id: tenant_id.into(),
            subject: subject.into(),
            description: String::new(),
            status: String::new(),
            priority: String::new(),
            requester: None,
            assignee: None,
            last_modified: Utc::now(),
            comments: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Set the requester identity
    pub fn with_requester(mut self, requester: impl Into<String>) -> Self {
        self.requester = Some(requester.into());
        self
    }

    /// Set the assignee identity
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Add a comment
    pub fn with_comment(mut self, creator: impl Into<String>, text: impl Into<String>) -> Self {
        self.comments.push(Comment {
            creator: creator.into(),
            text: text.into(),
        });
        self
    }

    /// Add an attachment
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Bump the last-modified timestamp to now
    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }
}
