pub const DEFAULT_CALLER_TYPE: &str = "mobile";

/// Caller resolved from an authenticated web session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: String,
}

/// Caller resolved from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobileIdentity {
    pub id: String,
    /// Web account this mobile user is linked to, if any.
    pub account_id: Option<String>,
    pub email: Option<String>,
    pub caller_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Session(SessionIdentity),
    Mobile(MobileIdentity),
}

impl Identity {
    pub fn id(&self) -> &str {
        match self {
            Identity::Session(session) => &session.user_id,
            Identity::Mobile(mobile) => &mobile.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Identity::Session(_) => "session",
            Identity::Mobile(_) => "mobile",
        }
    }

    /// Ownership predicate used to scope every read and write for this caller.
    pub fn owner_scope(&self) -> OwnerScope {
        match self {
            Identity::Session(session) => OwnerScope {
                session_owner: non_empty(&session.user_id),
                mobile_owner: None,
            },
            Identity::Mobile(mobile) => OwnerScope {
                session_owner: mobile.account_id.as_deref().and_then(non_empty),
                mobile_owner: non_empty(&mobile.id),
            },
        }
    }

    /// Ownership fields stamped on an invoice this caller creates.
    pub fn creation_owner(&self) -> InvoiceOwner {
        match self {
            Identity::Session(session) => InvoiceOwner {
                owner_session_id: Some(session.user_id.clone()),
                owner_mobile_id: None,
            },
            Identity::Mobile(mobile) => InvoiceOwner {
                owner_session_id: None,
                owner_mobile_id: Some(mobile.id.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceOwner {
    pub owner_session_id: Option<String>,
    pub owner_mobile_id: Option<String>,
}

/// Values an invoice's ownership fields are compared against.
///
/// A record is owned when any present value equals the matching field.
/// An empty scope owns nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerScope {
    pub session_owner: Option<String>,
    pub mobile_owner: Option<String>,
}

impl OwnerScope {
    pub fn is_empty(&self) -> bool {
        self.session_owner.is_none() && self.mobile_owner.is_none()
    }

    pub fn permits(&self, owner_session_id: Option<&str>, owner_mobile_id: Option<&str>) -> bool {
        let session_match = matches!(
            (self.session_owner.as_deref(), owner_session_id),
            (Some(expected), Some(actual)) if expected == actual
        );
        let mobile_match = matches!(
            (self.mobile_owner.as_deref(), owner_mobile_id),
            (Some(expected), Some(actual)) if expected == actual
        );

        session_match || mobile_match
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
