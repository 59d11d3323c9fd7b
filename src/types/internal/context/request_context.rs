use std::net::IpAddr;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Carries caller attribution (who, from where) into activity records and
/// tracing spans. The core never interprets the network origin, it only
/// records it.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// User-agent string as sent by the client
    pub user_agent: Option<String>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Source of the request (web, CLI, or system)
    pub source: RequestSource,

    /// Actor who initiated the operation, recorded as granted-by/modified-by
    pub actor: String,
}

impl RequestContext {
    /// Create a context for a request forwarded by the web layer
    ///
    /// The actor starts as "anonymous" and is replaced with the principal's
    /// username once the caller has authenticated.
    pub fn for_web() -> Self {
        Self {
            ip_address: None,
            user_agent: None,
            request_id: RequestId::generate(),
            source: RequestSource::Web,
            actor: "anonymous".to_owned(),
        }
    }

    /// Create a RequestContext for CLI operations
    ///
    /// # Arguments
    /// * `command_name` - Name of the CLI command being executed
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            ip_address: None,
            user_agent: None,
            request_id: RequestId::generate(),
            source: RequestSource::CLI,
            actor: format!("cli:{}", command_name),
        }
    }

    /// Create a RequestContext for system operations
    ///
    /// # Arguments
    /// * `operation_name` - Name of the system operation being executed
    pub fn for_system(operation_name: &str) -> Self {
        Self {
            ip_address: None,
            user_agent: None,
            request_id: RequestId::generate(),
            source: RequestSource::System,
            actor: format!("system:{}", operation_name),
        }
    }

    /// Set the ip_address
    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }
}
