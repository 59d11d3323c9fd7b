use std::fmt;

/// Source of the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource {
    /// Request forwarded by the dashboard's web layer
    Web,

    /// Request originated from CLI command
    CLI,

    /// Request originated from system (automated operations)
    System,
}

impl fmt::Display for RequestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Web => "web",
            Self::CLI => "cli",
            Self::System => "system",
        };
        f.write_str(s)
    }
}
