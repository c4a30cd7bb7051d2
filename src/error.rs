use custom_error::custom_error;

custom_error! {
    /// Failures while resolving flags and environment variables.
    pub ConfigError
    MissingSetting{name: &'static str, flag: &'static str, env: &'static str} = "No {name} was provided. Either provide it as a {flag} argument or set an environment variable called '{env}'",
    InvalidGroupId{origin: &'static str, value: String} = "Invalid variable group id '{value}' from {origin}: expected a positive integer",
    InvalidLogLevel{value: String} = "Invalid log level '{value}' in 'VGDIFF_LOG': expected off, error, warn, info, debug or trace",
    DuplicateGroupId{id: u32} = "Both variable group ids are {id}; provide two different groups to compare",
}

custom_error! {
    /// Failures after the request was sent: bad status or unusable payload.
    pub FetchError
    AuthenticationRejected{status: u16} = "Azure DevOps rejected the personal access token (HTTP {status}); check that it is valid and can read variable groups",
    UnexpectedStatus{status: u16, body: String} = "Azure DevOps answered with HTTP {status}: {body}",
    InsufficientGroups{returned: usize} = "Insufficient groups returned: expected 2 variable groups, got {returned}",
    GroupNotReturned{id: u32} = "Variable group {id} was not returned by Azure DevOps",
}
