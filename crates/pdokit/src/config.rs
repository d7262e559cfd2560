//! Explicit configuration structs. There are no process-wide defaults.

use std::time::Duration;

/// Configuration for statement execution: timeouts, slow-query reporting and
/// SQL logging.
///
/// By default there is no timeout and no slow-query threshold.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Query timeout duration. `None` means no timeout (default).
    pub query_timeout: Option<Duration>,
    /// Queries slower than this are logged at WARN.
    pub slow_query_threshold: Option<Duration>,
    /// Emit a debug event with the SQL of every statement.
    pub log_sql: bool,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            query_timeout: None,
            slow_query_threshold: None,
            log_sql: true,
            max_sql_length: Some(200),
        }
    }
}

impl ExecutorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query timeout duration.
    ///
    /// Statements exceeding it are abandoned with `PdoError::Timeout`.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    pub fn log_sql(mut self, enabled: bool) -> Self {
        self.log_sql = enabled;
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }
}

/// Per-table behaviour of the reader/writer layer.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Serve primary-key reads from the record cache, if one is attached.
    /// Default: `true`.
    pub cache_enabled: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { cache_enabled: true }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }
}

/// Cut `sql` to at most `max` bytes without splitting a character.
pub(crate) fn truncate_sql_bytes(sql: &str, max: usize) -> &str {
    if sql.len() <= max {
        return sql;
    }
    let mut end = max;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ExecutorConfig::new();
        assert!(cfg.query_timeout.is_none());
        assert!(cfg.log_sql);
        assert_eq!(cfg.max_sql_length, Some(200));
        assert!(TableConfig::default().cache_enabled);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("héllo", 2), "h");
        assert_eq!(truncate_sql_bytes("abc", 10), "abc");
    }
}
