//! Failure injection for the mock collaborators.

use std::collections::HashMap;

/// How an injected failure surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureMode {
    /// The command ran and exited with this code.
    Exit(i32),
    /// The command could not be run at all.
    Error(String),
}

/// Failure configuration for one matcher
#[derive(Debug, Clone)]
pub struct FailureConfig {
    pub mode: FailureMode,
    /// Number of times to fail before succeeding (None = always fail)
    pub fail_count: Option<u32>,
}

impl FailureConfig {
    pub fn new(mode: FailureMode) -> Self {
        Self {
            mode,
            fail_count: None,
        }
    }

    /// Set the number of times to fail before succeeding
    pub fn with_fail_count(mut self, count: u32) -> Self {
        self.fail_count = Some(count);
        self
    }
}

/// Failures keyed by a substring of the call subject (a source path, an
/// asset id). The first matcher, in insertion order, that is contained in
/// the subject applies.
#[derive(Debug, Default)]
pub struct FailureInjector {
    configs: Vec<(String, FailureConfig)>,
    call_counts: HashMap<String, u32>,
}

impl FailureInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inject(&mut self, matcher: impl Into<String>, config: FailureConfig) {
        let matcher = matcher.into();
        self.call_counts.insert(matcher.clone(), 0);
        self.configs.retain(|(m, _)| *m != matcher);
        self.configs.push((matcher, config));
    }

    /// The failure to apply to a call on `subject`, if any.
    pub fn check(&mut self, subject: &str) -> Option<FailureMode> {
        let (matcher, config) = self
            .configs
            .iter()
            .find(|(matcher, _)| subject.contains(matcher.as_str()))?;

        let count = self.call_counts.entry(matcher.clone()).or_insert(0);
        *count += 1;
        if let Some(limit) = config.fail_count {
            if *count > limit {
                return None;
            }
        }
        Some(config.mode.clone())
    }
}
