// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Trace filtering

use super::event::{ApiCategory, TraceEvent};

/// Filter rule for trace events
#[derive(Debug, Clone)]
pub enum FilterRule {
    /// Include all events
    All,
    /// Include only specific entry points (exact match)
    Function(Vec<String>),
    /// Include entry points matching a pattern (`*` and `?` wildcards)
    Pattern(String),
    /// Include only specific categories
    Category(Vec<ApiCategory>),
}

impl FilterRule {
    fn matches(&self, event: &TraceEvent) -> bool {
        match self {
            FilterRule::All => true,
            FilterRule::Function(names) => names.iter().any(|name| name == &event.function),
            FilterRule::Pattern(pattern) => matches_pattern(&event.function, pattern),
            FilterRule::Category(categories) => categories.contains(&event.category),
        }
    }
}

/// Trace filter configuration
///
/// An event is traced when any rule matches it.
#[derive(Debug, Clone)]
pub struct TraceFilter {
    rules: Vec<FilterRule>,
}

impl Default for TraceFilter {
    fn default() -> Self {
        Self {
            rules: vec![FilterRule::All],
        }
    }
}

impl TraceFilter {
    /// Create a new filter that includes all events
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter rule
    ///
    /// The first specific rule replaces the default catch-all.
    #[must_use]
    pub fn add_rule(mut self, rule: FilterRule) -> Self {
        if matches!(self.rules.as_slice(), [FilterRule::All]) {
            self.rules.clear();
        }
        self.rules.push(rule);
        self
    }

    /// Check if an event should be included based on the filter rules
    pub fn should_trace(&self, event: &TraceEvent) -> bool {
        self.rules.is_empty() || self.rules.iter().any(|rule| rule.matches(event))
    }
}

/// Wildcard match with `*` (any run) and `?` (one character).
///
/// Greedy with backtracking to the last `*`, so the cost stays linear in
/// practice for entry-point names.
fn matches_pattern(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut t, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                star = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match star {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    star = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}
