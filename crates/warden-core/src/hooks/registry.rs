//! Hook registry
//!
//! Holds the ordered matcher list for every hook point. A registry is plain
//! configuration; it is handed to a [`HookEngine`](super::HookEngine), which
//! never mutates it.

use std::collections::HashMap;

use super::matcher::HookMatcher;
use super::types::HookPoint;

/// Ordered matchers per hook point
#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
    matchers: HashMap<HookPoint, Vec<HookMatcher>>,
}

impl HookRegistry {
    /// Create a new empty hook registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a matcher to a point; matchers run in registration order
    pub fn register(&mut self, point: HookPoint, matcher: HookMatcher) -> &mut Self {
        self.matchers.entry(point).or_default().push(matcher);
        self
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, point: HookPoint, matcher: HookMatcher) -> Self {
        self.register(point, matcher);
        self
    }

    /// Register several matchers for one point, keeping their order
    pub fn register_all(
        &mut self,
        point: HookPoint,
        matchers: impl IntoIterator<Item = HookMatcher>,
    ) -> &mut Self {
        self.matchers.entry(point).or_default().extend(matchers);
        self
    }

    /// The matchers registered for a point, in order
    pub fn matchers_for(&self, point: HookPoint) -> &[HookMatcher] {
        self.matchers.get(&point).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_hooks(&self, point: HookPoint) -> bool {
        !self.matchers_for(point).is_empty()
    }

    /// Points with at least one matcher, in lifecycle order
    pub fn list_points(&self) -> Vec<HookPoint> {
        HookPoint::all()
            .iter()
            .copied()
            .filter(|point| self.has_hooks(*point))
            .collect()
    }

    /// Total number of registered matchers
    pub fn count(&self) -> usize {
        self.matchers.values().map(Vec::len).sum()
    }

    /// Move every matcher of `other` after this registry's own
    pub fn extend(&mut self, other: HookRegistry) {
        for point in HookPoint::all() {
            if let Some(list) = other.matchers.get(point) {
                self.register_all(*point, list.iter().cloned());
            }
        }
    }
}
