use std::collections::BTreeMap;

use super::invocation::InvocationResult;

const MISSING_RESULT: &str = "invocation result missing";

/// Complete set of outcomes for one prompt, keyed by backend name.
///
/// Arrival order never leaks out: iteration is always by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    results: BTreeMap<String, InvocationResult>,
}

impl Batch {
    /// Collects exactly one result per expected backend name.
    ///
    /// A name that produced nothing gets a failure entry; a second result for
    /// the same name and results for names that were never dispatched are
    /// dropped.
    pub fn collect<I>(expected: &[String], results: I) -> Self
    where
        I: IntoIterator<Item = InvocationResult>,
    {
        let mut collected = BTreeMap::new();
        for result in results {
            if !expected.contains(&result.backend_name) {
                log::warn!(
                    "Dropping result for undispatched backend {}",
                    result.backend_name
                );
                continue;
            }
            if collected.contains_key(&result.backend_name) {
                log::warn!("Dropping duplicate result for {}", result.backend_name);
                continue;
            }
            collected.insert(result.backend_name.clone(), result);
        }

        for name in expected {
            if !collected.contains_key(name) {
                log::warn!("No result arrived for {name}");
                collected.insert(name.clone(), InvocationResult::failure(name, 0, MISSING_RESULT));
            }
        }

        Self { results: collected }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, backend_name: &str) -> Option<&InvocationResult> {
        self.results.get(backend_name)
    }

    /// Results ordered by backend name.
    pub fn iter(&self) -> impl Iterator<Item = &InvocationResult> {
        self.results.values()
    }

    pub fn failures(&self) -> usize {
        self.iter().filter(|r| !r.is_success()).count()
    }

    pub fn into_results(self) -> Vec<InvocationResult> {
        self.results.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::Timings;

    fn ok(name: &str, msg: &str) -> InvocationResult {
        InvocationResult {
            backend_name: name.to_string(),
            numeric_id: 1,
            message: msg.to_string(),
            done: true,
            timings: Timings::default(),
            error: None,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn arrival_order_does_not_matter() {
        let expected = names(&["a", "b", "c"]);
        let forward = Batch::collect(&expected, vec![ok("a", "1"), ok("b", "2"), ok("c", "3")]);
        let reverse = Batch::collect(&expected, vec![ok("c", "3"), ok("a", "1"), ok("b", "2")]);
        assert_eq!(forward, reverse);
        let order: Vec<_> = forward.iter().map(|r| r.backend_name.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn missing_results_become_failures() {
        let batch = Batch::collect(&names(&["a", "b"]), vec![ok("a", "1")]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.failures(), 1);
        assert_eq!(batch.get("b").unwrap().error.as_deref(), Some(MISSING_RESULT));
    }

    #[test]
    fn duplicates_and_strangers_are_dropped() {
        let batch = Batch::collect(
            &names(&["a"]),
            vec![ok("a", "first"), ok("a", "second"), ok("z", "?")],
        );
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.get("a").unwrap().message, "first");
        assert!(batch.get("z").is_none());
    }
}
