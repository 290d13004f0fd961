use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

/// Counters collected by one search run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchMetrics {
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
    /// Distinct states ever registered.
    pub known_states: usize,
    /// States whose successors were generated.
    pub expanded_states: usize,
    /// Successor evaluations, revisits included, plus the initial state.
    pub visited_states: usize,
    /// The expansion budget ran out before the frontier did.
    pub budget_exhausted: bool,
}

fn as_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

impl fmt::Display for SearchMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Time taken: {:.3} s", self.elapsed.as_secs_f64())?;
        writeln!(f, "Frontier nodes: {}", self.known_states)?;
        writeln!(f, "Expanded nodes: {}", self.expanded_states)?;
        write!(f, "Visited nodes: {}", self.visited_states)?;
        if self.budget_exhausted {
            write!(f, "\nExpansion budget exhausted")?;
        }
        Ok(())
    }
}
