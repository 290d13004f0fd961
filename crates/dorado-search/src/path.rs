use crate::ActionId;

/// One step of a solution: the action taken (none for the initial state) and
/// the state it led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep<S> {
    pub action: Option<ActionId>,
    pub state: S,
}

/// Solution path in forward order, starting with the initial state.
///
/// An empty path means no solution was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path<S> {
    pub steps: Vec<PathStep<S>>,
}

impl<S> Default for Path<S> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<S> Path<S> {
    pub fn new(steps: Vec<PathStep<S>>) -> Self {
        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_solved(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Actions in execution order.
    pub fn actions(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.steps.iter().filter_map(|step| step.action)
    }

    /// Number of actions (one less than the number of steps).
    pub fn len(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn final_state(&self) -> Option<&S> {
        self.steps.last().map(|step| &step.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path_is_unsolved() {
        let path = Path::<u8>::default();
        assert!(!path.is_solved());
        assert_eq!(path.len(), 0);
        assert_eq!(path.final_state(), None);
    }

    #[test]
    fn test_actions_skip_initial_step() {
        let path = Path::new(vec![
            PathStep {
                action: None,
                state: 0u8,
            },
            PathStep {
                action: Some(ActionId(3)),
                state: 1,
            },
        ]);
        assert_eq!(path.actions().collect::<Vec<_>>(), vec![ActionId(3)]);
        assert_eq!(path.len(), 1);
        assert_eq!(path.final_state(), Some(&1));
    }
}
