use std::fmt::Debug;
use std::hash::Hash;

/// State of a compose filter; together with the pair of operand states it
/// parameterises a composition state.
pub trait FilterState: Clone + Debug + PartialEq + Eq + Hash {
    type Type;

    fn new(value: Self::Type) -> Self;

    /// The rejecting state: a transition pair mapped here is dropped.
    fn new_no_state() -> Self;

    fn is_no_state(&self) -> bool;
}

/// Filter state carrying no information beyond validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrivialFilterState {
    state: bool,
}

impl FilterState for TrivialFilterState {
    type Type = bool;

    fn new(value: bool) -> Self {
        Self { state: value }
    }

    fn new_no_state() -> Self {
        Self { state: false }
    }

    fn is_no_state(&self) -> bool {
        !self.state
    }
}

/// Filter state holding a small integer, the common case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerFilterState {
    state: Option<usize>,
}

impl IntegerFilterState {
    pub fn state(&self) -> Option<usize> {
        self.state
    }
}

impl FilterState for IntegerFilterState {
    type Type = usize;

    fn new(value: usize) -> Self {
        Self { state: Some(value) }
    }

    fn new_no_state() -> Self {
        Self { state: None }
    }

    fn is_no_state(&self) -> bool {
        self.state.is_none()
    }
}

/// Product of two filter states, rejecting when either side rejects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairFilterState<FS1, FS2> {
    state: (FS1, FS2),
}

impl<FS1: FilterState, FS2: FilterState> PairFilterState<FS1, FS2> {
    pub fn state1(&self) -> &FS1 {
        &self.state.0
    }

    pub fn state2(&self) -> &FS2 {
        &self.state.1
    }
}

impl<FS1: FilterState, FS2: FilterState> FilterState for PairFilterState<FS1, FS2> {
    type Type = (FS1, FS2);

    fn new(value: (FS1, FS2)) -> Self {
        Self { state: value }
    }

    fn new_no_state() -> Self {
        Self {
            state: (FS1::new_no_state(), FS2::new_no_state()),
        }
    }

    fn is_no_state(&self) -> bool {
        self.state.0.is_no_state() || self.state.1.is_no_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_filter_state() {
        let a = IntegerFilterState::new(1);
        let b = IntegerFilterState::new(1);
        let no = IntegerFilterState::new_no_state();
        assert_eq!(a, b);
        assert!(no.is_no_state());
        assert!(!a.is_no_state());
    }
}
