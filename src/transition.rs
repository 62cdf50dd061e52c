use std::fmt;

use crate::semirings::Semiring;
use crate::{Label, StateId};

/// Transition of a weighted FST: an edge carrying an input label, an output
/// label, a weight and the id of the destination state.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Hash)]
pub struct Transition<W> {
    /// Input label.
    pub ilabel: Label,
    /// Output label.
    pub olabel: Label,
    /// Weight.
    pub weight: W,
    /// Destination state.
    pub nextstate: StateId,
}

impl<W: Semiring> Transition<W> {
    pub fn new(ilabel: Label, olabel: Label, weight: W, nextstate: StateId) -> Self {
        Self {
            ilabel,
            olabel,
            weight,
            nextstate,
        }
    }

    /// Updates all the fields at once.
    pub fn set_value(&mut self, ilabel: Label, olabel: Label, weight: W, nextstate: StateId) {
        self.ilabel = ilabel;
        self.olabel = olabel;
        self.weight = weight;
        self.nextstate = nextstate;
    }
}

impl<W: fmt::Display> fmt::Display for Transition<W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.ilabel, self.olabel, self.weight, self.nextstate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::{Semiring, TropicalWeight};

    #[test]
    fn test_transition_new() {
        let tr = Transition::new(1, 2, TropicalWeight::new(0.5), 3);
        assert_eq!(tr.ilabel, 1);
        assert_eq!(tr.olabel, 2);
        assert_eq!(tr.weight, TropicalWeight::new(0.5));
        assert_eq!(tr.nextstate, 3);
    }

    #[test]
    fn test_transition_set_value() {
        let mut tr = Transition::new(1, 2, TropicalWeight::new(0.5), 3);
        tr.set_value(4, 5, TropicalWeight::new(1.5), 6);
        assert_eq!(tr, Transition::new(4, 5, TropicalWeight::new(1.5), 6));
    }
}
