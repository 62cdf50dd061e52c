use std::borrow::Borrow;
use std::fmt;

use crate::semirings::{DivideType, Semiring, SemiringProperties, WeaklyDivisibleSemiring};
use crate::Label;

/// Value carried by a string weight: a label sequence or the `Infinity`
/// sentinel, which is the additive identity and is distinct from the empty
/// sequence (the multiplicative identity).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StringWeightVariant {
    Infinity,
    Labels(Vec<Label>),
}

impl StringWeightVariant {
    pub fn is_infinity(&self) -> bool {
        matches!(self, StringWeightVariant::Infinity)
    }

    pub fn labels(&self) -> Option<&[Label]> {
        match self {
            StringWeightVariant::Infinity => None,
            StringWeightVariant::Labels(l) => Some(l.as_slice()),
        }
    }

    fn concat(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            (StringWeightVariant::Labels(a), StringWeightVariant::Labels(b)) => {
                let mut labels = Vec::with_capacity(a.len() + b.len());
                labels.extend_from_slice(a);
                labels.extend_from_slice(b);
                StringWeightVariant::Labels(labels)
            }
            _ => StringWeightVariant::Infinity,
        }
    }

    fn longest_common_prefix(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            (StringWeightVariant::Infinity, _) => rhs.clone(),
            (_, StringWeightVariant::Infinity) => self.clone(),
            (StringWeightVariant::Labels(a), StringWeightVariant::Labels(b)) => {
                let n = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();
                StringWeightVariant::Labels(a[..n].to_vec())
            }
        }
    }

    fn longest_common_suffix(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            (StringWeightVariant::Infinity, _) => rhs.clone(),
            (_, StringWeightVariant::Infinity) => self.clone(),
            (StringWeightVariant::Labels(a), StringWeightVariant::Labels(b)) => {
                let n = a
                    .iter()
                    .rev()
                    .zip(b.iter().rev())
                    .take_while(|(x, y)| x == y)
                    .count();
                StringWeightVariant::Labels(a[a.len() - n..].to_vec())
            }
        }
    }

    fn reversed(&self) -> Self {
        match self {
            StringWeightVariant::Infinity => StringWeightVariant::Infinity,
            StringWeightVariant::Labels(l) => {
                StringWeightVariant::Labels(l.iter().rev().copied().collect())
            }
        }
    }
}

impl Default for StringWeightVariant {
    fn default() -> Self {
        StringWeightVariant::Labels(vec![])
    }
}

impl fmt::Display for StringWeightVariant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StringWeightVariant::Infinity => write!(f, "Infinity"),
            StringWeightVariant::Labels(l) if l.is_empty() => write!(f, "Epsilon"),
            StringWeightVariant::Labels(l) => {
                for (i, label) in l.iter().enumerate() {
                    if i > 0 {
                        write!(f, "_")?;
                    }
                    write!(f, "{}", label)?;
                }
                Ok(())
            }
        }
    }
}

macro_rules! string_semiring {
    ($semiring:ident, $reverse:ident, $props:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Hash, Default)]
        pub struct $semiring {
            value: StringWeightVariant,
        }

        impl $semiring {
            /// Builds a weight holding a single label.
            pub fn from_label(label: Label) -> Self {
                Self::new(StringWeightVariant::Labels(vec![label]))
            }

            pub fn from_labels(labels: Vec<Label>) -> Self {
                Self::new(StringWeightVariant::Labels(labels))
            }

            pub fn len_labels(&self) -> usize {
                match &self.value {
                    StringWeightVariant::Infinity => 0,
                    StringWeightVariant::Labels(l) => l.len(),
                }
            }
        }

        impl Semiring for $semiring {
            type Type = StringWeightVariant;
            type ReverseWeight = $reverse;

            fn zero() -> Self {
                Self {
                    value: StringWeightVariant::Infinity,
                }
            }

            fn one() -> Self {
                Self {
                    value: StringWeightVariant::Labels(vec![]),
                }
            }

            fn new(value: StringWeightVariant) -> Self {
                Self { value }
            }

            fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) {
                self.value = Self::combine(&self.value, &rhs.borrow().value);
            }

            fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) {
                self.value = self.value.concat(&rhs.borrow().value);
            }

            fn reverse(&self) -> Self::ReverseWeight {
                $reverse::new(self.value.reversed())
            }

            fn value(&self) -> &StringWeightVariant {
                &self.value
            }

            fn take_value(self) -> StringWeightVariant {
                self.value
            }

            fn set_value(&mut self, value: StringWeightVariant) {
                self.value = value;
            }

            fn approx_equal<P: Borrow<Self>>(&self, rhs: P, _delta: f32) -> bool {
                self == rhs.borrow()
            }

            fn is_member(&self) -> bool {
                true
            }

            fn properties() -> SemiringProperties {
                $props
            }
        }

        impl fmt::Display for $semiring {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.value)
            }
        }
    };
}

string_semiring!(
    StringWeightLeft,
    StringWeightRight,
    SemiringProperties::LEFT_SEMIRING.union(SemiringProperties::IDEMPOTENT),
    "String weight whose `Plus` is the longest common prefix; a left \
     semiring under concatenation."
);

string_semiring!(
    StringWeightRight,
    StringWeightLeft,
    SemiringProperties::RIGHT_SEMIRING.union(SemiringProperties::IDEMPOTENT),
    "String weight whose `Plus` is the longest common suffix; a right \
     semiring under concatenation."
);

string_semiring!(
    StringWeightRestrict,
    StringWeightRestrict,
    SemiringProperties::SEMIRING.union(SemiringProperties::IDEMPOTENT),
    "String weight whose `Plus` requires equal operands and yields `Zero` \
     otherwise."
);

impl StringWeightLeft {
    fn combine(a: &StringWeightVariant, b: &StringWeightVariant) -> StringWeightVariant {
        a.longest_common_prefix(b)
    }
}

impl StringWeightRight {
    fn combine(a: &StringWeightVariant, b: &StringWeightVariant) -> StringWeightVariant {
        a.longest_common_suffix(b)
    }
}

impl StringWeightRestrict {
    fn combine(a: &StringWeightVariant, b: &StringWeightVariant) -> StringWeightVariant {
        if a.is_infinity() {
            return b.clone();
        }
        if b.is_infinity() || a == b {
            return a.clone();
        }
        StringWeightVariant::Infinity
    }
}

impl WeaklyDivisibleSemiring for StringWeightLeft {
    /// Left division strips `rhs` as a prefix.
    fn divide_assign(&mut self, rhs: &Self, _divide_type: DivideType) {
        self.value = divide_left(&self.value, &rhs.value);
    }
}

impl WeaklyDivisibleSemiring for StringWeightRight {
    /// Right division strips `rhs` as a suffix.
    fn divide_assign(&mut self, rhs: &Self, _divide_type: DivideType) {
        self.value = divide_right(&self.value, &rhs.value);
    }
}

impl WeaklyDivisibleSemiring for StringWeightRestrict {
    fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType) {
        self.value = match divide_type {
            DivideType::DivideLeft => divide_left(&self.value, &rhs.value),
            DivideType::DivideRight => divide_right(&self.value, &rhs.value),
            DivideType::DivideAny => divide_left(&self.value, &rhs.value),
        };
    }
}

fn divide_left(w: &StringWeightVariant, v: &StringWeightVariant) -> StringWeightVariant {
    match (w, v) {
        (StringWeightVariant::Labels(a), StringWeightVariant::Labels(b)) if a.starts_with(b) => {
            StringWeightVariant::Labels(a[b.len()..].to_vec())
        }
        _ => StringWeightVariant::Infinity,
    }
}

fn divide_right(w: &StringWeightVariant, v: &StringWeightVariant) -> StringWeightVariant {
    match (w, v) {
        (StringWeightVariant::Labels(a), StringWeightVariant::Labels(b)) if a.ends_with(b) => {
            StringWeightVariant::Labels(a[..a.len() - b.len()].to_vec())
        }
        _ => StringWeightVariant::Infinity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_plus_is_lcp() {
        let a = StringWeightLeft::from_labels(vec![1, 2, 3]);
        let b = StringWeightLeft::from_labels(vec![1, 2, 4]);
        assert_eq!(a.plus(b), StringWeightLeft::from_labels(vec![1, 2]));
        assert_eq!(a.plus(StringWeightLeft::zero()), a);
    }

    #[test]
    fn test_right_plus_is_lcs() {
        let a = StringWeightRight::from_labels(vec![3, 1, 2]);
        let b = StringWeightRight::from_labels(vec![4, 1, 2]);
        assert_eq!(a.plus(b), StringWeightRight::from_labels(vec![1, 2]));
    }

    #[test]
    fn test_restrict_plus() {
        let a = StringWeightRestrict::from_labels(vec![1, 2]);
        let b = StringWeightRestrict::from_labels(vec![1, 3]);
        assert_eq!(a.plus(&a), a);
        assert!(a.plus(b).is_zero());
    }

    #[test]
    fn test_times_concat_and_zero_absorbs() {
        let a = StringWeightLeft::from_labels(vec![1]);
        let b = StringWeightLeft::from_labels(vec![2]);
        assert_eq!(a.times(b), StringWeightLeft::from_labels(vec![1, 2]));
        assert!(a.times(StringWeightLeft::zero()).is_zero());
        assert_eq!(a.times(StringWeightLeft::one()), a);
    }

    #[test]
    fn test_reverse_swaps_direction() {
        let a = StringWeightLeft::from_labels(vec![1, 2, 3]);
        let r = a.reverse();
        assert_eq!(r, StringWeightRight::from_labels(vec![3, 2, 1]));
        assert_eq!(r.reverse(), a);
    }

    #[test]
    fn test_divide_left() {
        let ab = StringWeightLeft::from_labels(vec![1, 2]);
        let a = StringWeightLeft::from_labels(vec![1]);
        assert_eq!(
            ab.divide(&a, DivideType::DivideLeft),
            StringWeightLeft::from_labels(vec![2])
        );
    }
}
