use anyhow::{bail, Result};

use crate::algorithms::compose::compose;
use crate::fst_properties::FstProperties;
use crate::fst_traits::{ExpandedFst, MutableFst};
use crate::semirings::Semiring;

/// Intersection of two acceptors: the composition specialised to the case
/// where both operands have equal labels on every transition.
pub fn intersect<W, F1, F2, F3>(fst1: &F1, fst2: &F2) -> Result<F3>
where
    W: Semiring,
    F1: ExpandedFst<W>,
    F2: ExpandedFst<W>,
    F3: MutableFst<W>,
{
    let props1 = fst1.properties_check(FstProperties::ACCEPTOR)?;
    let props2 = fst2.properties_check(FstProperties::ACCEPTOR)?;
    if !props1.contains(FstProperties::ACCEPTOR) || !props2.contains(FstProperties::ACCEPTOR) {
        bail!("intersect: operands must be acceptors");
    }
    compose(fst1.clone(), fst2.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::Fst;
    use crate::semirings::TropicalWeight;
    use crate::utils::{acceptor, transducer};

    #[test]
    fn test_intersect_acceptors() -> Result<()> {
        let mut a: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::new(1.0));
        let b: VectorFst<TropicalWeight> = acceptor(&[2], TropicalWeight::new(2.0));
        crate::algorithms::union::union(&mut a, &b)?;
        let c: VectorFst<TropicalWeight> = acceptor(&[2], TropicalWeight::new(0.5));
        let inter: VectorFst<TropicalWeight> = intersect(&a, &c)?;
        let paths: Vec<_> = inter.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ilabels, vec![2]);
        assert_eq!(paths[0].weight, TropicalWeight::new(2.5));
        Ok(())
    }

    #[test]
    fn test_intersect_rejects_transducer() {
        let a: VectorFst<TropicalWeight> = transducer(&[1], &[2], TropicalWeight::one());
        let b: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::one());
        let result: Result<VectorFst<TropicalWeight>> = intersect(&a, &b);
        assert!(result.is_err());
    }
}
