use anyhow::Result;

use crate::fst_properties::op_properties::project_properties;
use crate::fst_traits::MutableFst;
use crate::semirings::Semiring;

/// Which side of the relation a projection keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    ProjectInput,
    ProjectOutput,
}

/// Projects a transducer onto an acceptor in place, copying the chosen
/// side's label onto the other side of every transition.
pub fn project<W: Semiring, F: MutableFst<W>>(fst: &mut F, project_type: ProjectType) {
    let props = fst.properties();
    for state in fst.states_range() {
        let mut it = match fst.tr_iter_mut(state) {
            Ok(it) => it,
            Err(_) => continue,
        };
        while let Some(tr) = it.value().cloned() {
            let mut tr = tr;
            match project_type {
                ProjectType::ProjectInput => tr.olabel = tr.ilabel,
                ProjectType::ProjectOutput => tr.ilabel = tr.olabel,
            }
            // Position is in range, the set cannot fail.
            let _ = it.set_value(tr);
            it.next();
        }
    }
    match project_type {
        ProjectType::ProjectInput => {
            if let Some(symt) = fst.input_symbols().cloned() {
                fst.set_output_symbols(symt);
            } else {
                fst.take_output_symbols();
            }
        }
        ProjectType::ProjectOutput => {
            if let Some(symt) = fst.output_symbols().cloned() {
                fst.set_input_symbols(symt);
            } else {
                fst.take_input_symbols();
            }
        }
    }
    fst.set_properties(project_properties(
        props,
        project_type == ProjectType::ProjectInput,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::fst_properties::FstProperties;
    use crate::fst_traits::{CoreFst, Fst};
    use crate::semirings::TropicalWeight;
    use crate::utils::transducer;

    #[test]
    fn test_project_input() -> Result<()> {
        let mut fst: VectorFst<TropicalWeight> =
            transducer(&[1, 2], &[3, 4], TropicalWeight::one());
        project(&mut fst, ProjectType::ProjectInput);
        let paths: Vec<_> = fst.paths_iter().collect();
        assert_eq!(paths[0].ilabels, vec![1, 2]);
        assert_eq!(paths[0].olabels, vec![1, 2]);
        assert!(fst.properties().contains(FstProperties::ACCEPTOR));
        Ok(())
    }

    #[test]
    fn test_project_output() -> Result<()> {
        let mut fst: VectorFst<TropicalWeight> =
            transducer(&[1, 2], &[3, 4], TropicalWeight::one());
        project(&mut fst, ProjectType::ProjectOutput);
        let paths: Vec<_> = fst.paths_iter().collect();
        assert_eq!(paths[0].ilabels, vec![3, 4]);
        Ok(())
    }
}
