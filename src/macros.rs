/// Forwards the whole `Fst` trait surface of a single-field wrapper to its
/// inner delayed FST.
macro_rules! delegate_fst_newtype {
    ($ty:ident, $inner:ty) => {
        impl<W: crate::semirings::Semiring> crate::fst_traits::CoreFst<W> for $ty<W> {
            type TRS = <$inner as crate::fst_traits::CoreFst<W>>::TRS;

            fn start(&self) -> Option<crate::StateId> {
                self.0.start()
            }

            fn final_weight(&self, state_id: crate::StateId) -> anyhow::Result<Option<W>> {
                self.0.final_weight(state_id)
            }

            unsafe fn final_weight_unchecked(&self, state_id: crate::StateId) -> Option<W> {
                self.0.final_weight_unchecked(state_id)
            }

            fn num_trs(&self, state_id: crate::StateId) -> anyhow::Result<usize> {
                self.0.num_trs(state_id)
            }

            unsafe fn num_trs_unchecked(&self, state_id: crate::StateId) -> usize {
                self.0.num_trs_unchecked(state_id)
            }

            fn get_trs(&self, state_id: crate::StateId) -> anyhow::Result<Self::TRS> {
                self.0.get_trs(state_id)
            }

            unsafe fn get_trs_unchecked(&self, state_id: crate::StateId) -> Self::TRS {
                self.0.get_trs_unchecked(state_id)
            }

            fn properties(&self) -> crate::fst_properties::FstProperties {
                self.0.properties()
            }

            fn num_input_epsilons(&self, state_id: crate::StateId) -> anyhow::Result<usize> {
                self.0.num_input_epsilons(state_id)
            }

            fn num_output_epsilons(&self, state_id: crate::StateId) -> anyhow::Result<usize> {
                self.0.num_output_epsilons(state_id)
            }
        }

        impl<'a, W: crate::semirings::Semiring> crate::fst_traits::StateIterator<'a> for $ty<W> {
            type Iter = <$inner as crate::fst_traits::StateIterator<'a>>::Iter;

            fn states_iter(&'a self) -> Self::Iter {
                self.0.states_iter()
            }
        }

        impl<'a, W: crate::semirings::Semiring> crate::fst_traits::FstIterator<'a, W> for $ty<W> {
            type FstIter = <$inner as crate::fst_traits::FstIterator<'a, W>>::FstIter;

            fn fst_iter(&'a self) -> Self::FstIter {
                self.0.fst_iter()
            }
        }

        impl<W: crate::semirings::Semiring> crate::fst_traits::Fst<W> for $ty<W> {
            fn input_symbols(&self) -> Option<&std::sync::Arc<crate::SymbolTable>> {
                self.0.input_symbols()
            }

            fn output_symbols(&self) -> Option<&std::sync::Arc<crate::SymbolTable>> {
                self.0.output_symbols()
            }

            fn set_input_symbols(&mut self, symt: std::sync::Arc<crate::SymbolTable>) {
                self.0.set_input_symbols(symt)
            }

            fn set_output_symbols(&mut self, symt: std::sync::Arc<crate::SymbolTable>) {
                self.0.set_output_symbols(symt)
            }

            fn take_input_symbols(&mut self) -> Option<std::sync::Arc<crate::SymbolTable>> {
                self.0.take_input_symbols()
            }

            fn take_output_symbols(&mut self) -> Option<std::sync::Arc<crate::SymbolTable>> {
                self.0.take_output_symbols()
            }
        }
    };
}

/// Comparison, hashing and display boilerplate shared by the weights backed
/// by a single floating-point value. Equality and ordering go through
/// `KDELTA` quantization so that values within the same grid cell compare
/// equal and hash identically.
macro_rules! float_weight_impls {
    ($semiring:ident<$f:ident>) => {
        impl<$f: Float> std::cmp::PartialEq for $semiring<$f> {
            fn eq(&self, other: &Self) -> bool {
                self.value.quantize(crate::KDELTA).canonical_bits()
                    == other.value.quantize(crate::KDELTA).canonical_bits()
            }
        }

        impl<$f: Float> std::cmp::Eq for $semiring<$f> {}

        impl<$f: Float> std::cmp::PartialOrd for $semiring<$f> {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                self.value
                    .quantize(crate::KDELTA)
                    .partial_cmp(&other.value.quantize(crate::KDELTA))
            }
        }

        impl<$f: Float> std::hash::Hash for $semiring<$f> {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                state.write_u64(self.value.quantize(crate::KDELTA).canonical_bits());
            }
        }

        impl<$f: Float> std::fmt::Display for $semiring<$f> {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.value)
            }
        }

        impl<$f: Float> std::default::Default for $semiring<$f> {
            fn default() -> Self {
                Self::one()
            }
        }

        impl<$f: Float> From<$f> for $semiring<$f> {
            fn from(value: $f) -> Self {
                Self::new(value)
            }
        }
    };
    ($semiring:ident) => {
        impl std::cmp::PartialEq for $semiring {
            fn eq(&self, other: &Self) -> bool {
                self.value.quantize(crate::KDELTA).canonical_bits()
                    == other.value.quantize(crate::KDELTA).canonical_bits()
            }
        }

        impl std::cmp::Eq for $semiring {}

        impl std::cmp::PartialOrd for $semiring {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                self.value
                    .quantize(crate::KDELTA)
                    .partial_cmp(&other.value.quantize(crate::KDELTA))
            }
        }

        impl std::hash::Hash for $semiring {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                state.write_u64(self.value.quantize(crate::KDELTA).canonical_bits());
            }
        }

        impl std::fmt::Display for $semiring {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.value)
            }
        }

        impl std::default::Default for $semiring {
            fn default() -> Self {
                Self::one()
            }
        }

        impl From<f32> for $semiring {
            fn from(value: f32) -> Self {
                Self::new(value)
            }
        }
    };
}

/// Text and binary serialization for a weight backed by a single float.
macro_rules! float_weight_serializable {
    ($semiring:ident<$f:ident>, $weight_type:expr) => {
        impl<$f: Float> crate::semirings::SerializableSemiring for $semiring<$f> {
            fn weight_type() -> String {
                format!("{}{}", $weight_type, $f::float_type_suffix())
            }

            fn parse_text(i: &str) -> nom::IResult<&str, Self> {
                let (i, value) = $f::parse_text(i)?;
                Ok((i, Self::new(value)))
            }

            fn read_binary<R: std::io::Read>(reader: &mut R) -> anyhow::Result<Self> {
                Ok(Self::new($f::read_binary(reader)?))
            }

            fn write_binary<W: std::io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
                self.value.write_binary(writer)
            }
        }
    };
    ($semiring:ident, $weight_type:expr) => {
        impl crate::semirings::SerializableSemiring for $semiring {
            fn weight_type() -> String {
                $weight_type.to_string()
            }

            fn parse_text(i: &str) -> nom::IResult<&str, Self> {
                let (i, value) = <f32 as crate::semirings::Float>::parse_text(i)?;
                Ok((i, Self::new(value)))
            }

            fn read_binary<R: std::io::Read>(reader: &mut R) -> anyhow::Result<Self> {
                Ok(Self::new(<f32 as crate::semirings::Float>::read_binary(
                    reader,
                )?))
            }

            fn write_binary<W: std::io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
                self.value.write_binary(writer)
            }
        }
    };
}
