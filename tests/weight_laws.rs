//! Randomized regression tests of the semiring laws, for every concrete
//! and composite weight.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use wfst::semirings::{
    ErrorWeight, ExpectationWeight, GallicWeight, LexicographicWeight, Log64Weight, LogWeight,
    MinMaxWeight, PowerWeight, ProductWeight, RealWeight, Semiring, SemiringProperties,
    SignedLogWeight, SparsePowerWeight, StringWeightLeft, StringWeightRestrict,
    StringWeightRight, TropicalWeight,
};

const TRIALS: usize = 200;
const DELTA: f32 = 5e-2;

fn check_laws<W, G>(mut gen: G)
where
    W: Semiring,
    G: FnMut(&mut StdRng) -> W,
{
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let props = W::properties();
    for _ in 0..TRIALS {
        let a = gen(&mut rng);
        let b = gen(&mut rng);
        let c = gen(&mut rng);
        if !(a.is_member() && b.is_member() && c.is_member()) {
            continue;
        }

        // Identities and annihilation.
        assert_eq!(a.plus(W::zero()), a);
        assert_eq!(W::zero().plus(&a), a);
        assert_eq!(a.times(W::one()), a);
        assert_eq!(W::one().times(&a), a);
        assert!(a.times(W::zero()).is_zero());
        assert!(W::zero().times(&a).is_zero());

        // Plus is commutative and associative.
        assert!(a.plus(&b).approx_equal(b.plus(&a), DELTA));
        assert!(a
            .plus(b.plus(&c))
            .approx_equal(a.plus(&b).plus(&c), DELTA));

        // Times is associative.
        assert!(a
            .times(b.times(&c))
            .approx_equal(a.times(&b).times(&c), DELTA));

        if props.contains(SemiringProperties::LEFT_SEMIRING) {
            let lhs = c.times(a.plus(&b));
            let rhs = c.times(&a).plus(c.times(&b));
            assert!(lhs.approx_equal(rhs, DELTA), "left distributivity");
        }
        if props.contains(SemiringProperties::RIGHT_SEMIRING) {
            let lhs = a.plus(&b).times(&c);
            let rhs = a.times(&c).plus(b.times(&c));
            assert!(lhs.approx_equal(rhs, DELTA), "right distributivity");
        }
        if props.contains(SemiringProperties::COMMUTATIVE) {
            assert!(a.times(&b).approx_equal(b.times(&a), DELTA));
        }
        if props.contains(SemiringProperties::IDEMPOTENT) {
            assert_eq!(a.plus(&a), a);
        }
        if props.contains(SemiringProperties::PATH) {
            let sum = a.plus(&b);
            assert!(sum == a || sum == b, "path property");
        }
    }
}

fn check_reverse<W, G>(mut gen: G)
where
    W: Semiring,
    W::ReverseWeight: Semiring<ReverseWeight = W>,
    G: FnMut(&mut StdRng) -> W,
{
    let mut rng = StdRng::seed_from_u64(0xfeed);
    for _ in 0..TRIALS {
        let a = gen(&mut rng);
        let b = gen(&mut rng);
        if !(a.is_member() && b.is_member()) {
            continue;
        }
        // Reverse is an involution and an anti-homomorphism of Times.
        assert_eq!(a.reverse().reverse(), a);
        assert!(a
            .times(&b)
            .reverse()
            .approx_equal(b.reverse().times(a.reverse()), DELTA));
    }
}

fn random_value(rng: &mut StdRng) -> f32 {
    match rng.gen_range(0..10) {
        0 => 0.0,
        _ => rng.gen_range(0.0..8.0),
    }
}

fn random_tropical(rng: &mut StdRng) -> TropicalWeight {
    if rng.gen_range(0..8) == 0 {
        TropicalWeight::zero()
    } else {
        TropicalWeight::new(random_value(rng))
    }
}

fn random_log(rng: &mut StdRng) -> LogWeight {
    if rng.gen_range(0..8) == 0 {
        LogWeight::zero()
    } else {
        LogWeight::new(random_value(rng))
    }
}

fn random_string_labels(rng: &mut StdRng) -> Vec<usize> {
    let len = rng.gen_range(0..4);
    (0..len).map(|_| rng.gen_range(1..4)).collect()
}

#[test]
fn test_tropical_weight_laws() {
    check_laws(random_tropical);
    check_reverse(random_tropical);
}

#[test]
fn test_log_weight_laws() {
    check_laws(random_log);
    check_reverse(random_log);
}

#[test]
fn test_log64_weight_laws() {
    check_laws(|rng| Log64Weight::new(random_value(rng) as f64));
}

#[test]
fn test_real_weight_laws() {
    check_laws(|rng| RealWeight::new(rng.gen_range(0.0..2.0)));
}

#[test]
fn test_minmax_weight_laws() {
    check_laws(|rng| MinMaxWeight::new(random_value(rng)));
    check_reverse(|rng| MinMaxWeight::new(random_value(rng)));
}

#[test]
fn test_signed_log_weight_laws() {
    // Integer-grid magnitudes keep cancellation either exact or
    // well-conditioned.
    let gen = |rng: &mut StdRng| {
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        SignedLogWeight::new((sign, rng.gen_range(1..8) as f32))
    };
    check_laws(gen);
}

#[test]
fn test_string_weight_laws() {
    check_laws(|rng| {
        if rng.gen_range(0..8) == 0 {
            StringWeightLeft::zero()
        } else {
            StringWeightLeft::from_labels(random_string_labels(rng))
        }
    });
    check_laws(|rng| StringWeightRight::from_labels(random_string_labels(rng)));
    check_laws(|rng| StringWeightRestrict::from_labels(random_string_labels(rng)));
    check_reverse(|rng| StringWeightLeft::from_labels(random_string_labels(rng)));
}

#[test]
fn test_product_weight_laws() {
    check_laws(|rng| {
        ProductWeight::from_parts(random_tropical(rng), random_log(rng))
    });
    check_reverse(|rng| {
        ProductWeight::from_parts(random_tropical(rng), random_tropical(rng))
    });
}

#[test]
fn test_lexicographic_weight_laws() {
    check_laws(|rng| {
        // Members need both components Zero or both non-Zero.
        if rng.gen_range(0..8) == 0 {
            LexicographicWeight::zero()
        } else {
            LexicographicWeight::from_parts(
                TropicalWeight::new(random_value(rng)),
                TropicalWeight::new(random_value(rng)),
            )
        }
    });
}

#[test]
fn test_power_weight_laws() {
    check_laws(|rng| {
        PowerWeight::<TropicalWeight, 3>::new([
            random_tropical(rng),
            random_tropical(rng),
            random_tropical(rng),
        ])
    });
}

#[test]
fn test_sparse_power_weight_laws() {
    check_laws(|rng| {
        let n = rng.gen_range(0..3);
        SparsePowerWeight::new(
            (0..n)
                .map(|_| (rng.gen_range(0..4), random_tropical(rng)))
                .collect(),
        )
    });
}

#[test]
fn test_gallic_weight_laws() {
    // Gallic Plus requires equal strings; random pairs with a small label
    // pool still exercise the equal case, the rest short-circuits through
    // Zero handling.
    check_laws(|rng| {
        if rng.gen_range(0..4) == 0 {
            GallicWeight::zero()
        } else {
            GallicWeight::from_label_weight(1, random_tropical(rng))
        }
    });
}

#[test]
fn test_expectation_weight_laws() {
    check_laws(|rng| {
        ExpectationWeight::from_parts(
            RealWeight::new(rng.gen_range(0.0..2.0)),
            RealWeight::new(rng.gen_range(0.0..2.0)),
        )
    });
}

#[test]
fn test_error_weight_laws() {
    // The single bottom element: every law holds trivially and membership
    // is always false.
    let e = ErrorWeight::new();
    assert_eq!(e.plus(e), e);
    assert_eq!(e.times(e), e);
    assert!(!e.is_member());
}
