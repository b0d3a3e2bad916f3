use std::cmp::Ordering;

use crate::compare::Compare;

/// The engine key of an interval stored in an [`AabbTree`](crate::AabbTree).
///
/// Ordered by the interval's lower bound, tie-broken by insertion sequence so
/// that intervals sharing a lower bound are kept in the order they were
/// inserted rather than rejected as duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct LowerBound<S> {
    value: S,
    seq: u64,
}

impl<S> LowerBound<S> {
    pub(crate) fn new(value: S, seq: u64) -> Self {
        Self { value, seq }
    }

    /// The lower bound of the interval.
    pub fn value(&self) -> &S {
        &self.value
    }
}

/// Total order over scalars the tree has accepted.
///
/// Unordered values (such as NaN) are rejected on insertion, so the fallback
/// is never observed for stored keys.
pub(crate) fn cmp_scalar<S: PartialOrd>(a: &S, b: &S) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Orders [`LowerBound`] keys by value, then insertion sequence.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByLowerBound;

impl<S> Compare<LowerBound<S>> for ByLowerBound
where
    S: PartialOrd,
{
    fn compare(&self, a: &LowerBound<S>, b: &LowerBound<S>) -> Ordering {
        // To provide ordering of an interval, the lower bound is used as the
        // primary ordering value, falling back to the insertion order when
        // the lower bounds are equal.
        match cmp_scalar(&a.value, &b.value) {
            Ordering::Equal => a.seq.cmp(&b.seq),
            v => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn prop_lower_bound_ord(
            a in (0..20_u32, any::<u64>()),
            b in (0..20_u32, any::<u64>()),
        ) {
            let got = ByLowerBound.compare(&LowerBound::new(a.0, a.1), &LowerBound::new(b.0, b.1));

            if a.0 == b.0 {
                // If the lower bounds are equal, then the ordering is defined
                // by the insertion sequence.
                assert_eq!(got, a.1.cmp(&b.1));
            } else {
                // Otherwise a key is ordered by the lower bounds.
                assert_eq!(got, a.0.cmp(&b.0));
            }
        }
    }

    #[test]
    fn test_float_bounds() {
        let a = LowerBound::new(1.5_f64, 7);
        let b = LowerBound::new(1.5_f64, 2);
        assert_eq!(ByLowerBound.compare(&a, &b), Ordering::Greater);
        assert_eq!(*a.value(), 1.5);
    }
}
