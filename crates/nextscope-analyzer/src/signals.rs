//! Ordered, short-circuiting predicate lists.
//!
//! Every heuristic in the crate is an independent predicate with a stable
//! name. Lists are evaluated in order and stop at the first predicate that
//! fires, whose name is returned so callers can log the evidence.

/// A named predicate over some evidence type.
pub(crate) struct Signal<I: ?Sized> {
    pub name: &'static str,
    pub check: fn(&I) -> bool,
}

impl<I: ?Sized> Signal<I> {
    pub const fn new(name: &'static str, check: fn(&I) -> bool) -> Self {
        Self { name, check }
    }
}

/// Name of the first signal that fires, if any.
pub(crate) fn first_match<I: ?Sized>(signals: &[Signal<I>], input: &I) -> Option<&'static str> {
    signals
        .iter()
        .find(|signal| (signal.check)(input))
        .map(|signal| signal.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn negative(n: &i32) -> bool {
        *n < 0
    }

    fn even(n: &i32) -> bool {
        n % 2 == 0
    }

    fn small(n: &i32) -> bool {
        *n < 10
    }

    static SIGNALS: &[Signal<i32>] = &[
        Signal::new("negative", negative),
        Signal::new("even", even),
        Signal::new("small", small),
    ];

    #[test]
    fn test_first_match_order() {
        assert_eq!(first_match(SIGNALS, &-2), Some("negative"));
        assert_eq!(first_match(SIGNALS, &4), Some("even"));
        assert_eq!(first_match(SIGNALS, &3), Some("small"));
        assert_eq!(first_match(SIGNALS, &11), None);
    }
}
