use crate::value::{Describe, TolerantEq};

/// A solution under test.
///
/// `Default` plays the zero-argument constructor: every case gets a fresh
/// instance inside its own process, so nothing leaks between cases.
pub trait Problem: Default {
    /// Shown as the report header.
    const NAME: &'static str;

    type Input: Describe + Clone;
    type Output: TolerantEq + Describe;

    fn solve(&mut self, input: Self::Input) -> Self::Output;
}

/// One (input, expected) pair. `expected == None` means there is no oracle:
/// the case can only be observed, never judged wrong.
#[derive(Debug, Clone, PartialEq)]
pub struct Testcase<I, O> {
    pub input: I,
    pub expected: Option<O>,
}

impl<I, O> Testcase<I, O> {
    pub fn new(input: I, expected: O) -> Self {
        Self {
            input,
            expected: Some(expected),
        }
    }

    pub fn unknown(input: I) -> Self {
        Self {
            input,
            expected: None,
        }
    }

    pub fn has_oracle(&self) -> bool {
        self.expected.is_some()
    }
}

pub type TestTable<P> = Vec<Testcase<<P as Problem>::Input, <P as Problem>::Output>>;

/// Decides per index whether a case is skipped.
pub trait DisabledPredicate {
    fn is_disabled(&self, index: usize) -> bool;
}

impl<F> DisabledPredicate for F
where
    F: Fn(usize) -> bool,
{
    fn is_disabled(&self, index: usize) -> bool {
        self(index)
    }
}

/// Predicate that keeps every case enabled.
pub fn none_disabled(_: usize) -> bool {
    false
}

/// Number of columns needed to print any index of an `n`-case table.
pub fn index_width(n: usize) -> usize {
    n.saturating_sub(1).to_string().len().max(1)
}
