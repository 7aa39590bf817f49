//! Boolean combinators over observables.
//!
//! Every combinator reads all of its operands on each recompute, so a change
//! to any operand is always seen.

use super::binding::Binding;
use super::property::Observable;

/// Logical operators for `bool` observables.
pub trait BoolExpr: Observable<bool> {
    fn not(&self) -> Binding<bool> {
        self.map(|value| !value)
    }

    fn and<O: Observable<bool>>(&self, other: &O) -> Binding<bool> {
        combine(*self, *other, |a, b| a & b)
    }

    fn or<O: Observable<bool>>(&self, other: &O) -> Binding<bool> {
        combine(*self, *other, |a, b| a | b)
    }

    fn xor<O: Observable<bool>>(&self, other: &O) -> Binding<bool> {
        combine(*self, *other, |a, b| a ^ b)
    }

    fn and_value(&self, other: bool) -> Binding<bool> {
        self.map(move |value| *value & other)
    }

    fn or_value(&self, other: bool) -> Binding<bool> {
        self.map(move |value| *value | other)
    }
}

impl<O: Observable<bool>> BoolExpr for O {}

fn combine<A, B>(a: A, b: B, op: fn(bool, bool) -> bool) -> Binding<bool>
where
    A: Observable<bool>,
    B: Observable<bool>,
{
    Binding::new(&[a.id(), b.id()], move || op(a.get(), b.get()))
}

/// Conjunction of every observable in `parts`. An empty slice is `true`.
pub fn and_all<B: Observable<bool>>(parts: &[B]) -> Binding<bool> {
    let ids: Vec<_> = parts.iter().map(|part| part.id()).collect();
    let parts = parts.to_vec();
    Binding::new(&ids, move || parts.iter().fold(true, |all, part| all & part.get()))
}

/// Disjunction of every observable in `parts`. An empty slice is `false`.
pub fn or_any<B: Observable<bool>>(parts: &[B]) -> Binding<bool> {
    let ids: Vec<_> = parts.iter().map(|part| part.id()).collect();
    let parts = parts.to_vec();
    Binding::new(&ids, move || parts.iter().fold(false, |any, part| any | part.get()))
}
