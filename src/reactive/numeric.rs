//! Numeric observables: arithmetic and comparison with type promotion.
//!
//! Mixed operands promote to the wider of the two kinds, ordered
//! `i32 < i64 < f32 < f64`. Integer arithmetic wraps on overflow, and
//! integer division or remainder by zero yields zero. Float arithmetic
//! follows IEEE 754.

use std::cmp::Ordering;
use std::fmt;

use super::binding::Binding;
use super::property::{BindError, Observable, Property, Value};

// ---------------------------------------------------------------------------
// Numeric tower
// ---------------------------------------------------------------------------

/// Width class of a numeric type. Ordering is promotion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericKind {
    Int,
    Long,
    Float,
    Double,
}

impl NumericKind {
    /// Kind a binary operation over `self` and `other` produces.
    pub fn promote(self, other: NumericKind) -> NumericKind {
        self.max(other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// A primitive number usable in observable arithmetic.
pub trait Numeric: Value + Copy + PartialOrd + fmt::Debug {
    const KIND: NumericKind;

    fn from_i32(value: i32) -> Self;
    fn from_i64(value: i64) -> Self;
    fn from_f32(value: f32) -> Self;
    fn from_f64(value: f64) -> Self;

    /// Numeric cast with `as` semantics.
    fn convert<N: Numeric>(self) -> N;

    fn apply(self, op: ArithOp, rhs: Self) -> Self;

    fn negated(self) -> Self;
}

macro_rules! integer_numeric {
    ($ty:ty, $kind:ident, $from:ident) => {
        impl Numeric for $ty {
            const KIND: NumericKind = NumericKind::$kind;

            fn from_i32(value: i32) -> Self {
                value as $ty
            }
            fn from_i64(value: i64) -> Self {
                value as $ty
            }
            fn from_f32(value: f32) -> Self {
                value as $ty
            }
            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            fn convert<N: Numeric>(self) -> N {
                N::$from(self)
            }

            fn apply(self, op: ArithOp, rhs: Self) -> Self {
                match op {
                    ArithOp::Add => self.wrapping_add(rhs),
                    ArithOp::Sub => self.wrapping_sub(rhs),
                    ArithOp::Mul => self.wrapping_mul(rhs),
                    ArithOp::Div if rhs == 0 => 0,
                    ArithOp::Div => self.wrapping_div(rhs),
                    ArithOp::Rem if rhs == 0 => 0,
                    ArithOp::Rem => self.wrapping_rem(rhs),
                }
            }

            fn negated(self) -> Self {
                self.wrapping_neg()
            }
        }
    };
}

macro_rules! float_numeric {
    ($ty:ty, $kind:ident, $from:ident) => {
        impl Numeric for $ty {
            const KIND: NumericKind = NumericKind::$kind;

            fn from_i32(value: i32) -> Self {
                value as $ty
            }
            fn from_i64(value: i64) -> Self {
                value as $ty
            }
            fn from_f32(value: f32) -> Self {
                value as $ty
            }
            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            fn convert<N: Numeric>(self) -> N {
                N::$from(self)
            }

            fn apply(self, op: ArithOp, rhs: Self) -> Self {
                match op {
                    ArithOp::Add => self + rhs,
                    ArithOp::Sub => self - rhs,
                    ArithOp::Mul => self * rhs,
                    ArithOp::Div => self / rhs,
                    ArithOp::Rem => self % rhs,
                }
            }

            fn negated(self) -> Self {
                -self
            }
        }
    };
}

integer_numeric!(i32, Int, from_i32);
integer_numeric!(i64, Long, from_i64);
float_numeric!(f32, Float, from_f32);
float_numeric!(f64, Double, from_f64);

/// Result type of a binary operation between `Self` and `Rhs`.
pub trait Promote<Rhs: Numeric>: Numeric {
    type Output: Numeric;
}

/// Shorthand for the promoted type of `L op R`.
pub type Promoted<L, R> = <L as Promote<R>>::Output;

macro_rules! promotions {
    ($($lhs:ty, $rhs:ty => $out:ty;)*) => {
        $(impl Promote<$rhs> for $lhs {
            type Output = $out;
        })*
    };
}

promotions! {
    i32, i32 => i32;
    i32, i64 => i64;
    i32, f32 => f32;
    i32, f64 => f64;
    i64, i32 => i64;
    i64, i64 => i64;
    i64, f32 => f32;
    i64, f64 => f64;
    f32, i32 => f32;
    f32, i64 => f32;
    f32, f32 => f32;
    f32, f64 => f64;
    f64, i32 => f64;
    f64, i64 => f64;
    f64, f32 => f64;
    f64, f64 => f64;
}

// ---------------------------------------------------------------------------
// Binding builders
// ---------------------------------------------------------------------------

/// `lhs op rhs` over two observables, in the promoted type.
pub fn arithmetic<L, R, A, B>(lhs: A, op: ArithOp, rhs: B) -> Binding<Promoted<L, R>>
where
    L: Promote<R>,
    R: Numeric,
    A: Observable<L>,
    B: Observable<R>,
{
    Binding::new(&[lhs.id(), rhs.id()], move || {
        let a: Promoted<L, R> = lhs.get().convert();
        let b: Promoted<L, R> = rhs.get().convert();
        a.apply(op, b)
    })
}

fn arithmetic_value<L, R, A>(lhs: A, op: ArithOp, rhs: R) -> Binding<Promoted<L, R>>
where
    L: Promote<R>,
    R: Numeric,
    A: Observable<L>,
{
    Binding::new(&[lhs.id()], move || {
        let a: Promoted<L, R> = lhs.get().convert();
        a.apply(op, rhs.convert())
    })
}

fn compare<L, R, A, B>(lhs: A, rhs: B, test: fn(Ordering) -> bool) -> Binding<bool>
where
    L: Promote<R>,
    R: Numeric,
    A: Observable<L>,
    B: Observable<R>,
{
    Binding::new(&[lhs.id(), rhs.id()], move || {
        let a: Promoted<L, R> = lhs.get().convert();
        let b: Promoted<L, R> = rhs.get().convert();
        a.partial_cmp(&b).is_some_and(test)
    })
}

fn compare_value<L, R, A>(lhs: A, rhs: R, test: fn(Ordering) -> bool) -> Binding<bool>
where
    L: Promote<R>,
    R: Numeric,
    A: Observable<L>,
{
    Binding::new(&[lhs.id()], move || {
        let a: Promoted<L, R> = lhs.get().convert();
        a.partial_cmp(&rhs.convert()).is_some_and(test)
    })
}

fn is_gt(ordering: Ordering) -> bool {
    ordering == Ordering::Greater
}

fn is_ge(ordering: Ordering) -> bool {
    ordering != Ordering::Less
}

fn is_lt(ordering: Ordering) -> bool {
    ordering == Ordering::Less
}

fn is_le(ordering: Ordering) -> bool {
    ordering != Ordering::Greater
}

fn is_eq(ordering: Ordering) -> bool {
    ordering == Ordering::Equal
}

// ---------------------------------------------------------------------------
// NumberExpr
// ---------------------------------------------------------------------------

/// Arithmetic and comparison for numeric observables. Every operation has an
/// observable-operand form and a `_value` form taking a constant.
pub trait NumberExpr<L: Numeric>: Observable<L> {
    fn plus<R: Numeric, O: Observable<R>>(&self, rhs: &O) -> Binding<Promoted<L, R>>
    where
        L: Promote<R>,
    {
        arithmetic(*self, ArithOp::Add, *rhs)
    }

    fn plus_value<R: Numeric>(&self, rhs: R) -> Binding<Promoted<L, R>>
    where
        L: Promote<R>,
    {
        arithmetic_value(*self, ArithOp::Add, rhs)
    }

    fn minus<R: Numeric, O: Observable<R>>(&self, rhs: &O) -> Binding<Promoted<L, R>>
    where
        L: Promote<R>,
    {
        arithmetic(*self, ArithOp::Sub, *rhs)
    }

    fn minus_value<R: Numeric>(&self, rhs: R) -> Binding<Promoted<L, R>>
    where
        L: Promote<R>,
    {
        arithmetic_value(*self, ArithOp::Sub, rhs)
    }

    fn times<R: Numeric, O: Observable<R>>(&self, rhs: &O) -> Binding<Promoted<L, R>>
    where
        L: Promote<R>,
    {
        arithmetic(*self, ArithOp::Mul, *rhs)
    }

    fn times_value<R: Numeric>(&self, rhs: R) -> Binding<Promoted<L, R>>
    where
        L: Promote<R>,
    {
        arithmetic_value(*self, ArithOp::Mul, rhs)
    }

    fn divide<R: Numeric, O: Observable<R>>(&self, rhs: &O) -> Binding<Promoted<L, R>>
    where
        L: Promote<R>,
    {
        arithmetic(*self, ArithOp::Div, *rhs)
    }

    fn divide_value<R: Numeric>(&self, rhs: R) -> Binding<Promoted<L, R>>
    where
        L: Promote<R>,
    {
        arithmetic_value(*self, ArithOp::Div, rhs)
    }

    fn remainder<R: Numeric, O: Observable<R>>(&self, rhs: &O) -> Binding<Promoted<L, R>>
    where
        L: Promote<R>,
    {
        arithmetic(*self, ArithOp::Rem, *rhs)
    }

    fn remainder_value<R: Numeric>(&self, rhs: R) -> Binding<Promoted<L, R>>
    where
        L: Promote<R>,
    {
        arithmetic_value(*self, ArithOp::Rem, rhs)
    }

    fn negate(&self) -> Binding<L> {
        self.map(|value| value.negated())
    }

    fn greater_than<R: Numeric, O: Observable<R>>(&self, rhs: &O) -> Binding<bool>
    where
        L: Promote<R>,
    {
        compare(*self, *rhs, is_gt)
    }

    fn greater_than_value<R: Numeric>(&self, rhs: R) -> Binding<bool>
    where
        L: Promote<R>,
    {
        compare_value(*self, rhs, is_gt)
    }

    fn greater_than_or_equal<R: Numeric, O: Observable<R>>(&self, rhs: &O) -> Binding<bool>
    where
        L: Promote<R>,
    {
        compare(*self, *rhs, is_ge)
    }

    fn greater_than_or_equal_value<R: Numeric>(&self, rhs: R) -> Binding<bool>
    where
        L: Promote<R>,
    {
        compare_value(*self, rhs, is_ge)
    }

    fn less_than<R: Numeric, O: Observable<R>>(&self, rhs: &O) -> Binding<bool>
    where
        L: Promote<R>,
    {
        compare(*self, *rhs, is_lt)
    }

    fn less_than_value<R: Numeric>(&self, rhs: R) -> Binding<bool>
    where
        L: Promote<R>,
    {
        compare_value(*self, rhs, is_lt)
    }

    fn less_than_or_equal<R: Numeric, O: Observable<R>>(&self, rhs: &O) -> Binding<bool>
    where
        L: Promote<R>,
    {
        compare(*self, *rhs, is_le)
    }

    fn less_than_or_equal_value<R: Numeric>(&self, rhs: R) -> Binding<bool>
    where
        L: Promote<R>,
    {
        compare_value(*self, rhs, is_le)
    }

    /// Equality after promotion, so `2_i32` equals `2.0_f64`.
    fn number_equals<R: Numeric, O: Observable<R>>(&self, rhs: &O) -> Binding<bool>
    where
        L: Promote<R>,
    {
        compare(*self, *rhs, is_eq)
    }

    fn number_equals_value<R: Numeric>(&self, rhs: R) -> Binding<bool>
    where
        L: Promote<R>,
    {
        compare_value(*self, rhs, is_eq)
    }
}

impl<L: Numeric, O: Observable<L>> NumberExpr<L> for O {}

// ---------------------------------------------------------------------------
// In-place operators on numeric properties
// ---------------------------------------------------------------------------

impl<L: Numeric> Property<L> {
    fn apply_in_place<R: Numeric>(&self, op: ArithOp, rhs: R) -> Result<(), BindError> {
        let rhs: L = rhs.convert();
        self.update(|value| *value = value.apply(op, rhs))
    }

    /// `self += rhs`, with `rhs` cast to this property's type.
    pub fn plus_assign<R: Numeric>(&self, rhs: R) -> Result<(), BindError> {
        self.apply_in_place(ArithOp::Add, rhs)
    }

    pub fn minus_assign<R: Numeric>(&self, rhs: R) -> Result<(), BindError> {
        self.apply_in_place(ArithOp::Sub, rhs)
    }

    pub fn times_assign<R: Numeric>(&self, rhs: R) -> Result<(), BindError> {
        self.apply_in_place(ArithOp::Mul, rhs)
    }

    pub fn divide_assign<R: Numeric>(&self, rhs: R) -> Result<(), BindError> {
        self.apply_in_place(ArithOp::Div, rhs)
    }

    pub fn remainder_assign<R: Numeric>(&self, rhs: R) -> Result<(), BindError> {
        self.apply_in_place(ArithOp::Rem, rhs)
    }

    pub fn increment(&self) -> Result<(), BindError> {
        self.plus_assign(1_i32)
    }

    pub fn decrement(&self) -> Result<(), BindError> {
        self.minus_assign(1_i32)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
