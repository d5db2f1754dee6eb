//! The instrumented numeric wrapper.
//!
//! [`Traced`] wraps an `i64` and reports every special operation on itself to its
//! [`Tracker`]: construction, copy and move construction, the three assignment flavors,
//! every compound arithmetic operator, and destruction. The arithmetic itself is plain
//! delegation to the native operators; the only job of this type is to call the dispatcher
//! hooks at the right times with a fully populated record.
//!
//! All ten binary operators run through one parameterized operation table, [`BinOp`]: each
//! `std::ops` impl is a thin adapter over [`Traced::apply_op`], and the non-mutating
//! operators derive from the compound ones by copying the left operand first.

use std::{cmp::Ordering, fmt, ops};

use crate::tracker::{TrackedRecord, Tracker};

/// The binary operator table.
///
/// Carries the operator symbol (the `Display` impl renders `+`, `<<`, ...) and the native
/// binary function, so one generic implementation serves every compound-assignment and
/// binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum BinOp {
    /// Addition (`+`).
    #[strum(serialize = "+")]
    Add,
    /// Subtraction (`-`).
    #[strum(serialize = "-")]
    Sub,
    /// Multiplication (`*`).
    #[strum(serialize = "*")]
    Mul,
    /// Division (`/`).
    #[strum(serialize = "/")]
    Div,
    /// Bitwise or (`|`).
    #[strum(serialize = "|")]
    BitOr,
    /// Bitwise and (`&`).
    #[strum(serialize = "&")]
    BitAnd,
    /// Bitwise xor (`^`).
    #[strum(serialize = "^")]
    BitXor,
    /// Remainder (`%`).
    #[strum(serialize = "%")]
    Rem,
    /// Left shift (`<<`).
    #[strum(serialize = "<<")]
    Shl,
    /// Right shift (`>>`).
    #[strum(serialize = ">>")]
    Shr,
}

impl BinOp {
    /// Applies the native binary operator.
    #[must_use]
    pub fn apply(self, lhs: i64, rhs: i64) -> i64 {
        match self {
            BinOp::Add => lhs + rhs,
            BinOp::Sub => lhs - rhs,
            BinOp::Mul => lhs * rhs,
            BinOp::Div => lhs / rhs,
            BinOp::BitOr => lhs | rhs,
            BinOp::BitAnd => lhs & rhs,
            BinOp::BitXor => lhs ^ rhs,
            BinOp::Rem => lhs % rhs,
            BinOp::Shl => lhs << rhs,
            BinOp::Shr => lhs >> rhs,
        }
    }
}

/// An instrumented `i64`.
///
/// Every lifecycle operation on a `Traced` value is reported to the [`Tracker`] it was
/// created with, which stamps identity and derivation history onto the value's
/// [`TrackedRecord`] and fans the event out to the registered renderers.
///
/// Unnamed values (constructed with [`new`](Traced::new) or [`Clone::clone`]) receive an
/// auto-generated `tmp{id}` name at their first tracked event.
///
/// # Examples
///
/// ```rust
/// use lifescope::{Tracker, Traced};
///
/// let tracker = Tracker::new();
/// let mut a = Traced::named(&tracker, 1, "a");
/// let b = Traced::named(&tracker, 2, "b");
///
/// a += &b;
///
/// assert_eq!(a.get(), 3);
/// assert_eq!(a.history(), "ASG+(b, <id1|2>, <id0|1>)");
/// ```
pub struct Traced {
    value: i64,
    record: TrackedRecord,
    tracker: Tracker,
}

impl Traced {
    /// Constructs an unnamed tracked value.
    #[must_use]
    pub fn new(tracker: &Tracker, value: i64) -> Self {
        Self::construct(tracker, value, TrackedRecord::unnamed())
    }

    /// Constructs a named tracked value.
    #[must_use]
    pub fn named(tracker: &Tracker, value: i64, name: impl Into<String>) -> Self {
        Self::construct(tracker, value, TrackedRecord::named(name))
    }

    fn construct(tracker: &Tracker, value: i64, record: TrackedRecord) -> Self {
        let mut traced = Self {
            value,
            record,
            tracker: tracker.clone(),
        };
        traced.snapshot();
        traced.tracker.construct(&mut traced.record);
        traced
    }

    /// Copy-constructs a named duplicate of this value.
    ///
    /// [`Clone::clone`] does the same with an auto-generated name.
    #[must_use]
    pub fn clone_named(&self, name: impl Into<String>) -> Self {
        let mut traced = Self {
            value: self.value,
            record: TrackedRecord::named(name),
            tracker: self.tracker.clone(),
        };
        traced.snapshot();
        traced.tracker.copy_construct(&mut traced.record, &self.record);
        traced
    }

    /// Move-constructs a new unnamed value out of `source`.
    ///
    /// The source stays alive, as a moved-from value would, and is destructed at the end of
    /// its own scope.
    #[must_use]
    pub fn move_from(source: &mut Traced) -> Self {
        Self::move_construct(source, TrackedRecord::unnamed())
    }

    /// Move-constructs a new named value out of `source`.
    #[must_use]
    pub fn move_from_named(source: &mut Traced, name: impl Into<String>) -> Self {
        Self::move_construct(source, TrackedRecord::named(name))
    }

    fn move_construct(source: &mut Traced, record: TrackedRecord) -> Self {
        let mut traced = Self {
            value: source.value,
            record,
            tracker: source.tracker.clone(),
        };
        traced.snapshot();
        traced
            .tracker
            .move_construct(&mut traced.record, &source.record);
        traced
    }

    /// Assigns a literal value.
    pub fn set(&mut self, value: i64) {
        self.value = value;
        self.snapshot();
        self.tracker.assign(&mut self.record);
    }

    /// Copy-assigns from another tracked value.
    pub fn assign(&mut self, other: &Traced) {
        self.value = other.value;
        self.snapshot();
        self.tracker.copy_assign(&mut self.record, &other.record);
    }

    /// Move-assigns out of another tracked value.
    pub fn assign_from(&mut self, other: &mut Traced) {
        self.value = other.value;
        self.snapshot();
        self.tracker.move_assign(&mut self.record, &other.record);
    }

    /// Applies a compound assignment (`self op= other`) through the operation table.
    ///
    /// All `std::ops::*Assign` impls delegate here.
    pub fn apply_op(&mut self, other: &Traced, op: BinOp) {
        self.value = op.apply(self.value, other.value);
        self.snapshot();
        self.tracker.op_assign(&mut self.record, &other.record, op);
    }

    /// Non-mutating binary operation: copy the left operand, apply the compound op.
    fn binary(&self, other: &Traced, op: BinOp) -> Traced {
        let _scope = self.tracker.scope(format!("operator{op}"));
        let mut result = self.clone();
        result.apply_op(other, op);
        result
    }

    /// Returns the wrapped value.
    #[must_use]
    pub fn get(&self) -> i64 {
        self.value
    }

    /// Returns the current identity snapshot.
    #[must_use]
    pub fn record(&self) -> &TrackedRecord {
        &self.record
    }

    /// Returns the derivation history.
    #[must_use]
    pub fn history(&self) -> &str {
        &self.record.history
    }

    /// Returns the assigned identity, `None` while tracking never saw this value.
    #[must_use]
    pub fn id(&self) -> Option<u64> {
        self.record.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Refreshes the display-only parts of the record: value text and current address.
    fn snapshot(&mut self) {
        self.record.value = self.value.to_string();
        self.record.address = &self.value as *const i64 as usize;
    }
}

impl Clone for Traced {
    fn clone(&self) -> Self {
        let mut traced = Self {
            value: self.value,
            record: TrackedRecord::unnamed(),
            tracker: self.tracker.clone(),
        };
        traced.snapshot();
        traced.tracker.copy_construct(&mut traced.record, &self.record);
        traced
    }
}

impl Drop for Traced {
    fn drop(&mut self) {
        self.record.address = &self.value as *const i64 as usize;
        self.tracker.destruct(&mut self.record);
    }
}

impl fmt::Display for Traced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::Debug for Traced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traced")
            .field("value", &self.value)
            .field("record", &self.record)
            .finish()
    }
}

impl PartialEq for Traced {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for Traced {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl ops::Neg for &Traced {
    type Output = Traced;

    fn neg(self) -> Traced {
        let _scope = self.tracker.scope("operator-");
        self.binary(&Traced::new(&self.tracker, -1), BinOp::Mul)
    }
}

macro_rules! binary_operators {
    ($(($op:expr, $assign_trait:ident, $assign_fn:ident, $bin_trait:ident, $bin_fn:ident)),* $(,)?) => {
        $(
            impl ops::$assign_trait<&Traced> for Traced {
                fn $assign_fn(&mut self, rhs: &Traced) {
                    self.apply_op(rhs, $op);
                }
            }

            impl ops::$bin_trait<&Traced> for &Traced {
                type Output = Traced;

                fn $bin_fn(self, rhs: &Traced) -> Traced {
                    self.binary(rhs, $op)
                }
            }
        )*
    };
}

binary_operators!(
    (BinOp::Add, AddAssign, add_assign, Add, add),
    (BinOp::Sub, SubAssign, sub_assign, Sub, sub),
    (BinOp::Mul, MulAssign, mul_assign, Mul, mul),
    (BinOp::Div, DivAssign, div_assign, Div, div),
    (BinOp::BitOr, BitOrAssign, bitor_assign, BitOr, bitor),
    (BinOp::BitAnd, BitAndAssign, bitand_assign, BitAnd, bitand),
    (BinOp::BitXor, BitXorAssign, bitxor_assign, BitXor, bitxor),
    (BinOp::Rem, RemAssign, rem_assign, Rem, rem),
    (BinOp::Shl, ShlAssign, shl_assign, Shl, shl),
    (BinOp::Shr, ShrAssign, shr_assign, Shr, shr),
);
