//! The size contract used for capacity accounting.

use std::mem;
use std::rc::Rc;
use std::sync::Arc;

/// A logical size used for capacity accounting.
///
/// Every key and value stored in a bounded cache must report its weight, in
/// the same unit as the cache's `max_capacity`. The charge of an entry is
/// `key.weight() + value.weight()`.
///
/// # Contract
///
/// `weight` must be deterministic: calling it twice on the same unchanged
/// value must return the same number. The cache recomputes weights when an
/// entry is removed, so an unstable weight skews the capacity accounting
/// (it will not panic or wrap, but the budget becomes meaningless). This is
/// a precondition on the implementor, not a runtime-checked error.
///
/// For string and byte types the weight is the length in bytes. For
/// fixed-size primitives it is `size_of::<Self>()`. References and owning
/// smart pointers forward to their pointee, so `&str`, `Box<str>`,
/// `Rc<str>`, and `Arc<str>` all weigh the same as the `str` itself.
pub trait Weigh {
    /// Returns the logical size of `self`.
    fn weight(&self) -> u64;
}

impl Weigh for str {
    fn weight(&self) -> u64 {
        self.len() as u64
    }
}

impl Weigh for String {
    fn weight(&self) -> u64 {
        self.len() as u64
    }
}

impl Weigh for [u8] {
    fn weight(&self) -> u64 {
        self.len() as u64
    }
}

impl Weigh for Vec<u8> {
    fn weight(&self) -> u64 {
        self.len() as u64
    }
}

macro_rules! impl_weigh_by_size_of {
    ($($t:ty),*) => {
        $(
            impl Weigh for $t {
                fn weight(&self) -> u64 {
                    mem::size_of::<$t>() as u64
                }
            }
        )*
    };
}

impl_weigh_by_size_of!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char, bool, ()
);

impl<T: Weigh + ?Sized> Weigh for &T {
    fn weight(&self) -> u64 {
        (**self).weight()
    }
}

impl<T: Weigh + ?Sized> Weigh for Box<T> {
    fn weight(&self) -> u64 {
        (**self).weight()
    }
}

impl<T: Weigh + ?Sized> Weigh for Rc<T> {
    fn weight(&self) -> u64 {
        (**self).weight()
    }
}

impl<T: Weigh + ?Sized> Weigh for Arc<T> {
    fn weight(&self) -> u64 {
        (**self).weight()
    }
}
