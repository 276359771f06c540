//! Object identity for keys, and the strong/weak handle split the
//! containers are generic over.
//!
//! A key's identity is the address of its shared allocation. Any custom
//! `Eq`/`Hash` the pointee defines is never consulted. Only shared-pointer
//! types implement these traits: every `Rc`/`Arc` owns a real allocation
//! (even for zero-sized pointees), so distinct keys always have distinct
//! addresses while they, or a weak handle to them, exist.

use core::fmt;
use core::hash::{Hash, Hasher};
use std::rc::{self, Rc};
use std::sync::{self, Arc};

/// Address-based identity of a shared allocation.
#[repr(transparent)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct Identity(usize);

impl Identity {
    /// Identity of the value behind `ptr`.
    ///
    /// Metadata of wide pointers is discarded; only the data address
    /// participates.
    #[inline]
    pub fn of<T: ?Sized>(ptr: *const T) -> Self {
        Identity(ptr as *const () as usize)
    }

    #[inline]
    pub fn addr(self) -> usize {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id{:#x}", self.0)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id{:#x}", self.0)
    }
}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.0);
    }
}

/// Anything that names a shared allocation by address.
pub trait Identified {
    fn identity(&self) -> Identity;
}

/// A strongly owning key that can hand out non-owning handles to itself.
pub trait StrongKey: Identified + Sized {
    type Weak: WeakKey<Strong = Self>;

    fn downgrade(&self) -> Self::Weak;
}

/// A non-owning handle that reports liveness and resolves to its referent
/// only while some strong owner exists elsewhere.
///
/// The handle's identity stays stable after the referent dies: the
/// allocation is kept reserved until the last weak handle is dropped.
pub trait WeakKey: Identified {
    type Strong;

    fn upgrade(&self) -> Option<Self::Strong>;

    fn is_live(&self) -> bool;
}

impl<T: ?Sized> Identified for Rc<T> {
    #[inline]
    fn identity(&self) -> Identity {
        Identity::of(Rc::as_ptr(self))
    }
}

impl<T: ?Sized> StrongKey for Rc<T> {
    type Weak = rc::Weak<T>;

    #[inline]
    fn downgrade(&self) -> rc::Weak<T> {
        Rc::downgrade(self)
    }
}

impl<T: ?Sized> Identified for rc::Weak<T> {
    #[inline]
    fn identity(&self) -> Identity {
        Identity::of(self.as_ptr())
    }
}

impl<T: ?Sized> WeakKey for rc::Weak<T> {
    type Strong = Rc<T>;

    #[inline]
    fn upgrade(&self) -> Option<Rc<T>> {
        rc::Weak::upgrade(self)
    }

    #[inline]
    fn is_live(&self) -> bool {
        self.strong_count() > 0
    }
}

impl<T: ?Sized> Identified for Arc<T> {
    #[inline]
    fn identity(&self) -> Identity {
        Identity::of(Arc::as_ptr(self))
    }
}

impl<T: ?Sized> StrongKey for Arc<T> {
    type Weak = sync::Weak<T>;

    #[inline]
    fn downgrade(&self) -> sync::Weak<T> {
        Arc::downgrade(self)
    }
}

impl<T: ?Sized> Identified for sync::Weak<T> {
    #[inline]
    fn identity(&self) -> Identity {
        Identity::of(self.as_ptr())
    }
}

impl<T: ?Sized> WeakKey for sync::Weak<T> {
    type Strong = Arc<T>;

    #[inline]
    fn upgrade(&self) -> Option<Arc<T>> {
        sync::Weak::upgrade(self)
    }

    #[inline]
    fn is_live(&self) -> bool {
        self.strong_count() > 0
    }
}

impl<Q: Identified + ?Sized> Identified for &Q {
    #[inline]
    fn identity(&self) -> Identity {
        (**self).identity()
    }
}
