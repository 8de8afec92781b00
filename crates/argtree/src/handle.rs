//! Typed handles returned when declaring arguments.
//!
//! A handle is a copyable index into the parser that created it. Reading a
//! value through a handle from a different parser yields `None`.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::node::{Multi, NodeId, Single};

/// Handle whose node stores a typed value readable with [`crate::Parser::get`].
pub trait ValueHandle: Copy + Into<NodeId> {
    type Output: 'static;

    #[doc(hidden)]
    fn downcast<'a>(&self, slot: &'a dyn Any) -> Option<&'a Self::Output>;
}

macro_rules! plain_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) NodeId);

        impl From<$name> for NodeId {
            fn from(handle: $name) -> Self {
                handle.0
            }
        }
    };
}

macro_rules! single_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<T> {
            id: NodeId,
            _marker: PhantomData<fn() -> T>,
        }

        impl<T> $name<T> {
            pub(crate) fn new(id: NodeId) -> Self {
                Self { id, _marker: PhantomData }
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.id).finish()
            }
        }

        impl<T> From<$name<T>> for NodeId {
            fn from(handle: $name<T>) -> Self {
                handle.id
            }
        }

        impl<T: 'static> ValueHandle for $name<T> {
            type Output = T;

            fn downcast<'a>(&self, slot: &'a dyn Any) -> Option<&'a T> {
                slot.downcast_ref::<Single<T>>().map(|s| &s.value)
            }
        }
    };
}

macro_rules! multi_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<T, C = Vec<T>> {
            id: NodeId,
            _marker: PhantomData<fn() -> (T, C)>,
        }

        impl<T, C> $name<T, C> {
            pub(crate) fn new(id: NodeId) -> Self {
                Self { id, _marker: PhantomData }
            }
        }

        impl<T, C> Clone for $name<T, C> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T, C> Copy for $name<T, C> {}

        impl<T, C> fmt::Debug for $name<T, C> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.id).finish()
            }
        }

        impl<T, C> From<$name<T, C>> for NodeId {
            fn from(handle: $name<T, C>) -> Self {
                handle.id
            }
        }

        impl<T: 'static, C: 'static> ValueHandle for $name<T, C> {
            type Output = C;

            fn downcast<'a>(&self, slot: &'a dyn Any) -> Option<&'a C> {
                slot.downcast_ref::<Multi<T, C>>().map(|m| &m.values)
            }
        }
    };
}

plain_handle!(
    /// A group of arguments; also the parent passed when declaring children.
    GroupId
);
plain_handle!(
    /// A boolean flag, including help flags.
    FlagId
);
plain_handle!(
    /// A flag that counts how often it was matched.
    CounterId
);

single_handle!(
    /// A flag holding one value, overwritten on each match.
    ValueFlag
);
single_handle!(
    /// A flag whose token is looked up in a fixed mapping.
    MapFlag
);
single_handle!(
    /// A positional argument consumed at most once per parse.
    Positional
);

multi_handle!(
    /// A flag collecting one value per match.
    ValueFlagList
);
multi_handle!(
    /// A mapping-backed flag collecting one value per match.
    MapFlagList
);
multi_handle!(
    /// A positional argument that claims every remaining positional token.
    PositionalList
);
