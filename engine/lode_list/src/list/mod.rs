//! Singly-linked persistent list with a lazy reversed view.
//!
//! # Representation
//!
//! A forward list is an optional pointer to the first node plus its size.
//! Nodes are reference counted and never modified after construction, so
//! `prepend` allocates exactly one node and shares everything behind it.
//!
//! A reversed list keeps the forward list it was built from and defers the
//! actual reversal until an operation needs front-to-back access. Reversing
//! a reversed list hands back the original without touching any node.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use crate::ListError;

struct Node<T> {
    head: T,
    tail: Option<Arc<Node<T>>>,
}

impl<T> Drop for Node<T> {
    // Unlink uniquely owned successors one at a time; the default drop
    // would recurse once per node.
    fn drop(&mut self) {
        let mut next = self.tail.take();
        while let Some(node) = next {
            next = match Arc::into_inner(node) {
                Some(mut inner) => inner.tail.take(),
                None => None,
            };
        }
    }
}

enum Repr<T> {
    Forward {
        first: Option<Arc<Node<T>>>,
        size: usize,
    },
    Reversed(Arc<ReversedView<T>>),
}

struct ReversedView<T> {
    /// Always a `Forward` list.
    original: ImmutableList<T>,
    /// `original` reversed, built on first use.
    forward: OnceLock<ImmutableList<T>>,
}

/// A persistent, structurally shared list.
///
/// The head is the most recently prepended element.
pub struct ImmutableList<T> {
    repr: Repr<T>,
}

impl<T> ImmutableList<T> {
    /// The empty list.
    pub const fn new() -> Self {
        ImmutableList {
            repr: Repr::Forward {
                first: None,
                size: 0,
            },
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Forward { size, .. } => *size,
            Repr::Reversed(view) => view.original.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if this list is a lazy reversed view.
    pub fn is_reversed(&self) -> bool {
        matches!(self.repr, Repr::Reversed(_))
    }
}

impl<T: Clone> ImmutableList<T> {
    /// Element at `index`, counted from the head.
    pub fn get(&self, index: usize) -> Result<&T, ListError> {
        let size = self.len();
        if index >= size {
            return Err(ListError::IndexOutOfRange { index, size });
        }
        let found = match &self.repr {
            Repr::Forward { .. } => self.iter().nth(index),
            // Position `index` of the view is `size - 1 - index` of the original.
            Repr::Reversed(view) => view.original.iter().nth(size - 1 - index),
        };
        found.ok_or(ListError::IndexOutOfRange { index, size })
    }

    /// Iterate from head to end.
    pub fn iter(&self) -> Iter<'_, T> {
        let (first, size) = self.forward_parts();
        Iter {
            next: first.map(|node| &**node),
            remaining: size,
        }
    }

    /// A list holding a single element.
    pub fn create(item: T) -> Self {
        ImmutableList::new().prepend(item)
    }

    /// A new list with `item` as head and this list as tail.
    ///
    /// O(1); `self` is left untouched and shared.
    #[must_use]
    pub fn prepend(&self, item: T) -> Self {
        let (first, size) = self.forward_parts();
        ImmutableList {
            repr: Repr::Forward {
                first: Some(Arc::new(Node {
                    head: item,
                    tail: first.cloned(),
                })),
                size: size + 1,
            },
        }
    }

    /// This list followed by all elements of `other`.
    ///
    /// Copies the nodes of `self` and shares `other` as the new tail.
    #[must_use]
    pub fn concat(&self, other: &ImmutableList<T>) -> Self {
        let items: Vec<&T> = self.iter().collect();
        items
            .into_iter()
            .rev()
            .fold(other.clone(), |acc, item| acc.prepend(item.clone()))
    }

    /// The first element.
    pub fn head(&self) -> Result<&T, ListError> {
        match self.forward_parts() {
            (Some(node), _) => Ok(&node.head),
            (None, _) => Err(ListError::EmptyCollection { operation: "head" }),
        }
    }

    /// Everything after the first element.
    pub fn tail(&self) -> Result<Self, ListError> {
        match self.forward_parts() {
            (Some(node), size) => Ok(ImmutableList {
                repr: Repr::Forward {
                    first: node.tail.clone(),
                    size: size - 1,
                },
            }),
            (None, _) => Err(ListError::EmptyCollection { operation: "tail" }),
        }
    }

    /// A lazy back-to-front view. O(1).
    #[must_use]
    pub fn reverse(&self) -> Self {
        match &self.repr {
            Repr::Forward { .. } => ImmutableList {
                repr: Repr::Reversed(Arc::new(ReversedView {
                    original: self.clone(),
                    forward: OnceLock::new(),
                })),
            },
            Repr::Reversed(view) => view.original.clone(),
        }
    }

    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|candidate| candidate == item)
    }

    /// Returns `true` if every element of `items` occurs in this list.
    pub fn contains_all<'i>(&self, items: impl IntoIterator<Item = &'i T>) -> bool
    where
        T: PartialEq + 'i,
    {
        items.into_iter().all(|item| self.contains(item))
    }

    /// Position of the first element equal to `item`.
    pub fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|candidate| candidate == item)
    }

    /// Position of the last element equal to `item`.
    pub fn last_index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter()
            .enumerate()
            .filter(|(_, candidate)| *candidate == item)
            .map(|(index, _)| index)
            .last()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// The forward list with the same sequence: `self` or the materialized view.
    fn as_forward(&self) -> &ImmutableList<T> {
        match &self.repr {
            Repr::Forward { .. } => self,
            Repr::Reversed(view) => view.forward.get_or_init(|| {
                view.original
                    .iter()
                    .fold(ImmutableList::new(), |acc, item| acc.prepend(item.clone()))
            }),
        }
    }

    /// First node and size of the forward sequence.
    fn forward_parts(&self) -> (Option<&Arc<Node<T>>>, usize) {
        match &self.as_forward().repr {
            Repr::Forward { first, size } => (first.as_ref(), *size),
            // `as_forward` materializes views, so this arm is never taken.
            Repr::Reversed(_) => (None, 0),
        }
    }
}

/// Borrowing iterator over an [`ImmutableList`], head first.
pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
    remaining: usize,
}

impl<T> Iter<'_, T> {
    /// Iterators over an immutable list cannot remove elements.
    pub fn remove(&mut self) -> Result<(), ListError> {
        Err(ListError::UnsupportedOperation {
            operation: "iterator remove",
        })
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.next?;
        self.next = node.tail.as_deref();
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.head)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T: Clone> IntoIterator for &'a ImmutableList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> Clone for ImmutableList<T> {
    fn clone(&self) -> Self {
        let repr = match &self.repr {
            Repr::Forward { first, size } => Repr::Forward {
                first: first.clone(),
                size: *size,
            },
            Repr::Reversed(view) => Repr::Reversed(Arc::clone(view)),
        };
        ImmutableList { repr }
    }
}

impl<T> Default for ImmutableList<T> {
    fn default() -> Self {
        ImmutableList::new()
    }
}

impl<T: Clone> FromIterator<T> for ImmutableList<T> {
    /// The first yielded element becomes the head.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items: Vec<T> = iter.into_iter().collect();
        items
            .into_iter()
            .rev()
            .fold(ImmutableList::new(), |acc, item| acc.prepend(item))
    }
}

impl<T: Clone> From<Vec<T>> for ImmutableList<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Clone + PartialEq> PartialEq for ImmutableList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Clone + Eq> Eq for ImmutableList<T> {}

impl<T: Clone + Hash> Hash for ImmutableList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self {
            item.hash(state);
        }
    }
}

impl<T: Clone + fmt::Display> fmt::Display for ImmutableList<T> {
    /// `>a>b>c`, head first; the empty list renders as nothing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self {
            write!(f, ">{item}")?;
        }
        Ok(())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for ImmutableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
