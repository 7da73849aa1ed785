//! Contiguous standard containers as random-access branches.
//!
//! Slices, `Vec`, boxed slices, arrays and `VecDeque` all use their
//! `usize` positions as indices, so the index of an element is also its
//! linear offset.

use std::collections::VecDeque;

use super::{BidirectionalCollection, Collection, RandomAccessCollection};
use crate::linear::{offset_linear, offset_linear_limited, to_signed};

macro_rules! impl_contiguous_collection {
    ($({$($generics:tt)*} $collection:ty),* $(,)?) => {
        $(
            impl<$($generics)*> Collection for $collection {
                type Element = T;
                type Index = usize;

                #[inline]
                fn start_index(&self) -> usize {
                    0
                }

                #[inline]
                fn end_index(&self) -> usize {
                    self.len()
                }

                #[inline]
                #[track_caller]
                fn index_after(&self, index: &usize) -> usize {
                    assert!(*index < self.len(), "cannot advance past the end index");
                    index + 1
                }

                #[inline]
                fn element(&self, index: &usize) -> &T {
                    &self[*index]
                }

                #[inline]
                fn is_empty(&self) -> bool {
                    self.len() == 0
                }

                #[inline]
                fn count(&self) -> usize {
                    self.len()
                }

                #[inline]
                fn index_offset_by(&self, index: &usize, distance: isize) -> usize {
                    offset_linear(*index, distance, self.len())
                }

                #[inline]
                fn index_offset_by_limited(
                    &self,
                    index: &usize,
                    distance: isize,
                    limit: &usize,
                ) -> Option<usize> {
                    offset_linear_limited(*index, distance, *limit, self.len())
                }

                #[inline]
                fn distance(&self, from: &usize, to: &usize) -> isize {
                    to_signed(*to) - to_signed(*from)
                }
            }

            impl<$($generics)*> BidirectionalCollection for $collection {
                #[inline]
                #[track_caller]
                fn index_before(&self, index: &usize) -> usize {
                    assert!(*index > 0, "cannot retreat before the start index");
                    index - 1
                }
            }

            impl<$($generics)*> RandomAccessCollection for $collection {}
        )*
    };
}

impl_contiguous_collection!(
    {T} [T],
    {T} Vec<T>,
    {T} Box<[T]>,
    {T, const N: usize} [T; N],
    {T} VecDeque<T>,
);

// =============================================================================
// Tests
// =============================================================================
