//! Linear merge operations on postings lists.
//!
//! Every input must be strictly increasing. That is a caller obligation, not
//! something these functions check; unsorted input gives an unspecified
//! result.

use crate::DocId;
use std::cmp::Ordering;

/// Ids present in both `a` and `b`.
pub fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }
    out
}

/// Ids present in `a` or `b`, each emitted once.
pub fn union(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Ids in `0..universe_size` that are absent from `a`.
///
/// Single pass over the universe with a cursor into `a`. Entries of `a` at or
/// beyond `universe_size` are ignored.
pub fn complement(a: &[DocId], universe_size: usize) -> Vec<DocId> {
    let mut out = Vec::with_capacity(universe_size.saturating_sub(a.len()));
    let mut j = 0usize;
    for id in 0..universe_size as DocId {
        if j < a.len() && a[j] == id {
            j += 1;
        } else {
            out.push(id);
        }
    }
    out
}
