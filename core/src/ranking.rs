//! Top-N / bottom-N terms by document frequency.
//!
//! Selection keeps a bounded heap of `n` candidates and scans the terms once,
//! O(T log n). Equal frequencies are always ordered by ascending term, so the
//! output never depends on iteration order.

use crate::index::InvertedIndex;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermFrequency {
    pub term: String,
    pub document_frequency: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyReport {
    pub top: Vec<TermFrequency>,
    pub bottom: Vec<TermFrequency>,
}

#[derive(Debug, Clone, Copy)]
pub struct FrequencyRanker<'a> {
    index: &'a InvertedIndex,
}

impl<'a> FrequencyRanker<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self { Self { index } }

    /// The `n` most frequent terms, most frequent first.
    pub fn top_n(&self, n: usize) -> Vec<TermFrequency> {
        // larger key ranks higher: longer postings, then smaller term
        self.select(n, |df, term| (df, Reverse(term)))
    }

    /// The `n` least frequent terms, least frequent first.
    pub fn bottom_n(&self, n: usize) -> Vec<TermFrequency> {
        self.select(n, |df, term| (Reverse(df), Reverse(term)))
    }

    pub fn report(&self, top: usize, bottom: usize) -> FrequencyReport {
        FrequencyReport { top: self.top_n(top), bottom: self.bottom_n(bottom) }
    }

    /// Keep the `n` terms with the largest `rank` key. The heap is a min-heap
    /// over the key so its root is always the weakest kept candidate.
    fn select<K, F>(&self, n: usize, rank: F) -> Vec<TermFrequency>
    where
        K: Ord,
        F: Fn(usize, &'a str) -> K,
    {
        // n may come straight from a request; never size anything from it unclamped
        let n = n.min(self.index.term_count());
        if n == 0 {
            return Vec::new();
        }
        let mut heap: BinaryHeap<Reverse<(K, &'a str, usize)>> = BinaryHeap::with_capacity(n);
        for (term, postings) in self.index.terms() {
            let df = postings.len();
            let candidate = Reverse((rank(df, term), term, df));
            if heap.len() < n {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|weakest| candidate < *weakest) {
                // Reverse flips the comparison: "less" here means a stronger key
                heap.pop();
                heap.push(candidate);
            }
        }
        // ascending Reverse order is descending key order: strongest first
        heap.into_sorted_vec()
            .into_iter()
            .map(|Reverse((_, term, df))| TermFrequency { term: term.to_owned(), document_frequency: df })
            .collect()
    }
}
