use boolsearch_core::postings::{complement, intersect, union};
use boolsearch_core::{DocId, FrequencyRanker, InvertedIndex, QueryEngine};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn sorted_ids(max: DocId) -> impl Strategy<Value = Vec<DocId>> {
    proptest::collection::btree_set(0..max, 0..20).prop_map(|s| s.into_iter().collect())
}

fn corpus() -> impl Strategy<Value = Vec<Vec<String>>> {
    proptest::collection::vec(proptest::collection::vec("[a-e]{1,2}", 0..12), 1..30)
}

/// Every `(term, df)` pair fully sorted by `cmp`, then cut to `n`.
fn sorted_by<F>(idx: &InvertedIndex, n: usize, cmp: F) -> Vec<(String, usize)>
where
    F: Fn(&(String, usize), &(String, usize)) -> std::cmp::Ordering,
{
    let mut all: Vec<(String, usize)> = idx.terms().map(|(t, p)| (t.to_owned(), p.len())).collect();
    all.sort_by(cmp);
    all.truncate(n);
    all
}

fn build(docs: &[Vec<String>]) -> InvertedIndex {
    let mut idx = InvertedIndex::new();
    for (i, doc) in docs.iter().enumerate() {
        idx.add_document(format!("doc-{i}"), doc).unwrap();
    }
    idx
}

proptest! {
    #[test]
    fn intersect_matches_set_intersection(a in sorted_ids(64), b in sorted_ids(64)) {
        let sa: BTreeSet<DocId> = a.iter().copied().collect();
        let sb: BTreeSet<DocId> = b.iter().copied().collect();
        let naive: Vec<DocId> = sa.intersection(&sb).copied().collect();
        prop_assert_eq!(intersect(&a, &b), naive);
    }

    #[test]
    fn union_matches_set_union(a in sorted_ids(64), b in sorted_ids(64)) {
        let sa: BTreeSet<DocId> = a.iter().copied().collect();
        let sb: BTreeSet<DocId> = b.iter().copied().collect();
        let naive: Vec<DocId> = sa.union(&sb).copied().collect();
        prop_assert_eq!(union(&a, &b), naive);
    }

    #[test]
    fn complement_matches_set_difference(a in sorted_ids(64)) {
        let sa: BTreeSet<DocId> = a.iter().copied().collect();
        let naive: Vec<DocId> = (0..64).filter(|id| !sa.contains(id)).collect();
        prop_assert_eq!(complement(&a, 64), naive);
    }

    #[test]
    fn double_negation_is_identity(a in sorted_ids(50)) {
        prop_assert_eq!(complement(&complement(&a, 50), 50), a);
    }

    #[test]
    fn postings_stay_strictly_increasing(docs in corpus()) {
        let mut idx = InvertedIndex::new();
        for (i, doc) in docs.iter().enumerate() {
            idx.add_document(format!("doc-{i}"), doc).unwrap();
            for (_, postings) in idx.terms() {
                prop_assert!(postings.windows(2).all(|w| w[0] < w[1]));
                prop_assert!(postings.iter().all(|&id| (id as usize) < idx.document_count()));
            }
        }
    }

    #[test]
    fn and_commutes(docs in corpus(), t1 in "[a-e]{1,2}", t2 in "[a-e]{1,2}") {
        let idx = build(&docs);
        let engine = QueryEngine::new(&idx);
        prop_assert_eq!(
            engine.search(&format!("{t1} {t2} AND")).unwrap(),
            engine.search(&format!("{t2} {t1} AND")).unwrap()
        );
    }

    #[test]
    fn and_associates(docs in corpus(), t1 in "[a-e]{1,2}", t2 in "[a-e]{1,2}", t3 in "[a-e]{1,2}") {
        let idx = build(&docs);
        let engine = QueryEngine::new(&idx);
        prop_assert_eq!(
            engine.search(&format!("{t1} {t2} AND {t3} AND")).unwrap(),
            engine.search(&format!("{t1} {t2} {t3} AND AND")).unwrap()
        );
    }

    #[test]
    fn not_of_contradiction_is_universe(docs in corpus(), t in "[a-e]{1,2}") {
        let idx = build(&docs);
        let engine = QueryEngine::new(&idx);
        let expected: Vec<DocId> = idx.universe().collect();
        prop_assert_eq!(engine.search(&format!("{t} {t} NOT AND NOT")).unwrap(), expected.clone());
        prop_assert_eq!(engine.search(&format!("{t} {t} NOT OR")).unwrap(), expected);
    }

    #[test]
    fn top_n_matches_full_sort(docs in corpus(), n in 0usize..40) {
        let idx = build(&docs);
        let got: Vec<(String, usize)> = FrequencyRanker::new(&idx)
            .top_n(n)
            .into_iter()
            .map(|r| (r.term, r.document_frequency))
            .collect();
        let expected = sorted_by(&idx, n, |a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn bottom_n_matches_full_sort(docs in corpus(), n in 0usize..40) {
        let idx = build(&docs);
        let got: Vec<(String, usize)> = FrequencyRanker::new(&idx)
            .bottom_n(n)
            .into_iter()
            .map(|r| (r.term, r.document_frequency))
            .collect();
        let expected = sorted_by(&idx, n, |a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        prop_assert_eq!(got, expected);
    }
}
