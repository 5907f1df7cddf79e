use crate::error::{Error, Result};
use crate::ingest::Document;
use crate::DocId;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Range;

/// Term -> postings mapping plus the document registry.
///
/// Document ids are handed out sequentially by [`add_document`](Self::add_document)
/// and every term receives at most one append per call, so each postings list
/// is strictly increasing without ever being sorted. The merge operations in
/// [`crate::postings`] rely on that.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    postings: BTreeMap<String, Vec<DocId>>,
    /// doc id -> external id (DOCNO, file name, ...)
    documents: Vec<String>,
    doc_id_map: HashMap<String, DocId>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Fold a batch of documents into a fresh index, in iteration order.
    pub fn from_documents<I>(docs: I) -> Result<Self>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut index = Self::new();
        for doc in docs {
            index.add_document(doc.external_id.clone(), doc.tokens())?;
        }
        tracing::info!(
            num_docs = index.document_count(),
            num_terms = index.term_count(),
            "index built"
        );
        Ok(index)
    }

    /// Register a document and post each of its distinct terms.
    ///
    /// Returns the id assigned to the document, or `DocIdSpaceExhausted`
    /// once every `DocId` has been handed out; the index is left unchanged.
    pub fn add_document<I, S>(&mut self, external_id: impl Into<String>, tokens: I) -> Result<DocId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let doc_id = next_doc_id(self.documents.len())?;
        let external_id = external_id.into();
        self.doc_id_map.entry(external_id.clone()).or_insert(doc_id);
        self.documents.push(external_id);

        let tokens: Vec<S> = tokens.into_iter().collect();
        let distinct: HashSet<&str> = tokens.iter().map(AsRef::as_ref).collect();
        for term in &distinct {
            match self.postings.get_mut(*term) {
                Some(list) => list.push(doc_id),
                None => {
                    self.postings.insert((*term).to_owned(), vec![doc_id]);
                }
            }
        }
        tracing::debug!(doc_id, distinct_terms = distinct.len(), "added document");
        Ok(doc_id)
    }

    /// Sorted postings for `term`; empty for a term the index has never seen.
    pub fn postings(&self, term: &str) -> &[DocId] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Universe size N.
    pub fn document_count(&self) -> usize { self.documents.len() }

    pub fn term_count(&self) -> usize { self.postings.len() }

    /// Length of the postings list for `term`.
    pub fn document_frequency(&self, term: &str) -> usize { self.postings(term).len() }

    pub fn external_id(&self, doc_id: DocId) -> Result<&str> {
        self.documents
            .get(doc_id as usize)
            .map(String::as_str)
            .ok_or(Error::UnknownDocumentId { doc_id, num_docs: self.documents.len() })
    }

    /// Id of the first document registered under `external_id`.
    pub fn doc_id(&self, external_id: &str) -> Option<DocId> {
        self.doc_id_map.get(external_id).copied()
    }

    /// All assigned document ids, `0..N`.
    pub fn universe(&self) -> Range<DocId> { 0..self.documents.len() as DocId }

    /// `(term, postings)` pairs in lexicographic term order. Call again to
    /// restart the enumeration.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &[DocId])> + '_ {
        self.postings.iter().map(|(t, p)| (t.as_str(), p.as_slice()))
    }
}

/// Id for the document after `num_docs` existing ones. `DocId::MAX` is kept
/// out of use so `0..N` always fits in a `DocId` range.
fn next_doc_id(num_docs: usize) -> Result<DocId> {
    match DocId::try_from(num_docs) {
        Ok(id) if id < DocId::MAX => Ok(id),
        _ => Err(Error::DocIdSpaceExhausted { num_docs }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> InvertedIndex {
        let mut idx = InvertedIndex::new();
        idx.add_document("D0", ["a", "b"]).unwrap();
        idx.add_document("D1", ["b", "c"]).unwrap();
        idx.add_document("D2", ["c", "a"]).unwrap();
        idx
    }

    #[test]
    fn assigns_sequential_ids() {
        let mut idx = InvertedIndex::new();
        assert_eq!(idx.add_document("x", ["t"]).unwrap(), 0);
        assert_eq!(idx.add_document("y", ["t"]).unwrap(), 1);
        assert_eq!(idx.add_document("z", Vec::<String>::new()).unwrap(), 2);
        assert_eq!(idx.document_count(), 3);
        assert_eq!(idx.universe(), 0..3);
    }

    #[test]
    fn builds_sorted_postings() {
        let idx = abc();
        assert_eq!(idx.postings("a"), &[0, 2]);
        assert_eq!(idx.postings("b"), &[0, 1]);
        assert_eq!(idx.postings("c"), &[1, 2]);
        assert_eq!(idx.term_count(), 3);
    }

    #[test]
    fn id_space_exhaustion_is_an_error() {
        assert_eq!(next_doc_id(7), Ok(7));
        assert_eq!(next_doc_id(DocId::MAX as usize - 1), Ok(DocId::MAX - 1));
        let full = DocId::MAX as usize;
        assert_eq!(next_doc_id(full), Err(Error::DocIdSpaceExhausted { num_docs: full }));
        assert!(next_doc_id(usize::MAX).is_err());
    }

    #[test]
    fn repeated_term_posts_once() {
        let mut idx = InvertedIndex::new();
        idx.add_document("d", ["rust", "rust", "rust"]).unwrap();
        assert_eq!(idx.postings("rust"), &[0]);
        assert_eq!(idx.document_frequency("rust"), 1);
    }

    #[test]
    fn unknown_term_is_empty() {
        let idx = abc();
        assert!(idx.postings("zzz").is_empty());
        assert_eq!(idx.document_frequency("zzz"), 0);
    }

    #[test]
    fn external_id_lookup() {
        let idx = abc();
        assert_eq!(idx.external_id(1).unwrap(), "D1");
        assert_eq!(
            idx.external_id(3),
            Err(Error::UnknownDocumentId { doc_id: 3, num_docs: 3 })
        );
        assert_eq!(idx.doc_id("D2"), Some(2));
        assert_eq!(idx.doc_id("nope"), None);
    }

    #[test]
    fn duplicate_external_id_keeps_first() {
        let mut idx = InvertedIndex::new();
        idx.add_document("same", ["a"]).unwrap();
        idx.add_document("same", ["b"]).unwrap();
        assert_eq!(idx.doc_id("same"), Some(0));
        assert_eq!(idx.external_id(1).unwrap(), "same");
    }

    #[test]
    fn terms_are_lexicographic_and_restartable() {
        let mut idx = InvertedIndex::new();
        idx.add_document("d0", ["pear", "apple", "Zebra"]).unwrap();
        let first: Vec<&str> = idx.terms().map(|(t, _)| t).collect();
        let second: Vec<&str> = idx.terms().map(|(t, _)| t).collect();
        assert_eq!(first, vec!["Zebra", "apple", "pear"]);
        assert_eq!(first, second);
    }
}
