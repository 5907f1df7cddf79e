use crate::query::Operator;
use crate::DocId;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Lookup of a document id the index never assigned.
    #[error("unknown document id {doc_id} (index holds {num_docs} documents)")]
    UnknownDocumentId { doc_id: DocId, num_docs: usize },

    /// Every `DocId` has been assigned; no further documents can be added.
    #[error("document id space exhausted after {num_docs} documents")]
    DocIdSpaceExhausted { num_docs: usize },

    /// Structurally invalid postfix query. `position` is the zero-based token
    /// index of the offending operator, or the token count when the fault is
    /// only visible at the end of the query.
    #[error("malformed query at token {position}: {fault}")]
    MalformedQuery { position: usize, fault: QueryFault },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFault {
    /// An operator found fewer operands on the stack than its arity.
    StackUnderflow { operator: Operator },
    /// The query had no tokens at all.
    EmptyQuery,
    /// More than one operand was left once all tokens were consumed.
    DanglingOperands { remaining: usize },
}

impl fmt::Display for QueryFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryFault::StackUnderflow { operator } => write!(
                f,
                "{operator} needs {} operand(s) but the stack is short",
                operator.arity()
            ),
            QueryFault::EmptyQuery => f.write_str("query is empty"),
            QueryFault::DanglingOperands { remaining } => {
                write!(f, "{remaining} operands left on the stack, expected 1")
            }
        }
    }
}
