//! Postfix (reverse Polish) Boolean queries.
//!
//! A query is a whitespace-separated token stream. `AND`, `OR` and `NOT`
//! (exact case) are operators; every other token is a term. `AND`/`OR` pop
//! two operands, `NOT` pops one and complements it against the current
//! document count.

use crate::error::{Error, QueryFault, Result};
use crate::index::InvertedIndex;
use crate::postings::{complement, intersect, union};
use crate::tokenizer::tokenize;
use crate::DocId;
use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Not,
}

impl Operator {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "AND" => Some(Operator::And),
            "OR" => Some(Operator::Or),
            "NOT" => Some(Operator::Not),
            _ => None,
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Operator::And | Operator::Or => 2,
            Operator::Not => 1,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryToken {
    Term(String),
    Operator(Operator),
}

/// A postfix query whose operand counts have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanQuery {
    tokens: Vec<QueryToken>,
}

impl BooleanQuery {
    /// Tokenize and check that every operator has enough operands and that
    /// exactly one result remains. Fails at the first underflowing operator
    /// without looking at the tokens after it.
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        for (position, raw) in tokenize(text).enumerate() {
            let token = match Operator::from_token(raw) {
                Some(operator) => {
                    if depth < operator.arity() {
                        return Err(Error::MalformedQuery {
                            position,
                            fault: QueryFault::StackUnderflow { operator },
                        });
                    }
                    depth = depth - operator.arity() + 1;
                    QueryToken::Operator(operator)
                }
                None => {
                    depth += 1;
                    QueryToken::Term(raw.to_owned())
                }
            };
            tokens.push(token);
        }
        let position = tokens.len();
        match depth {
            1 => Ok(Self { tokens }),
            0 => Err(Error::MalformedQuery { position, fault: QueryFault::EmptyQuery }),
            remaining => Err(Error::MalformedQuery {
                position,
                fault: QueryFault::DanglingOperands { remaining },
            }),
        }
    }

    pub fn tokens(&self) -> &[QueryToken] { &self.tokens }
}

impl fmt::Display for BooleanQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 { f.write_str(" ")?; }
            match token {
                QueryToken::Term(t) => f.write_str(t)?,
                QueryToken::Operator(op) => write!(f, "{op}")?,
            }
        }
        Ok(())
    }
}

/// Stack-machine evaluator over a built index.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    index: &'a InvertedIndex,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self { Self { index } }

    /// Sorted ids of the documents matching `query`. Unknown terms evaluate
    /// to an empty postings list.
    ///
    /// Cannot fail: [`BooleanQuery::parse`] already proved every operator has
    /// its operands and exactly one result remains.
    pub fn evaluate(&self, query: &BooleanQuery) -> Vec<DocId> {
        // term operands borrow the index; only operator results allocate
        let mut stack: Vec<Cow<'a, [DocId]>> = Vec::new();
        for token in &query.tokens {
            let result = match token {
                QueryToken::Term(term) => {
                    stack.push(Cow::Borrowed(self.index.postings(term)));
                    continue;
                }
                QueryToken::Operator(operator) => {
                    debug_assert!(stack.len() >= operator.arity(), "parse checked operand depth");
                    match operator {
                        Operator::And | Operator::Or => {
                            let list2 = stack.pop().unwrap_or_default();
                            let list1 = stack.pop().unwrap_or_default();
                            if *operator == Operator::And {
                                intersect(&list1, &list2)
                            } else {
                                union(&list1, &list2)
                            }
                        }
                        Operator::Not => {
                            let list1 = stack.pop().unwrap_or_default();
                            complement(&list1, self.index.document_count())
                        }
                    }
                }
            };
            stack.push(Cow::Owned(result));
        }
        debug_assert_eq!(stack.len(), 1, "parse checked the final stack depth");
        stack.pop().map(Cow::into_owned).unwrap_or_default()
    }

    /// Parse and evaluate one query line.
    pub fn search(&self, text: &str) -> Result<Vec<DocId>> {
        let query = BooleanQuery::parse(text)?;
        let hits = self.evaluate(&query);
        tracing::debug!(%query, hits = hits.len(), "evaluated query");
        Ok(hits)
    }

    /// One result per query line, in input order. A malformed line fails on
    /// its own and does not stop the rest of the batch.
    pub fn search_batch<I>(&self, lines: I) -> Vec<Result<Vec<DocId>>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        lines
            .into_iter()
            .enumerate()
            .map(|(lineno, line)| {
                let result = self.search(line.as_ref());
                if let Err(e) = &result {
                    tracing::warn!(line = lineno + 1, error = %e, "skipping malformed query");
                }
                result
            })
            .collect()
    }
}
