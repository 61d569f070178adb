//! Vocabulary mapping tokens to dense indices.
//!
//! Built once per training corpus and passed explicitly to every encode and
//! decode call. The same corpus always yields the same mapping.

use std::collections::{BTreeSet, HashMap};

use super::token::Token;

/// Bijective mapping between the distinct tokens of a corpus and
/// `0..len()`, ordered lexicographically by token string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    tokens: Vec<Token>,
    index: HashMap<Token, usize>,
}

impl Vocabulary {
    /// Builds the vocabulary of a token stream.
    pub fn build(tokens: &[Token]) -> Self {
        let distinct: BTreeSet<&Token> = tokens.iter().collect();
        Self::from_sorted(distinct.into_iter().cloned().collect())
    }

    fn from_sorted(tokens: Vec<Token>) -> Self {
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| (token.clone(), i))
            .collect();
        Self { tokens, index }
    }

    /// Returns the number of distinct tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the vocabulary holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the index of a token, if present.
    pub fn index_of(&self, token: &Token) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Returns the token at an index, if in range.
    pub fn token_at(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Returns all tokens in index order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}
