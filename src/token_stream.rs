use std::collections::VecDeque;

use crate::tokenizer::Token;

/// FIFO holder for tokens. The tokenizer fills it front to back; the parser
/// drains it in the same order, never past the end-of-input token.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: VecDeque<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, token: Token) {
        self.tokens.push_back(token);
    }

    /// Removes and returns the earliest not-yet-consumed token.
    pub fn dequeue(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

impl FromIterator<Token> for TokenStream {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TokenStream {
    type Item = Token;
    type IntoIter = std::collections::vec_deque::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tokenizer::TokenType;

    #[test]
    fn test_fifo_order() {
        let mut stream = TokenStream::new();
        stream.enqueue(Token::new(TokenType::Identifier, "x", 1));
        stream.enqueue(Token::new(TokenType::Semicolon, ";", 1));

        assert_eq!(stream.len(), 2);
        assert_eq!(stream.peek().unwrap().lexeme, "x");
        assert_eq!(stream.dequeue().unwrap().lexeme, "x");
        assert_eq!(stream.dequeue().unwrap().lexeme, ";");
        assert!(stream.is_empty());
        assert_eq!(stream.dequeue(), None);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut stream: TokenStream = [Token::new(TokenType::Number, "7", 1)]
            .into_iter()
            .collect();
        assert_eq!(stream.peek(), stream.peek());
        assert_eq!(stream.dequeue().unwrap().lexeme, "7");
    }
}
