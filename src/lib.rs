pub mod ast;
pub mod interpreter;
pub mod parser;
pub mod token_stream;
pub mod tokenizer;
