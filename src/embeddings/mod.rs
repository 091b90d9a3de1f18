// Word embeddings — training and similarity queries over titles and tags.

pub mod index;
pub mod word2vec;

pub use index::EmbeddingSpace;
pub use word2vec::{Architecture, Word2VecParams};
