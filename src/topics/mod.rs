// Term extraction — normalization, stop words and TF-IDF weighting.

pub mod normalize;
pub mod stopwords;
pub mod tfidf;
pub mod traits;
