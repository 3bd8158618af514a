//! Text processing and analysis module

pub mod vocabulary;
pub mod skill_extractor;
pub mod similarity;
pub mod scorer;
pub mod verdict;
pub mod feedback;
pub mod highlighter;
pub mod analyzer;
