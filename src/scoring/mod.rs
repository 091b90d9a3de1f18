// Scoring — least-squares fitting and term importance ranking.

pub mod importance;
pub mod regression;
