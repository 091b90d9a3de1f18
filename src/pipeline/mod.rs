// Pipeline orchestration — runs the analysis stages in order.

pub mod analysis;
