pub mod explanation;
pub mod match_summary;
pub mod policy_model;
