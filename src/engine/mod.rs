pub mod eligibility;
pub mod enrichment;
pub mod ranking;
pub mod suggestion;
pub mod writeback;
