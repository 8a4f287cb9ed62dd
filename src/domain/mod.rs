pub mod advisory_firm;
pub mod deal;
pub mod deal_block;
pub mod firm;
