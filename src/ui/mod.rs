pub mod charts;
pub mod export;
pub mod panels;
