//! Real probe and control implementations

pub mod page_probes;
pub mod quotation;

#[cfg(test)]
pub mod tests;

pub use page_probes::*;
pub use quotation::*;
