//! Command implementations.

pub mod all_pairs;
pub mod inspect;
pub mod similar;
pub mod top_k;
