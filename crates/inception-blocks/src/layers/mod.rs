//! Common low-level modules for building Inception blocks in Burn.
pub mod activation;
pub mod blocks;
pub mod inception;
pub mod padding;
pub mod pool;
