//! # Miscellaneous Blocks
pub mod conv_act;
