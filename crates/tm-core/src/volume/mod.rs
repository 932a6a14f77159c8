//! Volume indicators
//!
//! - Elder Force Index: price change weighted by traded volume

mod force_index;

pub use force_index::{elder_force_index, ForceIndex, ForceIndexParams, VolumeAlignment};
