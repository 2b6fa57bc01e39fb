pub mod algorithm_selector;
pub mod detection;
pub mod diff_record;
pub mod difficulty;
pub mod pixel_buffer;
pub mod region;
pub mod region_selector;
pub mod transforms;
