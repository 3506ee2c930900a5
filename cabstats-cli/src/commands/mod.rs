pub mod reformat;

pub use reformat::run_reformat;
