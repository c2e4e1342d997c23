pub mod chart;
pub mod collector;
pub mod config;
pub mod config_file;
pub mod ctx;
pub mod get_terminal_width;
pub mod io_utils;
pub mod pipeline;
pub mod runner;
pub mod sampling;
pub mod stats;
pub mod store;
pub mod task;
pub mod timing_output;
pub mod utillib;
