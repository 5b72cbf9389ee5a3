pub mod constants;
pub mod frames;
pub mod migratrack;
pub mod migratrack_errors;
pub mod observations;
pub mod palette;
pub mod params;
pub mod render;
pub mod time;
pub mod tracks;
