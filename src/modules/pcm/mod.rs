pub mod duration;
pub mod encoder;
pub mod samples;
