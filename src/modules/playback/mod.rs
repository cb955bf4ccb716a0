pub mod fragment_picker;
pub mod random_loop;
pub mod rodio_output;
