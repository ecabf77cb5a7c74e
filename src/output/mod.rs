pub mod buffer;
pub mod channels;
