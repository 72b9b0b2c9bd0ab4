pub mod pix;

pub use pix::PixService;
