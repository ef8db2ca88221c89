pub mod analysis;
pub mod capture;
pub mod decode;
pub mod frame;
pub mod pitch;
