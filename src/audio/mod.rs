pub mod analysis;
pub mod decode;
pub mod features;
pub mod history;
pub mod source;
