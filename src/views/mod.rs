#![forbid(unsafe_code)]

pub mod binary;
pub mod dir;
pub mod info;
pub mod text;
