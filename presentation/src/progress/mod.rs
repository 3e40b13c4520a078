//! Progress indicators

pub mod spinner;
