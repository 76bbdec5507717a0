// Allow dead code for features under development
#![allow(dead_code)]

pub mod domain;
pub mod infrastructure;
