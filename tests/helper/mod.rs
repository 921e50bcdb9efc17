#![allow(dead_code)]

pub mod feed;

pub use feed::*;
