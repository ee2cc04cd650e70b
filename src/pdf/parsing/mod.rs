//! Document metadata parsing

pub mod toc;
