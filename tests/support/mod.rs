#![allow(dead_code)]

pub mod fake_processor;
pub mod memory;
pub mod redis_container;
