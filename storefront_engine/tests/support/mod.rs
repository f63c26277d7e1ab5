#![allow(dead_code)]
pub mod line_items;
pub mod prepare_env;
