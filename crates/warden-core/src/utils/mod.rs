//! Utility modules for Warden

pub mod json;

pub use json::{
    coerce_bool, coerce_i64, first_present_field, is_blank, non_blank_str, text_content,
};
