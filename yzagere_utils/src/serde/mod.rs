//! Lenient deserializers for values submitted by browsers, where the same
//! field may arrive as a string, a number or `null`.

pub mod lenient_string;
pub mod lenient_millis;
