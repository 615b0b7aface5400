//! Ancillary demo handlers: HTML extraction and JSON utilities. Stateless
//! and independent of the employee surface.

pub mod html;
pub mod json;
