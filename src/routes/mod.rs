//! HTML page routes.

pub mod form;
