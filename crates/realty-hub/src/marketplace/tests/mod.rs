mod common;

mod properties;
mod reporting;
