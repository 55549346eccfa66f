// src/core/tools/mod.rs

// Auxiliary lookups offered next to the reputation scanner.
pub mod url_expander;
pub mod waf_detector;
