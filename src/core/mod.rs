// src/core/mod.rs

/// Data structures shared by the scanner, the tools and the UI, such as
/// `ScanOutcome`, `ReputationStats` and `WafResults`.
pub mod models;

/// Reputation lookups (URL, IP, file) against the external scanning service.
pub mod reputation;

/// URL expansion and WAF fingerprinting.
pub mod tools;

/// Wording for every verdict and links to the service's report pages.
pub mod knowledge_base;
