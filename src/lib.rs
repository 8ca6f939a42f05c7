//! Password risk analysis library
//!
//! This library scores password strength, detects weak patterns, validates
//! passwords against policies and checks breach exposure through a
//! k-anonymity range query, either one at a time or in concurrent batches.
//!
//! # Features
//!
//! - `async` (default): Enables the breach oracle, async analysis and batch execution
//! - `tracing` (default): Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! Read by [`AnalyzerConfig::from_env`]:
//!
//! - `PWD_AUDIT_COMMON_PATH`: Custom common-password list
//! - `PWD_AUDIT_DICTIONARY_PATH`: Custom dictionary word list
//! - `PWD_AUDIT_CONTEXT_PATH`: Custom contextual term list
//! - `PWD_AUDIT_BREACH_URL`: Range API base URL
//!   (default: `https://api.pwnedpasswords.com`)
//! - `PWD_AUDIT_BREACH_TIMEOUT`: Breach request timeout in seconds
//! - `PWD_AUDIT_CACHE_DIR`: Directory for the persistent breach cache
//! - `PWD_AUDIT_CACHE_TTL_DAYS`: Breach cache entry lifetime
//! - `PWD_AUDIT_BATCH_CONCURRENCY`: Batch items in flight
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_audit::{AnalyzeOptions, Analyzer, AnalyzerConfig, load_policy};
//! use secrecy::SecretString;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! // Build the analyzer once and share it
//! let analyzer = Analyzer::from_config(&AnalyzerConfig::from_env()?)?;
//! for warning in analyzer.warnings() {
//!     eprintln!("{}", warning);
//! }
//!
//! let password = SecretString::from("MyP@ssw0rd!".to_string());
//! let result = analyzer
//!     .analyze(&password, AnalyzeOptions { check_breach: true })
//!     .await;
//!
//! println!("Score: {} ({})", result.score, result.category);
//! for line in &result.feedback {
//!     println!("- {}", line);
//! }
//!
//! let policy = load_policy("strong")?;
//! let validation = policy.validate(&password, &result);
//! println!("Compliant: {}", validation.passed);
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod config;
pub mod entropy;
pub mod error;
pub mod feedback;
pub mod generator;
pub mod patterns;
pub mod policy;
pub mod sections;
pub mod types;

mod evaluator;

#[cfg(feature = "async")]
pub mod batch;
#[cfg(feature = "async")]
pub mod breach;

// Public API
pub use common::CommonPasswords;
pub use config::{AnalyzerConfig, BreachConfig};
pub use error::{
    AnalyzeError, AnalyzerError, BreachError, CacheError, ConfigError, DetectorError,
    GeneratorError, PolicyError, ResourceError, ResourceWarning,
};
pub use evaluator::{Analyzer, password_from_bytes, score};
pub use generator::{GeneratorOptions, generate_password, generate_passwords};
pub use patterns::{PatternDetector, WordLists};
pub use policy::{Policy, PolicyBuilder, Rule, ValidationResult, load_policy};
pub use types::{
    AnalysisResult, AnalyzeOptions, BreachStatus, CharProfile, EntropyMeasures, PatternKind,
    PatternMatch, PatternReport, StrengthCategory,
};

#[cfg(feature = "async")]
pub use batch::{BatchOptions, BatchReport, Degradation, SummaryStatistics, analyze_batch};
#[cfg(feature = "async")]
pub use breach::{BreachOracle, FileCache, HttpRangeClient, MemoryCache};
