//! Password analyzer - main evaluation logic.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

#[cfg(feature = "async")]
use crate::breach::{BreachLookup, BreachOracle, RangeClient};
use crate::common::CommonPasswords;
use crate::config::AnalyzerConfig;
use crate::entropy;
use crate::error::{AnalyzeError, AnalyzerError, ResourceWarning};
use crate::feedback::{self, FeedbackInput};
use crate::patterns::{PatternDetector, WordLists};
use crate::policy::{Policy, ValidationResult};
use crate::sections::{
    SectionInput, SectionScore, character_variety_section, common_password_section,
    entropy_section, length_section, pattern_penalty_section,
};
#[cfg(feature = "async")]
use crate::types::AnalyzeOptions;
use crate::types::{
    AnalysisResult, BreachStatus, CharProfile, PatternKind, PatternMatch, StrengthCategory,
};

/// Combines the section scores into a final score in `0..=100`, rounded to
/// one decimal.
pub fn score(input: &SectionInput<'_>) -> f64 {
    // Orchestrator: execute sections in sequence
    let sections: [(&str, fn(&SectionInput<'_>) -> SectionScore); 5] = [
        ("length", length_section),
        ("variety", character_variety_section),
        ("entropy", entropy_section),
        ("pattern", pattern_penalty_section),
        ("common", common_password_section),
    ];

    let mut total = 0.0;
    for (_section_name, section_fn) in sections {
        let points = section_fn(input);
        #[cfg(feature = "tracing")]
        tracing::trace!("Section {} scored {:.2}", _section_name, points);
        total += points;
    }

    (total.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

/// Decodes raw input into a password, rejecting invalid UTF-8 up front.
pub fn password_from_bytes(bytes: &[u8]) -> Result<SecretString, AnalyzeError> {
    let text = std::str::from_utf8(bytes).map_err(|e| AnalyzeError::InvalidUtf8(e.valid_up_to()))?;
    Ok(SecretString::from(text.to_string()))
}

/// Analysis context: compiled matchers, the common-password index and an
/// optional breach oracle, all shared read-only between analyses.
pub struct Analyzer {
    detector: Arc<PatternDetector>,
    common: Arc<CommonPasswords>,
    #[cfg(feature = "async")]
    oracle: Option<Arc<dyn BreachLookup>>,
    warnings: Vec<ResourceWarning>,
}

impl Analyzer {
    pub fn new(detector: PatternDetector, common: CommonPasswords) -> Self {
        Self {
            detector: Arc::new(detector),
            common: Arc::new(common),
            #[cfg(feature = "async")]
            oracle: None,
            warnings: Vec::new(),
        }
    }

    /// Analyzer over the bundled lists, without a breach oracle.
    pub fn builtin() -> Result<Self, AnalyzerError> {
        Ok(Self::new(PatternDetector::builtin()?, CommonPasswords::builtin()))
    }

    /// Builds an analyzer from configuration. List files that cannot be
    /// loaded are replaced by empty lists and reported by [`Analyzer::warnings`].
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The pattern matchers cannot be compiled
    /// - The breach client cannot be built
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let (lists, mut warnings) =
            WordLists::load(config.dictionary_path.as_deref(), config.context_path.as_deref());

        let common = match &config.common_passwords_path {
            Some(path) => {
                let (common, error) = CommonPasswords::load_or_empty(path);
                if let Some(error) = error {
                    warnings.push(ResourceWarning {
                        resource: "common passwords",
                        error,
                    });
                }
                common
            }
            None => CommonPasswords::builtin(),
        };

        let mut analyzer = Self::new(PatternDetector::new(&lists)?, common);

        #[cfg(feature = "async")]
        {
            analyzer = analyzer.with_oracle(BreachOracle::from_config(&config.breach, &mut warnings)?);
        }

        analyzer.warnings = warnings;
        Ok(analyzer)
    }

    #[cfg(feature = "async")]
    pub fn with_oracle<C: RangeClient + 'static>(mut self, oracle: BreachOracle<C>) -> Self {
        self.oracle = Some(Arc::new(oracle));
        self
    }

    /// Resource problems found while building this analyzer.
    pub fn warnings(&self) -> &[ResourceWarning] {
        &self.warnings
    }

    /// Full analysis without the breach check. Pure and deterministic.
    pub fn analyze_offline(&self, password: &SecretString) -> AnalysisResult {
        self.assemble(password, None)
    }

    /// Full analysis, adding the breach status when requested. A breach
    /// check without an oracle reports an unknown status.
    #[cfg(feature = "async")]
    pub async fn analyze(&self, password: &SecretString, options: AnalyzeOptions) -> AnalysisResult {
        let breach = if options.check_breach {
            Some(match &self.oracle {
                Some(oracle) => oracle.lookup_status(password).await,
                None => BreachStatus::unknown("No breach oracle configured"),
            })
        } else {
            None
        };
        self.assemble(password, breach)
    }

    /// Analyzes, then checks the result against `policy`.
    #[cfg(feature = "async")]
    pub async fn validate(
        &self,
        password: &SecretString,
        policy: &Policy,
        options: AnalyzeOptions,
    ) -> ValidationResult {
        let result = self.analyze(password, options).await;
        policy.validate(password, &result)
    }

    /// Offline analysis checked against `policy`. Breach rules cannot pass.
    pub fn validate_offline(&self, password: &SecretString, policy: &Policy) -> ValidationResult {
        let result = self.analyze_offline(password);
        policy.validate(password, &result)
    }

    /// Analyzes and sends the result over `tx`. Nothing is sent when the
    /// token is cancelled first.
    #[cfg(feature = "async")]
    pub async fn analyze_tx(
        &self,
        password: &SecretString,
        options: AnalyzeOptions,
        token: CancellationToken,
        tx: mpsc::Sender<AnalysisResult>,
    ) {
        #[cfg(feature = "tracing")]
        tracing::info!("analysis is about to start...");

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                #[cfg(feature = "tracing")]
                tracing::info!("analysis cancelled");
                return;
            }
            result = self.analyze(password, options) => result,
        };

        if let Err(_e) = tx.send(result).await {
            #[cfg(feature = "tracing")]
            tracing::error!("Failed to send password analysis result: {}", _e);
        }
    }

    fn assemble(&self, password: &SecretString, breach: Option<BreachStatus>) -> AnalysisResult {
        let pwd = password.expose_secret();

        let profile = CharProfile::of(pwd);
        let entropy = entropy::measure(pwd);
        let mut patterns = self.detector.detect(pwd);
        let is_common = self.common.contains(pwd);
        if is_common {
            patterns.push(PatternMatch::new(PatternKind::CommonPassword, pwd, 0));
        }

        let score = score(&SectionInput {
            profile: &profile,
            entropy: &entropy,
            patterns: &patterns,
            is_common,
        });

        let feedback = feedback::generate(&FeedbackInput {
            score,
            profile: &profile,
            patterns: &patterns,
            is_common,
            breach: breach.as_ref(),
        });

        AnalysisResult {
            score,
            category: StrengthCategory::from_score(score),
            entropy,
            profile,
            patterns,
            is_common,
            breach,
            feedback,
        }
    }
}
