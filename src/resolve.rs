//! Vector resolution.
//!
//! User tokens are expanded against the reference (first) case's vocabulary.
//! Plain resolution strictly precedes restart classification: a token that
//! matches at least one vocabulary key is a plain vector even when it would
//! also parse as `NAME:I,J,K` (block vectors live in the vocabulary with
//! exactly that spelling). Tokens matching neither are warned about and
//! dropped, never fatal on their own.

use tracing::warn;

use crate::error::PlotError;
use crate::model::{RestartVector, VectorSpec};
use crate::source::SummaryCase;

/// Resolver output: concrete plain keys plus restart vectors, both in first-use
/// order and deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVectors {
    pub plain: Vec<String>,
    pub restart: Vec<RestartVector>,
}

/// Classify one token against the reference vocabulary.
pub fn classify(reference: &SummaryCase, token: &str) -> Option<VectorSpec> {
    if !reference.summary().keys(token).is_empty() {
        return Some(VectorSpec::Plain {
            pattern: token.to_string(),
        });
    }
    RestartVector::parse(token).map(VectorSpec::RestartIndexed)
}

/// Expand all vector tokens. Fails only when nothing at all resolved.
pub fn resolve_vectors(
    reference: &SummaryCase,
    tokens: &[String],
) -> Result<ResolvedVectors, PlotError> {
    let mut plain: Vec<String> = Vec::new();
    let mut restart: Vec<RestartVector> = Vec::new();

    for token in tokens {
        match classify(reference, token) {
            Some(VectorSpec::Plain { pattern }) => {
                for key in reference.summary().keys(&pattern) {
                    if !plain.contains(&key) {
                        plain.push(key);
                    }
                }
            }
            Some(VectorSpec::RestartIndexed(vector)) => {
                if !restart.contains(&vector) {
                    restart.push(vector);
                }
            }
            None => {
                warn!(
                    token = %token,
                    "matches neither the reference vocabulary nor the restart grammar, dropped"
                );
            }
        }
    }

    if plain.is_empty() && restart.is_empty() {
        return Err(PlotError::NoVectors);
    }
    Ok(ResolvedVectors { plain, restart })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::source::fake::{summary_case, FakeSummary};
    use crate::source::SummaryCase;

    fn reference() -> SummaryCase {
        summary_case(
            "REF",
            FakeSummary::default()
                .with("FOPR", &[0.0], &[1.0])
                .with("FOPT", &[0.0], &[1.0])
                .with("WOPR:OP1", &[0.0], &[1.0])
                .with("WOPR:OP2", &[0.0], &[1.0])
                .with("BPR:10,5,3", &[0.0], &[1.0]),
        )
    }

    #[test]
    fn wildcard_expansion_is_exact_glob_match() {
        let resolved =
            resolve_vectors(&reference(), &["WOPR:*".into(), "FOP?".into()]).expect("resolves");
        assert_eq!(
            resolved.plain,
            vec!["WOPR:OP1".to_string(), "WOPR:OP2".into(), "FOPR".into(), "FOPT".into()]
        );
        assert!(resolved.restart.is_empty());
    }

    #[test]
    fn zero_match_pattern_is_excluded_not_fatal() {
        let resolved =
            resolve_vectors(&reference(), &["GGOR*".into(), "FOPR".into()]).expect("resolves");
        assert_eq!(resolved.plain, vec!["FOPR".to_string()]);
    }

    #[test]
    fn plain_resolution_precedes_restart_classification() {
        // In the vocabulary: stays plain even though the grammar matches.
        let resolved = resolve_vectors(&reference(), &["BPR:10,5,3".into()]).expect("resolves");
        assert_eq!(resolved.plain, vec!["BPR:10,5,3".to_string()]);
        assert!(resolved.restart.is_empty());

        // Not in the vocabulary: restart-indexed.
        let resolved = resolve_vectors(&reference(), &["SOIL:10,5,3".into()]).expect("resolves");
        assert!(resolved.plain.is_empty());
        assert_eq!(resolved.restart[0].label(), "SOIL:10,5,3");
    }

    #[test]
    fn malformed_tokens_are_dropped() {
        let resolved =
            resolve_vectors(&reference(), &["soil:1,2,3".into(), "FOPR".into()]).expect("resolves");
        assert_eq!(resolved.plain, vec!["FOPR".to_string()]);
        assert!(resolved.restart.is_empty());
    }

    #[test]
    fn nothing_resolved_is_fatal() {
        let err = resolve_vectors(&reference(), &["NOPE*".into(), "bad:1".into()]).unwrap_err();
        assert!(matches!(err, PlotError::NoVectors));
    }

    #[test]
    fn duplicate_expansions_collapse() {
        let resolved =
            resolve_vectors(&reference(), &["FOPR".into(), "FOP*".into()]).expect("resolves");
        assert_eq!(resolved.plain, vec!["FOPR".to_string(), "FOPT".into()]);
    }
}
