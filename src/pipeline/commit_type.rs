use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Conventional-commit category of a commit message.
///
/// Variants are declared in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Test,
    Chore,
    Perf,
    Build,
    Revert,
    Ci,
    Others,
}

impl CommitType {
    /// Spellings that map to this type.
    #[must_use]
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Feat => &["feature", "feat", "features", "feats"],
            Self::Fix => &["fix"],
            Self::Docs => &["docs", "doc", "documentation"],
            Self::Style => &["style", "styles"],
            Self::Refactor => &["refactor", "refactors", "refact"],
            Self::Test => &["test", "tests"],
            Self::Chore => &["chore", "chores"],
            Self::Perf => &["perf", "performance"],
            Self::Build => &["build", "builds"],
            Self::Revert => &["revert"],
            Self::Ci => &["ci", "cicd", "pipeline", "pipelines", "cd"],
            Self::Others => &[],
        }
    }

    /// Classifies a commit message.
    ///
    /// The leading token (up to the first `:`, `(`, `!`, `/` or whitespace) is lower-cased and
    /// matched exactly against the aliases. Failing that, the first type with an alias occurring
    /// anywhere in the message wins. Otherwise the commit is [`CommitType::Others`].
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let token = message
            .split(|c: char| matches!(c, ':' | '(' | '!' | '/') || c.is_whitespace())
            .next()
            .unwrap_or_default()
            .to_lowercase();

        Self::iter()
            .find(|kind| kind.aliases().contains(&token.as_str()))
            .or_else(|| Self::iter().find(|kind| kind.aliases().iter().any(|alias| message.contains(alias))))
            .unwrap_or(Self::Others)
    }

    #[must_use]
    pub const fn is_conventional(self) -> bool {
        !matches!(self, Self::Others)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_token() {
        assert_eq!(CommitType::classify("feat: add x"), CommitType::Feat);
        assert_eq!(CommitType::classify("docs(readme): update"), CommitType::Docs);
        assert_eq!(CommitType::classify("fix!: breaking"), CommitType::Fix);
        assert_eq!(CommitType::classify("Refactor/parser cleanup"), CommitType::Refactor);
        assert_eq!(CommitType::classify("PERF tune loop"), CommitType::Perf);
        assert_eq!(CommitType::classify("Features: many"), CommitType::Feat);
    }

    #[test]
    fn test_substring_fallback_in_declared_order() {
        assert_eq!(CommitType::classify("Add tests for the fix"), CommitType::Fix);
        assert_eq!(CommitType::classify("update documentation"), CommitType::Docs);
        assert_eq!(CommitType::classify("bump builds"), CommitType::Build);
    }

    #[test]
    fn test_others() {
        assert_eq!(CommitType::classify("Merge pull request"), CommitType::Others);
        assert_eq!(CommitType::classify(""), CommitType::Others);
        assert_eq!(CommitType::classify("initial import"), CommitType::Others);
    }

    #[test]
    fn test_substring_match_is_case_sensitive() {
        assert_eq!(CommitType::classify("Initial Import Of Documentation"), CommitType::Others);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(CommitType::Feat.to_string(), "feat");
        assert_eq!(CommitType::Others.to_string(), "others");
        assert!(!CommitType::Others.is_conventional());
        assert!(CommitType::Ci.is_conventional());
    }
}
