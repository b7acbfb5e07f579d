//! Skill canonicalization shared by scoring and matched-skill highlighting.
//!
//! A skill is canonicalized by trimming, lowercasing, collapsing internal
//! whitespace and then resolving known synonyms/abbreviations. Two skills
//! overlap when their canonical forms are equal or one contains the other,
//! which is the same fuzzy "includes" rule the jobs panel uses for badges.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// Built-in synonym table: alias -> canonical token
const BUILTIN_SYNONYMS: &[(&str, &str)] = &[
    ("ml", "machine learning"),
    ("ai", "artificial intelligence"),
    ("dl", "deep learning"),
    ("nlp", "natural language processing"),
    ("js", "javascript"),
    ("ecmascript", "javascript"),
    ("ts", "typescript"),
    ("py", "python"),
    ("python3", "python"),
    ("golang", "go"),
    ("k8s", "kubernetes"),
    ("postgres", "postgresql"),
    ("psql", "postgresql"),
    ("mongo", "mongodb"),
    ("node", "node.js"),
    ("nodejs", "node.js"),
    ("node js", "node.js"),
    ("reactjs", "react"),
    ("react.js", "react"),
    ("vue", "vue.js"),
    ("vuejs", "vue.js"),
    ("angularjs", "angular"),
    ("csharp", "c#"),
    ("c sharp", "c#"),
    ("cpp", "c++"),
    ("powerbi", "power bi"),
    ("ms excel", "excel"),
    ("microsoft excel", "excel"),
    ("amazon web services", "aws"),
    ("gcp", "google cloud"),
    ("google cloud platform", "google cloud"),
    ("tf", "tensorflow"),
    ("sklearn", "scikit-learn"),
    ("scikit learn", "scikit-learn"),
    ("data analytics", "data analysis"),
    ("structured query language", "sql"),
    ("cicd", "ci/cd"),
    ("restful api", "rest api"),
    ("restful apis", "rest api"),
];

static DEFAULT_NORMALIZER: Lazy<SkillNormalizer> = Lazy::new(SkillNormalizer::default);

/// Canonical skill token used for equality and overlap comparisons
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalSkill(String);

impl CanonicalSkill {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fuzzy overlap of two canonical tokens; empty tokens never match
    pub fn overlaps(&self, other: &CanonicalSkill) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        self.0 == other.0 || self.0.contains(&other.0) || other.0.contains(&self.0)
    }
}

impl fmt::Display for CanonicalSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps free-text skills to canonical tokens
#[derive(Debug, Clone)]
pub struct SkillNormalizer {
    synonyms: HashMap<String, String>,
}

impl SkillNormalizer {
    /// Normalizer with the built-in synonym table plus `extra` aliases.
    ///
    /// Extra entries override built-in ones with the same alias. Extra
    /// aliases that clean to the same key ("ML", "ml") are resolved in
    /// sorted order of the raw alias: the first wins, the rest are logged
    /// and skipped, so the result never depends on iteration order.
    pub fn with_synonyms<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut entries: Vec<(String, String)> = extra
            .into_iter()
            .map(|(alias, canonical)| (alias.as_ref().to_string(), canonical.as_ref().to_string()))
            .collect();
        entries.sort();

        let mut normalizer = Self::default();
        let mut configured: HashMap<String, String> = HashMap::new();

        for (raw_alias, raw_canonical) in entries {
            let alias = clean(&raw_alias);
            let canonical = clean(&raw_canonical);
            if alias.is_empty() || canonical.is_empty() {
                continue;
            }

            if let Some(existing) = configured.get(&alias) {
                if *existing != canonical {
                    tracing::warn!(
                        "Skill synonym '{}' -> '{}' collides with '{}' -> '{}', ignoring",
                        raw_alias,
                        canonical,
                        alias,
                        existing
                    );
                }
                continue;
            }

            configured.insert(alias.clone(), canonical.clone());
            normalizer.synonyms.insert(alias, canonical);
        }
        normalizer
    }

    pub fn normalize(&self, skill: &str) -> CanonicalSkill {
        let cleaned = clean(skill);
        match self.synonyms.get(&cleaned) {
            Some(canonical) => CanonicalSkill(canonical.clone()),
            None => CanonicalSkill(cleaned),
        }
    }

    pub fn overlap(&self, a: &str, b: &str) -> bool {
        self.normalize(a).overlaps(&self.normalize(b))
    }

    pub fn synonym_count(&self) -> usize {
        self.synonyms.len()
    }
}

impl Default for SkillNormalizer {
    fn default() -> Self {
        let synonyms = BUILTIN_SYNONYMS
            .iter()
            .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
            .collect();

        Self { synonyms }
    }
}

/// Canonicalize a skill with the built-in synonym table
pub fn normalize(skill: &str) -> CanonicalSkill {
    DEFAULT_NORMALIZER.normalize(skill)
}

/// Fuzzy skill overlap with the built-in synonym table
pub fn skills_overlap(a: &str, b: &str) -> bool {
    DEFAULT_NORMALIZER.overlap(a, b)
}

#[inline]
fn clean(skill: &str) -> String {
    skill
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
