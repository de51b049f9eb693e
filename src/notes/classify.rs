//! Sorts commits into release-note sections and categories.
use git_conventional::Type;
use log::*;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::{error::Result, notes::commit::CommitRecord};

/// Top-level grouping of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Enhancement,
    Fix,
}

impl SectionKind {
    /// Render order.
    pub const ALL: [SectionKind; 2] = [SectionKind::Enhancement, SectionKind::Fix];

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Enhancement => "Enhancements",
            SectionKind::Fix => "Fixes",
        }
    }
}

/// Topical area of a change.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Templates,
    Output,
    Core,
    Docs,
    Other,
}

impl Category {
    /// Render order.
    pub const ALL: [Category; 5] = [
        Category::Templates,
        Category::Output,
        Category::Core,
        Category::Docs,
        Category::Other,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Category::Templates => "Templates",
            Category::Output => "Output",
            Category::Core => "Core",
            Category::Docs => "Docs",
            Category::Other => "Other",
        }
    }
}

/// One classification rule. A commit matches when any subject pattern
/// matches its subject or any path prefix matches a file it touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRule {
    pub category: Category,
    /// Case-insensitive regular expressions tested against the subject.
    pub subject_patterns: Vec<String>,
    /// Path prefixes tested against the files reported by the remote.
    pub path_prefixes: Vec<String>,
}

impl Default for CategoryRule {
    fn default() -> Self {
        Self {
            category: Category::Other,
            subject_patterns: vec![],
            path_prefixes: vec![],
        }
    }
}

fn rule(category: Category, subjects: &[&str], paths: &[&str]) -> CategoryRule {
    CategoryRule {
        category,
        subject_patterns: subjects.iter().map(|s| s.to_string()).collect(),
        path_prefixes: paths.iter().map(|s| s.to_string()).collect(),
    }
}

/// Ordered classification rules plus the markers of a fix. The first
/// matching rule wins; commits matching none land in [`Category::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationPolicy {
    pub rules: Vec<CategoryRule>,
    /// Subject patterns marking a fix when the subject is not a
    /// conventional commit.
    pub fix_patterns: Vec<String>,
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                rule(
                    Category::Templates,
                    &[r"\btemplat(e|es|ing)\b", r"\bthemes?\b", r"\btpl\b"],
                    &["tpl/", "templates/"],
                ),
                rule(
                    Category::Output,
                    &[
                        r"\boutputs?\b",
                        r"\brender(s|er|ing)?\b",
                        r"\bmedia ?types?\b",
                        r"\bformats?\b",
                    ],
                    &["output/"],
                ),
                rule(
                    Category::Docs,
                    &[r"\bdocs?\b", r"\bdocumentation\b", r"\breadme\b"],
                    &["docs/"],
                ),
                rule(
                    Category::Core,
                    &[
                        r"^(core|engine|config|build|perf|refactor)\b",
                        r"\bcore\b",
                    ],
                    &["src/core/"],
                ),
            ],
            fix_patterns: vec![
                r"\bfix(es|ed|ing)?\b".into(),
                r"\bbug(s|fix)?\b".into(),
                r"\bhotfix(es)?\b".into(),
                r"\bregression\b".into(),
            ],
        }
    }
}

/// Commits of one section, bucketed by category in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub templates: Vec<CommitRecord>,
    pub output: Vec<CommitRecord>,
    pub core: Vec<CommitRecord>,
    pub docs: Vec<CommitRecord>,
    pub other: Vec<CommitRecord>,
}

impl Section {
    pub fn bucket(&self, category: Category) -> &[CommitRecord] {
        match category {
            Category::Templates => &self.templates,
            Category::Output => &self.output,
            Category::Core => &self.core,
            Category::Docs => &self.docs,
            Category::Other => &self.other,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Vec<CommitRecord> {
        match category {
            Category::Templates => &mut self.templates,
            Category::Output => &mut self.output,
            Category::Core => &mut self.core,
            Category::Docs => &mut self.docs,
            Category::Other => &mut self.other,
        }
    }

    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.bucket(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classified commits: `section -> category -> commits`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLog {
    pub enhancements: Section,
    pub fixes: Section,
}

impl ChangeLog {
    pub fn section(&self, kind: SectionKind) -> &Section {
        match kind {
            SectionKind::Enhancement => &self.enhancements,
            SectionKind::Fix => &self.fixes,
        }
    }

    fn section_mut(&mut self, kind: SectionKind) -> &mut Section {
        match kind {
            SectionKind::Enhancement => &mut self.enhancements,
            SectionKind::Fix => &mut self.fixes,
        }
    }

    pub fn len(&self) -> usize {
        self.enhancements.len() + self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every commit with its placement, in render order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (SectionKind, Category, &CommitRecord)> {
        SectionKind::ALL.into_iter().flat_map(move |kind| {
            Category::ALL.into_iter().flat_map(move |category| {
                self.section(kind)
                    .bucket(category)
                    .iter()
                    .map(move |commit| (kind, category, commit))
            })
        })
    }
}

struct CompiledRule {
    category: Category,
    subject_patterns: Vec<Regex>,
    path_prefixes: Vec<String>,
}

impl CompiledRule {
    fn matches(&self, commit: &CommitRecord) -> bool {
        if self
            .subject_patterns
            .iter()
            .any(|re| re.is_match(&commit.subject))
        {
            return true;
        }

        commit.files().iter().any(|file| {
            self.path_prefixes
                .iter()
                .any(|prefix| file.starts_with(prefix.as_str()))
        })
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

/// Applies a [`ClassificationPolicy`] to commit records.
pub struct Classifier {
    rules: Vec<CompiledRule>,
    fix_patterns: Vec<Regex>,
}

impl Classifier {
    /// Compile the policy's patterns. Invalid patterns are a configuration
    /// error.
    pub fn new(policy: &ClassificationPolicy) -> Result<Self> {
        let rules = policy
            .rules
            .iter()
            .map(|r| {
                Ok(CompiledRule {
                    category: r.category,
                    subject_patterns: r
                        .subject_patterns
                        .iter()
                        .map(|p| compile(p))
                        .collect::<Result<Vec<Regex>>>()?,
                    path_prefixes: r.path_prefixes.clone(),
                })
            })
            .collect::<Result<Vec<CompiledRule>>>()?;

        let fix_patterns = policy
            .fix_patterns
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<Regex>>>()?;

        Ok(Self {
            rules,
            fix_patterns,
        })
    }

    /// Category of a commit: first matching rule, else [`Category::Other`].
    pub fn category(&self, commit: &CommitRecord) -> Category {
        self.rules
            .iter()
            .find(|rule| rule.matches(commit))
            .map(|rule| rule.category)
            .unwrap_or(Category::Other)
    }

    /// Section of a commit. Conventional `fix` and `feat` types decide on
    /// their own; any other subject is checked against the fix patterns.
    pub fn section(&self, commit: &CommitRecord) -> SectionKind {
        if let Ok(conventional) = git_conventional::Commit::parse(&commit.subject)
        {
            let kind = conventional.type_();
            if kind == Type::FIX {
                return SectionKind::Fix;
            }
            if kind == Type::FEAT {
                return SectionKind::Enhancement;
            }
        }

        if self
            .fix_patterns
            .iter()
            .any(|re| re.is_match(&commit.subject))
        {
            return SectionKind::Fix;
        }

        SectionKind::Enhancement
    }

    /// Partition commits into a [`ChangeLog`], each commit landing in
    /// exactly one bucket and keeping its relative order.
    pub fn classify(&self, commits: Vec<CommitRecord>) -> ChangeLog {
        let mut changelog = ChangeLog::default();

        for commit in commits {
            let kind = self.section(&commit);
            let category = self.category(&commit);
            debug!(
                "{}: {} / {}",
                commit.hash,
                kind.title(),
                category.title()
            );
            changelog.section_mut(kind).bucket_mut(category).push(commit);
        }

        changelog
    }
}
