//! Renders a classified [`ChangeLog`] into markdown release notes.
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::{
    error::Result,
    notes::{
        classify::{Category, ChangeLog, SectionKind},
        commit::CommitRecord,
    },
};

const TEMPLATE_NAME: &str = "release_notes.md";

/// Default release notes template.
///
/// Sections and categories arrive pre-filtered and in render order, so the
/// template never has to look anything up by name.
pub const DEFAULT_TEMPLATE: &str = r#"
{%- macro change_section(commits) -%}
{% for commit in commits -%}
* {{ commit.subject }}{% if commit.commit_url %} [{{ commit.hash }}]({{ commit.commit_url }}){% endif %}{% if commit.author_login %} [@{{ commit.author_login }}]({{ commit.author_profile_url }}){% endif %}{% for issue in commit.issues %}{% if issue.url %} [#{{ issue.number }}]({{ issue.url }}){% else %} #{{ issue.number }}{% endif %}{% endfor %}
{% endfor -%}
{%- endmacro change_section -%}

{%- macro change_headers(categories) -%}
{% for category in categories %}
## {{ category.title }}

{{ self::change_section(commits=category.commits) }}
{% endfor %}
{%- endmacro change_headers -%}

{% for section in sections %}
# {{ section.title }}
{{ self::change_headers(categories=section.categories) }}
{% endfor %}
"#;

static EXTRA_NEW_LINES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Collapse runs of blank lines left behind by template control flow.
pub fn strip_extra_lines(notes: &str) -> String {
    EXTRA_NEW_LINES_REGEX
        .replace_all(notes, "\n\n")
        .trim()
        .to_string()
}

#[derive(Debug, Serialize)]
struct IssueView {
    number: u64,
    url: String,
}

#[derive(Debug, Serialize)]
struct CommitView<'a> {
    hash: &'a str,
    subject: &'a str,
    author_email: &'a str,
    commit_url: &'a str,
    author_login: &'a str,
    author_profile_url: &'a str,
    issues: Vec<IssueView>,
}

#[derive(Debug, Serialize)]
struct CategoryView<'a> {
    title: &'static str,
    commits: Vec<CommitView<'a>>,
}

#[derive(Debug, Serialize)]
struct SectionView<'a> {
    title: &'static str,
    categories: Vec<CategoryView<'a>>,
}

#[derive(Debug, Serialize)]
struct NotesView<'a> {
    sections: Vec<SectionView<'a>>,
}

/// Compiled release notes template.
pub struct Renderer {
    tera: tera::Tera,
    issue_base_url: String,
}

impl Renderer {
    /// Compile `template` once. Issue links are built as
    /// `{issue_base_url}/{number}`; an empty base renders bare `#number`.
    pub fn new(template: &str, issue_base_url: impl Into<String>) -> Result<Self> {
        let mut tera = tera::Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, template)?;

        Ok(Self {
            tera,
            issue_base_url: issue_base_url.into(),
        })
    }

    /// Render notes for `changelog`. Empty categories, and sections with no
    /// commits at all, produce no heading.
    pub fn render(&self, changelog: &ChangeLog) -> Result<String> {
        let view = self.view(changelog);
        let context = tera::Context::from_serialize(&view)?;
        let notes = self.tera.render(TEMPLATE_NAME, &context)?;
        Ok(format!("{}\n", strip_extra_lines(&notes)))
    }

    fn view<'a>(&self, changelog: &'a ChangeLog) -> NotesView<'a> {
        let sections = SectionKind::ALL
            .into_iter()
            .map(|kind| {
                let section = changelog.section(kind);
                let categories = Category::ALL
                    .into_iter()
                    .filter(|category| !section.bucket(*category).is_empty())
                    .map(|category| CategoryView {
                        title: category.title(),
                        commits: section
                            .bucket(category)
                            .iter()
                            .map(|c| self.commit_view(c))
                            .collect(),
                    })
                    .collect::<Vec<CategoryView>>();

                SectionView {
                    title: kind.title(),
                    categories,
                }
            })
            .filter(|section| !section.categories.is_empty())
            .collect();

        NotesView { sections }
    }

    fn commit_view<'a>(&self, commit: &'a CommitRecord) -> CommitView<'a> {
        let (commit_url, author_login, author_profile_url) = match &commit.remote
        {
            Some(remote) => (
                remote.commit_url.as_str(),
                remote.author_login.as_str(),
                remote.author_profile_url.as_str(),
            ),
            None => ("", "", ""),
        };

        let base = self.issue_base_url.trim_end_matches('/');

        CommitView {
            hash: &commit.hash,
            subject: &commit.subject,
            author_email: &commit.author_email,
            commit_url,
            author_login,
            author_profile_url,
            issues: commit
                .issues
                .iter()
                .map(|number| IssueView {
                    number: *number,
                    url: if base.is_empty() {
                        String::new()
                    } else {
                        format!("{base}/{number}")
                    },
                })
                .collect(),
        }
    }
}
