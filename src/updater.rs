//! Version identifier updates for files embedding the project version.
use log::*;
use regex::{Regex, RegexBuilder};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[cfg(test)]
use mockall::automock;

use crate::{
    config::{VersionConfig, VersionFileConfig},
    error::{ReleaseError, Result},
    version::ReleaseVersion,
};

/// Rewrites every version-bearing file to a new version.
#[cfg_attr(test, automock)]
pub trait VersionBumper {
    fn bump(&self, version: &ReleaseVersion) -> Result<()>;
}

/// Snapcraft-style release grade for a version.
pub fn grade(version: &ReleaseVersion) -> &'static str {
    if version.is_dev() { "devel" } else { "stable" }
}

/// Minimum compatible version advertised alongside `version`. Development
/// builds point at the previous release.
pub fn min_version(version: &ReleaseVersion) -> ReleaseVersion {
    if version.is_dev() {
        version.prev()
    } else {
        version.clone()
    }
}

/// Expand `{version}`, `{number}`, `{patch_level}`, `{suffix}`, `{grade}`
/// and `{min_version}` in a replacement string. Regex capture references
/// such as `${1}` are left for the regex engine.
pub fn expand_placeholders(replacement: &str, version: &ReleaseVersion) -> String {
    replacement
        .replace("{version}", &version.to_string())
        .replace("{number}", &version.number())
        .replace("{patch_level}", &version.patch_level.to_string())
        .replace("{suffix}", &version.suffix)
        .replace("{grade}", grade(version))
        .replace("{min_version}", &min_version(version).to_string())
}

fn compile(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).multi_line(true).build()?)
}

/// Regex replacement over the files listed in `[[version_files]]`.
pub struct FileBumper {
    root: PathBuf,
    version: VersionConfig,
    files: Vec<VersionFileConfig>,
}

impl FileBumper {
    pub fn new(
        root: impl AsRef<Path>,
        version: VersionConfig,
        files: Vec<VersionFileConfig>,
    ) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            version,
            files,
        }
    }

    /// Read the project's current version from `[version] file` using its
    /// pattern's first capture group.
    pub fn current_version(&self) -> Result<ReleaseVersion> {
        let path = self.root.join(&self.version.file);
        let content = fs::read_to_string(&path).map_err(|e| {
            ReleaseError::version_bump(format!(
                "unable to read {}: {e}",
                path.display()
            ))
        })?;

        let re = compile(&self.version.pattern)?;
        let caps = re.captures(&content).ok_or_else(|| {
            ReleaseError::version_bump(format!(
                "no version matching {:?} found in {}",
                self.version.pattern,
                path.display()
            ))
        })?;

        let found = caps.get(1).or_else(|| caps.get(0)).map_or("", |m| m.as_str());

        debug!("current version {found} read from {}", path.display());

        found.parse()
    }

    /// Compute the new content of every file without writing anything.
    /// Fails if any file is unreadable or any pattern matches nothing.
    pub fn plan(&self, version: &ReleaseVersion) -> Result<Vec<(PathBuf, String)>> {
        let mut planned = vec![];

        for file in self.files.iter() {
            let path = self.root.join(&file.path);
            let mut content = fs::read_to_string(&path).map_err(|e| {
                ReleaseError::version_bump(format!(
                    "unable to read {}: {e}",
                    path.display()
                ))
            })?;

            for replacement in file.replacements.iter() {
                let re = compile(&replacement.pattern)?;

                if !re.is_match(&content) {
                    return Err(ReleaseError::version_bump(format!(
                        "pattern {:?} did not match anything in {}",
                        replacement.pattern,
                        path.display()
                    )));
                }

                let expanded =
                    expand_placeholders(&replacement.replacement, version);
                content = re.replace_all(&content, expanded.as_str()).to_string();
            }

            planned.push((path, content));
        }

        Ok(planned)
    }
}

impl VersionBumper for FileBumper {
    fn bump(&self, version: &ReleaseVersion) -> Result<()> {
        info!("bumping versions to {version}");

        let planned = self.plan(version)?;

        for (path, content) in planned {
            debug!("writing {}", path.display());
            fs::write(&path, content).map_err(|e| {
                ReleaseError::version_bump(format!(
                    "unable to write {}: {e}",
                    path.display()
                ))
            })?;
        }

        Ok(())
    }
}
