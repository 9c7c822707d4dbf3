//! Package configuration loaded from a TOML file.
//!
//! ```toml
//! [[package]]
//! name = "knative-serving"
//!
//! [package.primary]
//! source = "knative/serving"
//! include = ["serving-*.yaml"]
//! exclude = ["*-post-install-jobs.yaml"]
//!
//! [[package.additional]]
//! source = "knative-extensions/net-istio"
//! include = ["net-istio.yaml"]
//! rename = { "net-istio.yaml" = "net-istio-{tag}.yaml" }
//! ```

use crate::error::{ConfigError, ErrorExt, Result};
use crate::release::{AcceptRule, Package, PackageSource, SourceId};
use glob::Pattern;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Placeholder in rename targets replaced by the asset's release tag.
pub const TAG_PLACEHOLDER: &str = "{tag}";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(rename = "package", default)]
    packages: Vec<PackageConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PackageConfig {
    name: String,
    primary: SourceConfig,
    #[serde(default)]
    additional: Vec<SourceConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceConfig {
    source: String,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    rename: BTreeMap<String, String>,
}

/// Accept rule built from include/exclude globs and a rename table.
///
/// An empty include list accepts every name not excluded.
#[derive(Debug, Clone, Default)]
pub struct SourceRule {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
    rename: BTreeMap<String, String>,
}

impl AcceptRule for SourceRule {
    fn accept(&self, name: &str, tag: &str) -> Option<String> {
        let included = self.include.is_empty() || self.include.iter().any(|p| p.matches(name));
        if !included || self.exclude.iter().any(|p| p.matches(name)) {
            return None;
        }

        Some(match self.rename.get(name) {
            Some(target) => target.replace(TAG_PLACEHOLDER, tag),
            None => name.to_string(),
        })
    }
}

/// All configured packages, in file order.
#[derive(Debug, Clone, Default)]
pub struct PackageSet {
    packages: Vec<Package<SourceRule>>,
}

impl PackageSet {
    /// Reads and validates the package file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).fs_context("reading package config", path)?;
        Self::parse(&text)
    }

    /// Parses and validates package configuration text.
    pub fn parse(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text)?;

        let mut seen = HashSet::new();
        let mut packages = Vec::with_capacity(file.packages.len());
        for pkg in file.packages {
            if pkg.name.trim().is_empty() {
                return Err(ConfigError::EmptyName.into());
            }
            if !seen.insert(pkg.name.clone()) {
                return Err(ConfigError::DuplicatePackage(pkg.name).into());
            }
            packages.push(build_package(pkg)?);
        }

        Ok(Self { packages })
    }

    /// Looks up a package by name.
    pub fn get(&self, name: &str) -> Result<&Package<SourceRule>> {
        self.packages
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::UnknownPackage(name.to_string()).into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Package<SourceRule>> {
        self.packages.iter()
    }
}

fn build_package(pkg: PackageConfig) -> std::result::Result<Package<SourceRule>, ConfigError> {
    let primary = build_source(&pkg.name, pkg.primary)?;
    let additional = pkg
        .additional
        .into_iter()
        .map(|src| build_source(&pkg.name, src))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Package {
        name: pkg.name,
        primary,
        additional,
    })
}

fn build_source(
    package: &str,
    src: SourceConfig,
) -> std::result::Result<PackageSource<SourceRule>, ConfigError> {
    let id: SourceId = src
        .source
        .parse()
        .map_err(|reason| ConfigError::InvalidSource {
            package: package.to_string(),
            reason,
        })?;

    let compile = |patterns: Vec<String>| {
        patterns
            .into_iter()
            .map(|pattern| {
                Pattern::new(&pattern).map_err(|e| ConfigError::InvalidPattern {
                    package: package.to_string(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()
    };

    Ok(PackageSource {
        id,
        rule: SourceRule {
            include: compile(src.include)?,
            exclude: compile(src.exclude)?,
            rename: src.rename,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BundlerError;

    const SERVING: &str = r#"
[[package]]
name = "knative-serving"

[package.primary]
source = "knative/serving"
include = ["serving-*.yaml"]
exclude = ["*-post-install-jobs.yaml"]

[[package.additional]]
source = "knative-extensions/net-istio"
include = ["net-istio.yaml"]
rename = { "net-istio.yaml" = "net-istio-{tag}.yaml" }

[[package.additional]]
source = "knative-extensions/net-kourier"

[[package]]
name = "knative-eventing"

[package.primary]
source = "knative/eventing"
"#;

    #[test]
    fn parses_packages_in_order() {
        let set = PackageSet::parse(SERVING).unwrap();
        let names: Vec<_> = set.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["knative-serving", "knative-eventing"]);

        let serving = set.get("knative-serving").unwrap();
        assert_eq!(serving.primary.id, SourceId::new("knative", "serving"));
        assert_eq!(serving.additional.len(), 2);
        assert_eq!(
            serving.additional[1].id,
            SourceId::new("knative-extensions", "net-kourier")
        );
    }

    #[test]
    fn include_and_exclude_globs() {
        let set = PackageSet::parse(SERVING).unwrap();
        let rule = &set.get("knative-serving").unwrap().primary.rule;
        assert_eq!(
            rule.accept("serving-core.yaml", "v1.0.0").as_deref(),
            Some("serving-core.yaml")
        );
        assert_eq!(rule.accept("serving-post-install-jobs.yaml", "v1.0.0"), None);
        assert_eq!(rule.accept("eventing.yaml", "v1.0.0"), None);
    }

    #[test]
    fn rename_substitutes_tag() {
        let set = PackageSet::parse(SERVING).unwrap();
        let rule = &set.get("knative-serving").unwrap().additional[0].rule;
        assert_eq!(
            rule.accept("net-istio.yaml", "v1.2.0").as_deref(),
            Some("net-istio-v1.2.0.yaml")
        );
    }

    #[test]
    fn empty_include_accepts_everything() {
        let rule = SourceRule::default();
        assert_eq!(rule.accept("anything", "v1").as_deref(), Some("anything"));
    }

    #[test]
    fn unknown_package_is_an_error() {
        let set = PackageSet::parse(SERVING).unwrap();
        assert!(matches!(
            set.get("knative-operator"),
            Err(BundlerError::Config(ConfigError::UnknownPackage(_)))
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let text = r#"
[[package]]
name = "a"
primary = { source = "o/a" }

[[package]]
name = "a"
primary = { source = "o/b" }
"#;
        assert!(matches!(
            PackageSet::parse(text),
            Err(BundlerError::Config(ConfigError::DuplicatePackage(name))) if name == "a"
        ));
    }

    #[test]
    fn rejects_empty_name() {
        let text = "[[package]]\nname = \" \"\nprimary = { source = \"o/a\" }\n";
        assert!(matches!(
            PackageSet::parse(text),
            Err(BundlerError::Config(ConfigError::EmptyName))
        ));
    }

    #[test]
    fn rejects_malformed_source() {
        let text = "[[package]]\nname = \"a\"\nprimary = { source = \"serving\" }\n";
        assert!(matches!(
            PackageSet::parse(text),
            Err(BundlerError::Config(ConfigError::InvalidSource { .. }))
        ));
    }

    #[test]
    fn rejects_invalid_glob() {
        let text = "[[package]]\nname = \"a\"\nprimary = { source = \"o/a\", include = [\"[\"] }\n";
        assert!(matches!(
            PackageSet::parse(text),
            Err(BundlerError::Config(ConfigError::InvalidPattern { .. }))
        ));
    }

    #[test]
    fn rejects_unknown_keys() {
        let text = "[[package]]\nname = \"a\"\nprimry = { source = \"o/a\" }\n";
        assert!(matches!(PackageSet::parse(text), Err(BundlerError::Toml(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PackageSet::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, BundlerError::Fs { .. }));
    }
}
