//! Validation Context
//!
//! Per-run configuration (enabled categories, extra packages) plus the
//! cross-run rule cache. A context may be shared by threads validating
//! independent documents: the cache takes concurrent reads and serializes
//! first-time construction behind a write lock.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use crate::document::Document;
use crate::models::NodeId;
use crate::validator::constraints::Constraint;
use crate::validator::factory::{self, RulePackage};
use crate::validator::{
    codes, CheckCategory, ErrorLog, IssueLocation, ValidationIssue, ValidatorError,
};

type CacheKey = (u32, u32, u32);

/// Category selection and the (level, version)-keyed rule cache.
///
/// A fresh context has no categories configured; calling
/// [`ValidationContext::enable_category`] (or
/// [`ValidationContext::enable_all_categories`]) configures it. Validating
/// with an unconfigured context is misuse, not an empty run.
#[derive(Debug, Default)]
pub struct ValidationContext {
    enabled: HashSet<CheckCategory>,
    configured: bool,
    packages: BTreeSet<crate::models::PackageId>,
    cache: RwLock<HashMap<CacheKey, Arc<Constraint>>>,
}

impl ValidationContext {
    pub fn new() -> Self {
        ValidationContext::default()
    }

    /// Enables or disables one check category. Disabled categories
    /// contribute no error codes to any subsequent run, for any package.
    pub fn enable_category(&mut self, category: CheckCategory, enable: bool) {
        self.configured = true;
        if enable {
            self.enabled.insert(category);
        } else {
            self.enabled.remove(&category);
        }
    }

    pub fn enable_all_categories(&mut self) {
        for category in CheckCategory::ALL {
            self.enable_category(category, true);
        }
    }

    pub fn is_category_enabled(&self, category: CheckCategory) -> bool {
        self.enabled.contains(&category)
    }

    /// Declares packages whose rule bands should be checked in addition to
    /// the packages enabled on the validated document.
    pub fn set_packages(&mut self, packages: &[crate::models::PackageId]) {
        self.packages = packages.iter().copied().collect();
    }

    /// Number of rules constructed so far, across all (level, version)
    /// pairs this context has seen.
    pub fn cached_rule_count(&self) -> usize {
        self.read_cache().len()
    }

    /// Validates a whole document.
    pub fn validate(&self, doc: &Document) -> Result<ErrorLog, ValidatorError> {
        self.run(doc, doc.root())
    }

    /// Validates the subtree rooted at `node`. The target must be attached
    /// to the document; validating a rootless fragment is misuse.
    pub fn validate_subtree(&self, doc: &Document, node: NodeId) -> Result<ErrorLog, ValidatorError> {
        let data = doc.get(node).ok_or(ValidatorError::StaleTarget)?;
        if !doc.is_attached(node) {
            return Err(ValidatorError::DetachedTarget {
                node: data.describe(),
            });
        }
        self.run(doc, node)
    }

    fn run(&self, doc: &Document, from: NodeId) -> Result<ErrorLog, ValidatorError> {
        if !self.configured {
            return Err(ValidatorError::UnconfiguredContext);
        }
        let mut log = ErrorLog::default();
        let rules = self.resolve_rules(doc, &mut log);
        tracing::debug!(
            rules = rules.len(),
            level = doc.level(),
            version = doc.version(),
            "starting validation run"
        );

        for node in doc.traverse(from) {
            let Some(data) = doc.get(node) else {
                continue;
            };
            let kind = data.kind();
            for rule in &rules {
                if !rule.applies_to(kind) {
                    continue;
                }
                // A faulting rule body is a reporting-layer defect, not a
                // validation failure; log it and keep going.
                let outcome = catch_unwind(AssertUnwindSafe(|| rule.evaluate(self, doc, node)));
                match outcome {
                    Ok(Some(true)) | Ok(None) => {}
                    Ok(Some(false)) => {
                        let data = doc.get(node).expect("checked above");
                        log.push(ValidationIssue {
                            code: rule.code,
                            category: rule.category,
                            severity: rule.severity,
                            location: IssueLocation {
                                element: kind.name(),
                                id: data.id().map(str::to_string),
                                meta_id: data.meta_id().map(str::to_string),
                            },
                            message: codes::message(rule.code).to_string(),
                        });
                    }
                    Err(_) => {
                        tracing::error!(code = rule.code, "validation rule panicked; skipping");
                    }
                }
            }
        }
        Ok(log)
    }

    /// Rule resolution: for every enabled category, each relevant package
    /// contributes its error codes; the codes become cached rule objects.
    /// Codes without implemented bodies are recorded as unchecked.
    fn resolve_rules(&self, doc: &Document, log: &mut ErrorLog) -> Vec<Arc<Constraint>> {
        let mut bands = vec![RulePackage::Core];
        let mut packages: BTreeSet<_> = doc.enabled_packages().map(|(p, _)| p).collect();
        packages.extend(self.packages.iter().copied());
        bands.extend(packages.into_iter().map(RulePackage::Package));

        let mut rules = Vec::new();
        for category in CheckCategory::ALL {
            if !self.enabled.contains(&category) {
                continue;
            }
            for band in &bands {
                for code in factory::codes_for(*band, doc.level(), doc.version(), category) {
                    if let Some(rule) = self.constraint(doc.level(), doc.version(), code) {
                        if rule.is_implemented() {
                            rules.push(rule);
                        } else {
                            log.mark_unchecked(code);
                        }
                    }
                }
            }
        }
        rules
    }

    /// Create-on-first-use, cached by (level, version, code). Reads take
    /// the shared lock; a miss re-checks under the write lock so rules are
    /// constructed once even under concurrent access.
    fn constraint(&self, level: u32, version: u32, code: u32) -> Option<Arc<Constraint>> {
        let key = (level, version, code);
        if let Some(rule) = self.read_cache().get(&key) {
            return Some(rule.clone());
        }
        let built = factory::build(code)?;
        let mut cache = self
            .cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Some(cache.entry(key).or_insert_with(|| Arc::new(built)).clone())
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, HashMap<CacheKey, Arc<Constraint>>> {
        self.cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
