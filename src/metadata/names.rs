//! Case-insensitive name sets and schema-derived helpers.
//!
//! Resource and access-type names are compared case-insensitively
//! everywhere; the canonical in-memory form is lower-case. Absent inputs
//! yield empty results, except where absence must stay distinguishable
//! (`implied_grants`, `lower_cased_resource_map`).

use std::collections::{HashMap, HashSet};

use crate::model::{AccessTypeDef, EnumDef, Policy, PolicyResource, Service, ServiceDef};
use crate::observability::{Event, SharedLog};

/// Default index reported for an absent enum.
pub const NO_ENUM_INDEX: i32 = -1;

/// Derives name sets from definitions and policies.
///
/// Holds no state besides the log sink used to report skipped entries.
#[derive(Clone)]
pub struct NameNormalizer {
    log: SharedLog,
}

impl NameNormalizer {
    pub fn new(log: SharedLog) -> Self {
        Self { log }
    }

    /// Lower-cased names of resources marked mandatory.
    pub fn mandatory_resource_names(&self, def: Option<&ServiceDef>) -> HashSet<String> {
        self.resource_names(def, true)
    }

    /// Lower-cased names of every resource.
    pub fn all_resource_names(&self, def: Option<&ServiceDef>) -> HashSet<String> {
        self.resource_names(def, false)
    }

    fn resource_names(&self, def: Option<&ServiceDef>, mandatory_only: bool) -> HashSet<String> {
        let Some(def) = def else {
            return HashSet::new();
        };
        let mut names = HashSet::with_capacity(def.resources.len());
        for resource in &def.resources {
            if mandatory_only && !resource.mandatory {
                continue;
            }
            if is_blank(&resource.name) {
                self.skipped(&def.name, "resource");
                continue;
            }
            names.insert(resource.name.to_lowercase());
        }
        names
    }

    /// Lower-cased access type names; blank names are skipped.
    pub fn access_type_names(&self, def: Option<&ServiceDef>) -> HashSet<String> {
        let Some(def) = def else {
            return HashSet::new();
        };
        let mut names = HashSet::with_capacity(def.access_types.len());
        for access_type in &def.access_types {
            if is_blank(&access_type.name) {
                self.skipped(&def.name, "access_type");
            } else {
                names.insert(access_type.name.to_lowercase());
            }
        }
        names
    }

    /// Lower-cased resource keys of a policy.
    pub fn policy_resource_names(&self, policy: Option<&Policy>) -> HashSet<String> {
        policy
            .map(|p| p.resources.keys().map(|k| k.to_lowercase()).collect())
            .unwrap_or_default()
    }

    /// Resource name (original case) to validation pattern, for resources
    /// that declare one.
    pub fn validation_patterns(&self, def: Option<&ServiceDef>) -> HashMap<String, String> {
        let Some(def) = def else {
            return HashMap::new();
        };
        let mut patterns = HashMap::new();
        for resource in &def.resources {
            if is_blank(&resource.name) {
                self.skipped(&def.name, "resource");
                continue;
            }
            match resource.validation_reg_ex.as_deref() {
                Some(pattern) if !is_blank(pattern) => {
                    patterns.insert(resource.name.clone(), pattern.to_string());
                }
                _ => {}
            }
        }
        patterns
    }

    /// Lower-cased implied grants.
    ///
    /// `None` when the access type itself is absent, an empty list when it
    /// exists but implies nothing. Blank entries are kept verbatim.
    pub fn implied_grants(&self, def: Option<&AccessTypeDef>) -> Option<Vec<String>> {
        let def = def?;
        Some(
            def.implied_grants
                .iter()
                .map(|g| if is_blank(g) { g.clone() } else { g.to_lowercase() })
                .collect(),
        )
    }

    /// Copy of a policy resource map with lower-cased keys.
    ///
    /// Keys that collide after lower-casing keep the value iterated last.
    pub fn lower_cased_resource_map(
        &self,
        resources: Option<&HashMap<String, PolicyResource>>,
    ) -> Option<HashMap<String, PolicyResource>> {
        let resources = resources?;
        Some(
            resources
                .iter()
                .map(|(k, v)| (k.to_lowercase(), v.clone()))
                .collect(),
        )
    }

    /// Names of config parameters marked mandatory, in their declared case.
    pub fn required_config_names(&self, def: Option<&ServiceDef>) -> HashSet<String> {
        def.map(|d| {
            d.configs
                .iter()
                .filter(|c| c.mandatory)
                .map(|c| c.name.clone())
                .collect()
        })
        .unwrap_or_default()
    }

    /// Config parameter names a service supplies.
    pub fn service_config_names(&self, service: Option<&Service>) -> HashSet<String> {
        service
            .map(|s| s.configs.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Effective audit flag.
    ///
    /// An unset flag means audit is enabled; an absent policy is not audited.
    pub fn audit_enabled(&self, policy: Option<&Policy>) -> bool {
        match policy {
            None => false,
            Some(p) => p.is_audit_enabled.unwrap_or(true),
        }
    }

    /// Effective default index of an enum: the declared one, 0 when unset,
    /// [`NO_ENUM_INDEX`] when the enum is absent.
    pub fn enum_default_index(&self, def: Option<&EnumDef>) -> i32 {
        match def {
            None => NO_ENUM_INDEX,
            Some(e) => e.default_index.unwrap_or(0),
        }
    }

    fn skipped(&self, service_def: &str, entry: &str) {
        self.log.log(
            Event::SchemaEntrySkipped,
            &[("service_def", service_def), ("entry", entry), ("reason", "blank name")],
        );
    }
}

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
