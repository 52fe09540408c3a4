//! Validation Invariant Tests
//!
//! Exercises the public API end to end:
//! - A valid entity passes regardless of which optional parts it carries
//! - Validation is deterministic
//! - Every violation is reported, in collection order, in one message
//! - Store failures never escape; they surface as "not found"
//! - Resource and access-type names compare case-insensitively

use std::fs;
use std::sync::Arc;

use policyvet::metadata::MetadataIndex;
use policyvet::model::{
    AccessTypeDef, ConfigDef, EnumDef, EntityId, Policy, PolicyItem, PolicyResource,
    ResourceDef, Service, ServiceDef,
};
use policyvet::observability::{null_log, Event, MemoryLogger};
use policyvet::store::{
    DirStore, MemoryStore, SearchFilter, ServiceStore, StoreError, StoreResult,
};
use policyvet::validation::{
    Action, FailureCondition, PolicyValidator, RuleCheck, ServiceDefValidator, ServiceValidator,
    FAILURE_DELIMITER,
};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn hdfs_def() -> ServiceDef {
    ServiceDef::new("hdfs")
        .with_resource(ResourceDef::mandatory("path").with_pattern("^/"))
        .with_resource(ResourceDef::optional("owner"))
        .with_access_type(AccessTypeDef::new("read"))
        .with_access_type(AccessTypeDef::new("write").implying(["read"]))
        .with_enum(EnumDef::new("encryption", ["none", "aes"]))
        .with_config(ConfigDef::mandatory("namenode"))
        .with_config(ConfigDef::optional("kerberos"))
}

fn setup_memory_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.add_service_def(hdfs_def());
    store.add_service(Service::new("cl1", "hdfs").with_config("namenode", "nn:8020"));
    store
}

fn policy_validator(store: Arc<MemoryStore>) -> PolicyValidator {
    PolicyValidator::new(MetadataIndex::new(store, null_log()))
}

fn valid_policy() -> Policy {
    Policy::new("p1", "cl1")
        .with_resource("path", PolicyResource::single("/data"))
        .with_item(PolicyItem::for_users(["alice"]).allowing("read"))
}

/// Store whose every call fails.
struct UnreachableStore;

impl ServiceStore for UnreachableStore {
    fn get_service_def(&self, _id: EntityId) -> StoreResult<ServiceDef> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    fn get_service_def_by_name(&self, _name: &str) -> StoreResult<ServiceDef> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    fn get_service(&self, _id: EntityId) -> StoreResult<Service> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    fn get_service_by_name(&self, _name: &str) -> StoreResult<Service> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    fn get_policy(&self, _id: EntityId) -> StoreResult<Policy> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    fn list_policies(&self, _filter: &SearchFilter) -> StoreResult<Vec<Policy>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

// =============================================================================
// Round Trip Tests
// =============================================================================

/// A policy built only from what the definition allows passes, with or
/// without the optional resource.
#[test]
fn test_valid_policy_passes_with_any_optional_subset() {
    let validator = policy_validator(setup_memory_store());

    let without_owner = valid_policy();
    let with_owner = valid_policy().with_resource("owner", PolicyResource::single("hdfs"));

    assert!(validator.validate_policy(&without_owner, Action::Create).is_ok());
    assert!(validator.validate_policy(&with_owner, Action::Create).is_ok());
}

/// A stored policy validates by id on update.
#[test]
fn test_stored_policy_validates_by_id() {
    let store = setup_memory_store();
    let id = store.add_policy(valid_policy());
    let validator = policy_validator(store);

    assert!(validator.validate(id, Action::Update).is_ok());
    assert!(validator.validate(id, Action::Delete).is_ok());
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// Same invalid policy fails with the same message every time.
#[test]
fn test_validation_is_idempotent() {
    let validator = policy_validator(setup_memory_store());
    let policy = Policy::new("", "cl1")
        .with_resource("path", PolicyResource::single("relative"))
        .with_item(PolicyItem::for_users(["bob"]).allowing("admin"));

    let first = validator
        .validate_policy(&policy, Action::Create)
        .unwrap_err();
    for _ in 0..20 {
        let again = validator
            .validate_policy(&policy, Action::Create)
            .unwrap_err();
        assert_eq!(again.message(), first.message());
        assert_eq!(again.failures(), first.failures());
    }
}

// =============================================================================
// Aggregation Tests
// =============================================================================

/// Every violation is collected and the message joins them in order.
#[test]
fn test_all_failures_reported_in_one_message() {
    let validator = policy_validator(setup_memory_store());
    let policy = Policy::new("", "cl1")
        .with_resource("path", PolicyResource::single("relative"))
        .with_resource("table", PolicyResource::single("t1"))
        .with_item(PolicyItem::for_users(["bob"]).allowing("admin"));

    let err = validator
        .validate_policy(&policy, Action::Create)
        .unwrap_err();
    let failures = err.failures();

    // blank name, undefined resource, pattern mismatch, unknown access type
    assert_eq!(failures.len(), 4);
    assert_eq!(failures[0].field_name(), "name");
    assert!(failures[0].is_missing());

    let expected: String = failures
        .iter()
        .map(|f| format!("{}{}", f, FAILURE_DELIMITER))
        .collect();
    assert_eq!(err.message(), expected);
    assert_eq!(err.to_string(), expected);
    assert!(!err.is_internal());
}

/// A definition with several independent defects reports all of them.
#[test]
fn test_service_def_collects_every_defect() {
    let store = Arc::new(MemoryStore::new());
    let validator = ServiceDefValidator::new(MetadataIndex::new(store, null_log()));

    let def = ServiceDef::new("broken")
        .with_resource(ResourceDef::mandatory("path"))
        .with_resource(ResourceDef::optional("PATH"))
        .with_access_type(AccessTypeDef::new("write").implying(["read"]))
        .with_enum(EnumDef::new("mode", ["a", "b"]).with_default_index(5));

    let err = validator
        .validate_service_def(&def, Action::Create)
        .unwrap_err();
    let fields: Vec<&str> = err.failures().iter().map(|f| f.field_name()).collect();

    assert!(fields.contains(&"resources"));
    assert!(fields.contains(&"accessTypes"));
    assert!(fields.contains(&"enums"));
}

// =============================================================================
// Store Boundary Tests
// =============================================================================

/// An unreachable store turns into "not found" failures, never a panic or
/// a store error.
#[test]
fn test_store_failures_never_escape() {
    let log = Arc::new(MemoryLogger::new());
    let index = MetadataIndex::new(Arc::new(UnreachableStore), log.clone());
    let validator = PolicyValidator::new(index);

    let err = validator
        .validate_policy(&valid_policy(), Action::Create)
        .unwrap_err();

    assert_eq!(err.failures().len(), 1);
    assert_eq!(err.failures()[0].condition(), FailureCondition::NotFound);
    assert!(!log.lines_for(Event::StoreLookupFailed).is_empty());
    assert_eq!(log.lines_for(Event::ValidationFailed).len(), 1);
}

/// Deleting an id the store cannot produce is a not-found failure.
#[test]
fn test_delete_of_unknown_id_fails() {
    let validator = policy_validator(setup_memory_store());
    let err = validator.validate(404, Action::Delete).unwrap_err();
    assert_eq!(err.failures()[0].field_name(), "id");
    assert_eq!(err.failures()[0].condition(), FailureCondition::NotFound);
}

// =============================================================================
// Name Comparison Tests
// =============================================================================

/// Resource keys and access types match the definition ignoring case.
#[test]
fn test_names_compare_ignoring_case() {
    let validator = policy_validator(setup_memory_store());
    let policy = Policy::new("p1", "cl1")
        .with_resource("PATH", PolicyResource::single("/data"))
        .with_item(PolicyItem::for_users(["alice"]).allowing("READ"));

    assert!(validator.validate_policy(&policy, Action::Create).is_ok());
}

/// Another policy of the same service may not carry the same name.
#[test]
fn test_duplicate_policy_name_rejected() {
    let store = setup_memory_store();
    let existing = store.add_policy(valid_policy());
    let validator = policy_validator(store);

    let err = validator
        .validate_policy(&valid_policy(), Action::Create)
        .unwrap_err();
    assert_eq!(err.failures()[0].field_name(), "name");

    // The stored policy itself is not a clash with itself.
    let same = valid_policy().with_id(existing);
    assert!(validator.validate_policy(&same, Action::Update).is_ok());
}

// =============================================================================
// Service Tests
// =============================================================================

/// Missing mandatory configuration is reported per name.
#[test]
fn test_service_missing_mandatory_config() {
    let store = setup_memory_store();
    let validator = ServiceValidator::new(MetadataIndex::new(store, null_log()));

    let err = validator
        .validate_service(&Service::new("cl2", "hdfs"), Action::Create)
        .unwrap_err();
    assert_eq!(err.failures().len(), 1);
    assert_eq!(err.failures()[0].sub_field_name(), Some("namenode"));
    assert!(err.failures()[0].is_missing());

    let ok = Service::new("cl2", "hdfs").with_config("namenode", "nn2:8020");
    assert!(validator.validate_service(&ok, Action::Create).is_ok());
}

// =============================================================================
// Directory Store Tests
// =============================================================================

/// Entities written to a directory store validate the same way.
#[test]
fn test_directory_store_backed_validation() {
    let tmp = TempDir::new().unwrap();
    let store = DirStore::new(tmp.path());
    store.put_service_def(&hdfs_def().with_id(1)).unwrap();
    store
        .put_service(
            &Service::new("cl1", "hdfs")
                .with_id(2)
                .with_config("namenode", "nn:8020"),
        )
        .unwrap();
    store.put_policy(&valid_policy().with_id(3)).unwrap();

    let index = MetadataIndex::new(Arc::new(store), null_log());

    assert!(PolicyValidator::new(index.clone())
        .validate(3, Action::Update)
        .is_ok());
    assert!(ServiceValidator::new(index.clone())
        .validate(2, Action::Update)
        .is_ok());
    assert!(ServiceDefValidator::new(index.clone())
        .validate(1, Action::Update)
        .is_ok());
    assert!(PolicyValidator::new(index).validate(9, Action::Update).is_err());
}

/// Keys differing only by case are each checked, so the verdict does not
/// depend on map iteration order across repeated reads.
#[test]
fn test_directory_store_case_colliding_keys_stable() {
    let tmp = TempDir::new().unwrap();
    let store = DirStore::new(tmp.path());
    store.put_service_def(&hdfs_def().with_id(1)).unwrap();
    store
        .put_service(
            &Service::new("cl1", "hdfs")
                .with_id(2)
                .with_config("namenode", "nn:8020"),
        )
        .unwrap();
    let policies = tmp.path().join("policies");
    fs::create_dir_all(&policies).unwrap();
    fs::write(
        policies.join("3.json"),
        r#"{"id": 3, "name": "p1", "service": "cl1",
            "resources": {"PATH": {"values": ["/ok"]}, "path": {"values": ["relative"]}}}"#,
    )
    .unwrap();

    let validator = PolicyValidator::new(MetadataIndex::new(Arc::new(store), null_log()));
    for _ in 0..50 {
        let err = validator.validate(3, Action::Update).unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].sub_field_name(), Some("path"));
    }
}

/// A stored document without an id takes it from its file name.
#[test]
fn test_directory_store_id_less_document_validates_by_id() {
    let tmp = TempDir::new().unwrap();
    let store = DirStore::new(tmp.path());
    store.put_service_def(&hdfs_def().with_id(1)).unwrap();
    let services = tmp.path().join("services");
    fs::create_dir_all(&services).unwrap();
    fs::write(
        services.join("2.json"),
        r#"{"name": "cl1", "type": "hdfs", "configs": {"namenode": "nn:8020"}}"#,
    )
    .unwrap();
    let policies = tmp.path().join("policies");
    fs::create_dir_all(&policies).unwrap();
    fs::write(
        policies.join("3.json"),
        r#"{"name": "p1", "service": "cl1", "resources": {"path": {"values": ["/data"]}}}"#,
    )
    .unwrap();

    let index = MetadataIndex::new(Arc::new(store), null_log());
    assert!(PolicyValidator::new(index.clone())
        .validate(3, Action::Update)
        .is_ok());
    assert!(ServiceValidator::new(index)
        .validate(2, Action::Update)
        .is_ok());
}

// =============================================================================
// Audit Flag Tests
// =============================================================================

/// An unset audit flag means audited; an absent policy means not audited.
#[test]
fn test_audit_flag_defaults() {
    let validator = policy_validator(setup_memory_store());

    assert!(validator.is_audit_enabled(Some(&valid_policy())));
    assert!(!validator.is_audit_enabled(Some(&valid_policy().with_audit(false))));
    assert!(!validator.is_audit_enabled(None));
}
