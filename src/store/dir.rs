//! Directory-backed store.
//!
//! Layout under the root:
//! - `service-defs/<id>.json`
//! - `services/<id>.json`
//! - `policies/<id>.json`
//!
//! Every lookup reads from disk; nothing is cached between calls. The file
//! name is the entity's id: a document without an `id` takes it from the file
//! name, and a document whose `id` disagrees is malformed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{SearchFilter, ServiceStore, StoreError, StoreResult};
use crate::model::{EntityId, Policy, Service, ServiceDef};

const SERVICE_DEFS: &str = "service-defs";
const SERVICES: &str = "services";
const POLICIES: &str = "policies";

/// Reads entities from one JSON file per entity.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a service definition to disk. The definition must carry an id.
    pub fn put_service_def(&self, def: &ServiceDef) -> StoreResult<PathBuf> {
        self.put(SERVICE_DEFS, "service-def", def.id, def)
    }

    /// Writes a service to disk. The service must carry an id.
    pub fn put_service(&self, service: &Service) -> StoreResult<PathBuf> {
        self.put(SERVICES, "service", service.id, service)
    }

    /// Writes a policy to disk. The policy must carry an id.
    pub fn put_policy(&self, policy: &Policy) -> StoreResult<PathBuf> {
        self.put(POLICIES, "policy", policy.id, policy)
    }

    fn put<T: Serialize>(
        &self,
        dir: &str,
        kind: &'static str,
        id: Option<EntityId>,
        value: &T,
    ) -> StoreResult<PathBuf> {
        let id = id.ok_or_else(|| StoreError::Malformed {
            kind,
            path: dir.to_string(),
            reason: "entity has no id".into(),
        })?;
        let dir_path = self.root.join(dir);
        fs::create_dir_all(&dir_path).map_err(|e| io_error(&dir_path, e))?;

        let path = dir_path.join(format!("{}.json", id));
        let content = serde_json::to_string_pretty(value).map_err(|e| StoreError::Malformed {
            kind,
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::write(&path, content).map_err(|e| io_error(&path, e))?;
        Ok(path)
    }

    fn read_by_id<T: DeserializeOwned + Keyed>(
        &self,
        dir: &str,
        kind: &'static str,
        id: EntityId,
    ) -> StoreResult<T> {
        let path = self.root.join(dir).join(format!("{}.json", id));
        if !path.exists() {
            return Err(StoreError::not_found_id(kind, id));
        }
        read_document(&path, kind)
    }

    /// Reads every document in `dir`, ordered by file name.
    fn read_all<T: DeserializeOwned + Keyed>(&self, dir: &str, kind: &'static str) -> StoreResult<Vec<T>> {
        let dir_path = self.root.join(dir);
        if !dir_path.exists() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir_path).map_err(|e| io_error(&dir_path, e))? {
            let path = entry.map_err(|e| io_error(&dir_path, e))?.path();
            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        paths.iter().map(|p| read_document(p, kind)).collect()
    }
}

/// Entities whose id is carried by their file name.
trait Keyed {
    fn id_mut(&mut self) -> &mut Option<EntityId>;
}

impl Keyed for ServiceDef {
    fn id_mut(&mut self) -> &mut Option<EntityId> {
        &mut self.id
    }
}

impl Keyed for Service {
    fn id_mut(&mut self) -> &mut Option<EntityId> {
        &mut self.id
    }
}

impl Keyed for Policy {
    fn id_mut(&mut self) -> &mut Option<EntityId> {
        &mut self.id
    }
}

fn read_document<T: DeserializeOwned + Keyed>(path: &Path, kind: &'static str) -> StoreResult<T> {
    let malformed = |reason: String| StoreError::Malformed {
        kind,
        path: path.display().to_string(),
        reason,
    };

    let file_id: EntityId = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse().ok())
        .ok_or_else(|| malformed("file name is not an entity id".to_string()))?;

    let content = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    let mut entity: T = serde_json::from_str(&content).map_err(|e| malformed(e.to_string()))?;

    let id = entity.id_mut();
    match *id {
        None => *id = Some(file_id),
        Some(body_id) if body_id != file_id => {
            return Err(malformed(format!(
                "document id {} does not match file name id {}",
                body_id, file_id
            )));
        }
        Some(_) => {}
    }
    Ok(entity)
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl ServiceStore for DirStore {
    fn get_service_def(&self, id: EntityId) -> StoreResult<ServiceDef> {
        self.read_by_id(SERVICE_DEFS, "service-def", id)
    }

    fn get_service_def_by_name(&self, name: &str) -> StoreResult<ServiceDef> {
        self.read_all::<ServiceDef>(SERVICE_DEFS, "service-def")?
            .into_iter()
            .find(|d| d.name == name)
            .ok_or_else(|| StoreError::not_found_name("service-def", name))
    }

    fn get_service(&self, id: EntityId) -> StoreResult<Service> {
        self.read_by_id(SERVICES, "service", id)
    }

    fn get_service_by_name(&self, name: &str) -> StoreResult<Service> {
        self.read_all::<Service>(SERVICES, "service")?
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| StoreError::not_found_name("service", name))
    }

    fn get_policy(&self, id: EntityId) -> StoreResult<Policy> {
        self.read_by_id(POLICIES, "policy", id)
    }

    fn list_policies(&self, filter: &SearchFilter) -> StoreResult<Vec<Policy>> {
        let mut policies: Vec<Policy> = self
            .read_all::<Policy>(POLICIES, "policy")?
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();
        policies.sort_by_key(|p| p.id);
        Ok(policies)
    }
}
