//! In-memory port implementations for tests.

#![allow(clippy::expect_used, clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use octovars_domain::{Environment, Machine, Page, Project, Variable, VariableSet};

use crate::ports::{ProjectCatalog, RemoteStoreError, ScopeCatalog, VariableStore};

#[derive(Default)]
struct StoreState {
    sets: HashMap<String, VariableSet>,
    next_id: usize,
    writes: usize,
    persist_failure: Option<RemoteStoreError>,
    forgetful: bool,
    dropped_on_persist: Option<String>,
}

/// Variable store that behaves like the server: it checks the version,
/// assigns identifiers to drafts and bumps the version on every write.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a set, keyed by its owner.
    pub fn with_set(self, set: VariableSet) -> Self {
        self.state
            .lock()
            .expect("Lock poisoned")
            .sets
            .insert(set.owner_id.clone(), set);
        self
    }

    /// Every persist fails with `error`.
    pub fn failing_persist(self, error: RemoteStoreError) -> Self {
        self.state.lock().expect("Lock poisoned").persist_failure = Some(error);
        self
    }

    /// Persists succeed but silently drop new drafts.
    pub fn forgetful(self) -> Self {
        self.state.lock().expect("Lock poisoned").forgetful = true;
        self
    }

    /// Persists succeed but silently drop the variable with identifier `id`.
    pub fn dropping(self, id: &str) -> Self {
        self.state.lock().expect("Lock poisoned").dropped_on_persist = Some(id.to_string());
        self
    }

    pub fn writes(&self) -> usize {
        self.state.lock().expect("Lock poisoned").writes
    }

    pub fn stored(&self, project_id: &str) -> Option<VariableSet> {
        self.state
            .lock()
            .expect("Lock poisoned")
            .sets
            .get(project_id)
            .cloned()
    }
}

#[async_trait]
impl VariableStore for InMemoryStore {
    async fn fetch_variable_set(&self, project_id: &str) -> Result<VariableSet, RemoteStoreError> {
        self.state
            .lock()
            .expect("Lock poisoned")
            .sets
            .get(project_id)
            .cloned()
            .ok_or_else(|| RemoteStoreError::NotFound(format!("project '{project_id}'")))
    }

    async fn persist_variable_set(
        &self,
        variable_set: &VariableSet,
    ) -> Result<VariableSet, RemoteStoreError> {
        let mut state = self.state.lock().expect("Lock poisoned");
        if let Some(error) = state.persist_failure.clone() {
            return Err(error);
        }

        let current_version = state
            .sets
            .get(&variable_set.owner_id)
            .map(|set| set.version)
            .ok_or_else(|| {
                RemoteStoreError::NotFound(format!("variable set '{}'", variable_set.id))
            })?;
        if current_version != variable_set.version {
            return Err(RemoteStoreError::Rejected {
                status: 409,
                message: "version conflict".to_string(),
            });
        }

        state.writes += 1;
        let forgetful = state.forgetful;
        let dropped = state.dropped_on_persist.clone();
        let mut assigned = Vec::with_capacity(variable_set.len());
        for variable in variable_set.variables() {
            if dropped
                .as_deref()
                .is_some_and(|id| variable.has_id(id))
            {
                continue;
            }
            if variable.is_persisted() {
                assigned.push(variable.clone());
            } else if !forgetful {
                state.next_id += 1;
                assigned.push(variable.clone().with_id(format!("generated-{}", state.next_id)));
            }
        }

        let mut written = VariableSet::new(&variable_set.id, &variable_set.owner_id)
            .with_variables(assigned);
        written.version = variable_set.version + 1;
        written.links = variable_set.links.clone();
        written.extra = variable_set.extra.clone();

        state
            .sets
            .insert(variable_set.owner_id.clone(), written.clone());
        Ok(written)
    }
}

/// Project catalog serving fixed pages keyed by offset.
#[derive(Clone, Default)]
pub struct PagedCatalog {
    pages: HashMap<usize, Page<Project>>,
    requested: Arc<Mutex<Vec<usize>>>,
}

impl PagedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `items` at offset `skip`, linking to `next` when given.
    pub fn with_page(mut self, skip: usize, items: Vec<Project>, next: Option<&str>) -> Self {
        let mut links = HashMap::new();
        if let Some(next) = next {
            links.insert(
                octovars_domain::NEXT_PAGE_LINK.to_string(),
                next.to_string(),
            );
        }
        self.pages.insert(
            skip,
            Page {
                total_results: items.len(),
                items_per_page: items.len(),
                items,
                links,
            },
        );
        self
    }

    pub fn requested(&self) -> Vec<usize> {
        self.requested.lock().expect("Lock poisoned").clone()
    }
}

#[async_trait]
impl ProjectCatalog for PagedCatalog {
    async fn fetch_project(&self, id_or_slug: &str) -> Result<Project, RemoteStoreError> {
        self.pages
            .values()
            .flat_map(|page| page.items.iter())
            .find(|project| project.id == id_or_slug || project.slug == id_or_slug)
            .cloned()
            .ok_or_else(|| RemoteStoreError::NotFound(format!("project '{id_or_slug}'")))
    }

    async fn fetch_projects_page(&self, skip: usize) -> Result<Page<Project>, RemoteStoreError> {
        self.requested.lock().expect("Lock poisoned").push(skip);
        self.pages
            .get(&skip)
            .cloned()
            .ok_or_else(|| RemoteStoreError::Rejected {
                status: 400,
                message: format!("no page at offset {skip}"),
            })
    }
}

/// Scope catalog holding environments and machines keyed by id and slug.
#[derive(Clone, Default)]
pub struct ScopeTargets {
    environments: HashMap<String, Environment>,
    machines: HashMap<String, Machine>,
    failure: Option<RemoteStoreError>,
}

impl ScopeTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(mut self, environment: Environment, slug: &str) -> Self {
        self.environments.insert(slug.to_string(), environment.clone());
        self.environments.insert(environment.id.clone(), environment);
        self
    }

    pub fn with_machine(mut self, machine: Machine, slug: &str) -> Self {
        self.machines.insert(slug.to_string(), machine.clone());
        self.machines.insert(machine.id.clone(), machine);
        self
    }

    /// Every fetch fails with `error`.
    pub fn failing(mut self, error: RemoteStoreError) -> Self {
        self.failure = Some(error);
        self
    }
}

#[async_trait]
impl ScopeCatalog for ScopeTargets {
    async fn fetch_environment(&self, id_or_slug: &str) -> Result<Environment, RemoteStoreError> {
        if let Some(error) = self.failure.clone() {
            return Err(error);
        }
        self.environments
            .get(id_or_slug)
            .cloned()
            .ok_or_else(|| RemoteStoreError::NotFound(format!("environment '{id_or_slug}'")))
    }

    async fn fetch_machine(&self, id_or_slug: &str) -> Result<Machine, RemoteStoreError> {
        if let Some(error) = self.failure.clone() {
            return Err(error);
        }
        self.machines
            .get(id_or_slug)
            .cloned()
            .ok_or_else(|| RemoteStoreError::NotFound(format!("machine '{id_or_slug}'")))
    }
}

/// A persisted variable for seeding sets.
pub fn persisted(id: &str, name: &str, value: &str) -> Variable {
    Variable::draft(name, octovars_domain::ScopeSet::new())
        .with_id(id)
        .with_value(value)
}
