//! A reference [`Repository`] implementation backed by in-memory maps
//! behind read-write locks, following the same "copy out before I/O, keep
//! critical sections free of blocking work" discipline `opamp-server`'s
//! connection registry uses. Swappable without touching the `Repository`
//! trait; a real deployment would replace this crate, not extend it.

pub mod pagination;
pub mod sweep;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use opamp_core::agent::Agent;
use opamp_core::condition::{Condition, ConditionStatus};
use opamp_core::error::{OpampError, OpampResult};
use opamp_core::group::AgentGroup;
use opamp_core::instance_uid::InstanceUid;
use opamp_core::ports::{Clock, Page, Repository};
use opamp_core::remote_config::{AgentPackage, AgentRemoteConfig};

#[derive(Default)]
struct Collection<K, V> {
    items: HashMap<K, V>,
    generation: AtomicU64,
}

impl<K: std::hash::Hash + Eq + Clone, V: Clone> Collection<K, V> {
    fn new() -> Self {
        Self {
            items: HashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

/// In-memory `Repository`. Each resource kind lives in its own
/// `RwLock<Collection<..>>` so operations on agents never contend with
/// operations on groups.
pub struct InMemoryStore {
    agents: RwLock<Collection<InstanceUid, Agent>>,
    groups: RwLock<Collection<String, AgentGroup>>,
    remote_configs: RwLock<Collection<String, AgentRemoteConfig>>,
    packages: RwLock<Collection<String, AgentPackage>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            agents: RwLock::new(Collection::new()),
            groups: RwLock::new(Collection::new()),
            remote_configs: RwLock::new(Collection::new()),
            packages: RwLock::new(Collection::new()),
            clock,
        }
    }

    /// Hard-purges `AgentRemoteConfig`/`AgentPackage` records whose
    /// `deleted_at` is older than `retention`. Agents are never purged here
    /// (they are soft-deleted via a condition entry and kept forever, per
    /// spec); this is what the background sweep loop in `sweep.rs` drives.
    pub fn sweep_deleted(&self, retention: chrono::Duration) {
        let cutoff = self.clock.now();
        sweep_collection(&self.remote_configs, |cfg| cfg.metadata.deleted_at, cutoff, retention);
        sweep_collection(&self.packages, |pkg| pkg.metadata.deleted_at, cutoff, retention);
    }
}

fn sweep_collection<K, V>(
    lock: &RwLock<Collection<K, V>>,
    deleted_at: impl Fn(&V) -> Option<opamp_core::time::Time>,
    cutoff: opamp_core::time::Time,
    retention: chrono::Duration,
) where
    K: std::hash::Hash + Eq + Clone,
    V: Clone,
{
    let mut collection = lock.write().expect("store lock poisoned");
    let expired: Vec<K> = collection
        .items
        .iter()
        .filter_map(|(key, value)| {
            let deleted = deleted_at(value)?;
            let deleted_dt = deleted.as_datetime()?;
            let cutoff_dt = cutoff.as_datetime()?;
            (cutoff_dt - deleted_dt > retention).then(|| key.clone())
        })
        .collect();
    if expired.is_empty() {
        return;
    }
    for key in &expired {
        collection.items.remove(key);
    }
    collection.bump();
}

fn sorted_by_key<V: Clone>(items: &HashMap<InstanceUid, V>) -> Vec<(String, V)> {
    let mut out: Vec<(String, V)> = items.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

fn sorted_named<V: Clone>(items: &HashMap<String, V>) -> Vec<(String, V)> {
    let mut out: Vec<(String, V)> = items.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

#[async_trait]
impl Repository for InMemoryStore {
    async fn get_agent(&self, instance_uid: InstanceUid) -> OpampResult<Option<Agent>> {
        let agents = self.agents.read().expect("store lock poisoned");
        Ok(agents.items.get(&instance_uid).cloned())
    }

    async fn get_or_create_agent(&self, instance_uid: InstanceUid) -> OpampResult<Agent> {
        let mut agents = self.agents.write().expect("store lock poisoned");
        if let Some(agent) = agents.items.get(&instance_uid) {
            return Ok(agent.clone());
        }
        let agent = Agent::new(instance_uid);
        agents.items.insert(instance_uid, agent.clone());
        agents.bump();
        Ok(agent)
    }

    async fn save_agent(&self, agent: Agent) -> OpampResult<()> {
        let mut agents = self.agents.write().expect("store lock poisoned");
        agents.items.insert(agent.instance_uid, agent);
        agents.bump();
        Ok(())
    }

    async fn list_agents(&self, limit: usize, continue_token: Option<String>) -> OpampResult<Page<Agent>> {
        let agents = self.agents.read().expect("store lock poisoned");
        let sorted = sorted_by_key(&agents.items);
        pagination::paginate(&sorted, limit, continue_token, agents.generation())
    }

    async fn soft_delete_agent(&self, instance_uid: InstanceUid) -> OpampResult<()> {
        let mut agents = self.agents.write().expect("store lock poisoned");
        let agent = agents
            .items
            .get_mut(&instance_uid)
            .ok_or_else(|| OpampError::NotFound(format!("agent {instance_uid}")))?;
        agent.status.conditions.push(Condition {
            kind: "Deleted".to_string(),
            status: ConditionStatus::True,
            last_transition_time: self.clock.now(),
            reason: "AdministratorRequested".to_string(),
            message: "soft-deleted by administrator".to_string(),
        });
        agents.bump();
        Ok(())
    }

    async fn get_group(&self, name: String) -> OpampResult<Option<AgentGroup>> {
        let groups = self.groups.read().expect("store lock poisoned");
        Ok(groups.items.get(&name).cloned())
    }

    async fn list_groups(&self) -> OpampResult<Vec<AgentGroup>> {
        let groups = self.groups.read().expect("store lock poisoned");
        Ok(sorted_named(&groups.items).into_iter().map(|(_, group)| group).collect())
    }

    async fn save_group(&self, group: AgentGroup) -> OpampResult<()> {
        let mut groups = self.groups.write().expect("store lock poisoned");
        groups.items.insert(group.name.clone(), group);
        groups.bump();
        Ok(())
    }

    async fn delete_group(&self, name: String) -> OpampResult<()> {
        let mut groups = self.groups.write().expect("store lock poisoned");
        if groups.items.remove(&name).is_none() {
            return Err(OpampError::NotFound(format!("agent group {name}")));
        }
        groups.bump();
        Ok(())
    }

    async fn get_remote_config(&self, name: String) -> OpampResult<Option<AgentRemoteConfig>> {
        let configs = self.remote_configs.read().expect("store lock poisoned");
        Ok(configs.items.get(&name).cloned())
    }

    async fn list_remote_configs(&self, limit: usize, continue_token: Option<String>) -> OpampResult<Page<AgentRemoteConfig>> {
        let configs = self.remote_configs.read().expect("store lock poisoned");
        let sorted = sorted_named(&configs.items);
        pagination::paginate(&sorted, limit, continue_token, configs.generation())
    }

    async fn save_remote_config(&self, config: AgentRemoteConfig) -> OpampResult<()> {
        let mut configs = self.remote_configs.write().expect("store lock poisoned");
        if let Some(existing) = configs.items.get(&config.metadata.name).cloned() {
            let mut merged = existing;
            merged.apply_update(config);
            configs.items.insert(merged.metadata.name.clone(), merged);
        } else {
            configs.items.insert(config.metadata.name.clone(), config);
        }
        configs.bump();
        Ok(())
    }

    async fn delete_remote_config(&self, name: String) -> OpampResult<()> {
        let mut configs = self.remote_configs.write().expect("store lock poisoned");
        let config = configs
            .items
            .get_mut(&name)
            .ok_or_else(|| OpampError::NotFound(format!("remote config {name}")))?;
        config.metadata.deleted_at = Some(self.clock.now());
        configs.bump();
        Ok(())
    }

    async fn get_package(&self, name: String) -> OpampResult<Option<AgentPackage>> {
        let packages = self.packages.read().expect("store lock poisoned");
        Ok(packages.items.get(&name).cloned())
    }

    async fn list_packages(&self, limit: usize, continue_token: Option<String>) -> OpampResult<Page<AgentPackage>> {
        let packages = self.packages.read().expect("store lock poisoned");
        let sorted = sorted_named(&packages.items);
        pagination::paginate(&sorted, limit, continue_token, packages.generation())
    }

    async fn save_package(&self, package: AgentPackage) -> OpampResult<()> {
        let mut packages = self.packages.write().expect("store lock poisoned");
        if let Some(existing) = packages.items.get(&package.metadata.name).cloned() {
            let mut merged = existing;
            merged.apply_update(package);
            packages.items.insert(merged.metadata.name.clone(), merged);
        } else {
            packages.items.insert(package.metadata.name.clone(), package);
        }
        packages.bump();
        Ok(())
    }

    async fn delete_package(&self, name: String) -> OpampResult<()> {
        let mut packages = self.packages.write().expect("store lock poisoned");
        let package = packages
            .items
            .get_mut(&name)
            .ok_or_else(|| OpampError::NotFound(format!("package {name}")))?;
        package.metadata.deleted_at = Some(self.clock.now());
        packages.bump();
        Ok(())
    }
}
