use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::models::Worker;

/// Blank or dangling supervisor references resolve to "no supervisor".
#[derive(Debug)]
pub struct Hierarchy<'a> {
    roster: &'a [Worker],
    by_id: HashMap<&'a str, usize>,
    supervisor_ids: Vec<&'a str>,
}

impl<'a> Hierarchy<'a> {
    pub fn new(roster: &'a [Worker]) -> Self {
        let mut by_id = HashMap::with_capacity(roster.len());
        for (idx, worker) in roster.iter().enumerate() {
            if by_id.contains_key(worker.id.as_str()) {
                warn!(id = %worker.id, "duplicate worker id, keeping first occurrence");
                continue;
            }
            by_id.insert(worker.id.as_str(), idx);
        }

        let mut seen = HashSet::new();
        let mut supervisor_ids = Vec::new();
        for worker in roster {
            let Some(supervisor_id) = supervisor_key(worker) else {
                continue;
            };
            if !by_id.contains_key(supervisor_id) {
                warn!(
                    id = %worker.id,
                    supervisor_id,
                    "supervisor not found in roster"
                );
                continue;
            }
            if seen.insert(supervisor_id) {
                supervisor_ids.push(supervisor_id);
            }
        }

        Self {
            roster,
            by_id,
            supervisor_ids,
        }
    }

    pub fn worker(&self, id: &str) -> Option<&'a Worker> {
        self.by_id.get(id).map(|&idx| &self.roster[idx])
    }

    pub fn resolve_supervisor(&self, worker: &Worker) -> Option<&'a Worker> {
        supervisor_key(worker).and_then(|id| self.worker(id))
    }

    pub fn subordinates_of(&self, supervisor_id: &str) -> Vec<&'a Worker> {
        let key = supervisor_id.trim();
        self.roster
            .iter()
            .filter(|worker| supervisor_key(worker) == Some(key))
            .collect()
    }

    /// First-seen order.
    pub fn all_supervisor_ids(&self) -> &[&'a str] {
        &self.supervisor_ids
    }
}

fn supervisor_key(worker: &Worker) -> Option<&str> {
    worker
        .supervisor_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
}
