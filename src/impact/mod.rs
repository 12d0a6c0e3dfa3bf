//! Configuration change impact analysis.
//!
//! Pure function over a [`PolicyGraph`] snapshot, safe to call on every edit
//! for preview purposes. It never executes anything.

use std::collections::{BTreeSet, VecDeque};

use crate::policy::{PolicyGraph, ServiceId};


/// Computes the services that must restart after `changed_keys` changed.
///
/// The result is the set of services directly triggered by any changed key
/// plus everything reachable from them along `dependencies` edges. Cycles are
/// harmless: a service enters the finalized set at most once.
pub fn analyze<I, K>(changed_keys: I, graph: &PolicyGraph) -> BTreeSet<ServiceId>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let mut finalized: BTreeSet<ServiceId> = BTreeSet::new();
    let mut queue: VecDeque<ServiceId> = VecDeque::new();

    for key in changed_keys {
        let Some(services) = graph.triggered_by(key.as_ref()) else {
            continue;
        };
        for service in services {
            if finalized.insert(service.clone()) {
                queue.push_back(service.clone());
            }
        }
    }

    while let Some(service) = queue.pop_front() {
        let Some(dependents) = graph.dependents_of(&service) else {
            continue;
        };
        for dependent in dependents {
            if finalized.insert(dependent.clone()) {
                queue.push_back(dependent.clone());
            }
        }
    }

    finalized
}
