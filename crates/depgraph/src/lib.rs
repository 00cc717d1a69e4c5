//! Service dependency validation and topological ordering. Violations are
//! accumulated and reported together, sorted for determinism, instead of
//! failing fast on the first bad edge.

use ang_ir::{Service, ServiceName};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum DependencyError {
    #[error("service {service} uses unknown service {dep}{}", suggestion_suffix(suggestion))]
    UnknownEdge {
        service: String,
        dep: String,
        suggestion: Option<String>,
    },
    #[error("cycle detected: {}", .participants.join(", "))]
    Cycle { participants: Vec<String> },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean {s}?)"))
        .unwrap_or_default()
}

/// Picks the closest known name by OSA distance, within a generous typo
/// radius; beyond that a suggestion is more likely to mislead than help.
fn suggest_closest<'a>(unknown: &str, known: impl IntoIterator<Item = &'a str>) -> Option<String> {
    known
        .into_iter()
        .map(|name| (name, strsim::osa_distance(unknown, name)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name.to_string())
}

/// Rejects edges to services that don't exist and cycles in the `Uses`
/// graph. Every violation is reported, sorted, rather than aborting on the
/// first.
pub fn validate_service_dependencies(services: &[Service]) -> Result<(), Vec<DependencyError>> {
    let mut errors = Vec::new();
    let names: BTreeSet<&str> = services.iter().map(|s| s.name.as_str()).collect();

    for service in services {
        for dep in &service.uses {
            if !names.contains(dep.as_str()) {
                errors.push(DependencyError::UnknownEdge {
                    service: service.name.to_string(),
                    dep: dep.to_string(),
                    suggestion: suggest_closest(dep.as_str(), names.iter().copied()),
                });
            }
        }
    }

    if let Some(cycle) = find_cycle(services) {
        errors.push(DependencyError::Cycle {
            participants: cycle,
        });
    }

    errors.sort();
    errors.dedup();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Depth-first search for a cycle among edges whose endpoint is a known
/// service; returns its participants in lexicographic order on first find.
fn find_cycle(services: &[Service]) -> Option<Vec<String>> {
    let edges: BTreeMap<&str, Vec<&str>> = services
        .iter()
        .map(|s| {
            (
                s.name.as_str(),
                s.uses
                    .iter()
                    .map(|d| d.as_str())
                    .filter(|d| services.iter().any(|s2| s2.name.as_str() == *d))
                    .collect(),
            )
        })
        .collect();

    #[derive(PartialEq, Clone, Copy)]
    enum Mark {
        Visiting,
        Done,
    }

    let mut marks: BTreeMap<&str, Mark> = BTreeMap::new();
    let mut stack: Vec<&str> = Vec::new();

    fn visit<'a>(
        node: &'a str,
        edges: &BTreeMap<&'a str, Vec<&'a str>>,
        marks: &mut BTreeMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        if let Some(pos) = stack.iter().position(|&n| n == node) {
            let mut cycle: Vec<String> = stack[pos..].iter().map(|s| s.to_string()).collect();
            cycle.sort();
            return Some(cycle);
        }
        if marks.get(node) == Some(&Mark::Done) {
            return None;
        }

        stack.push(node);
        if let Some(deps) = edges.get(node) {
            for dep in deps {
                if let Some(cycle) = visit(dep, edges, marks, stack) {
                    return Some(cycle);
                }
            }
        }
        stack.pop();
        marks.insert(node, Mark::Done);
        None
    }

    for name in edges.keys().sorted() {
        if let Some(cycle) = visit(name, &edges, &mut marks, &mut stack) {
            return Some(cycle);
        }
    }
    None
}

/// Kahn's algorithm with lexicographic tie-breaking: the ready queue is
/// resorted on every enqueue so the result is independent of input order.
/// If a cycle slipped past [`validate_service_dependencies`], the services
/// still stuck with unresolved in-degree are appended in input order rather
/// than silently dropped.
pub fn order_services_by_dependencies(services: &[Service]) -> Vec<ServiceName> {
    let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let known: BTreeSet<&str> = services.iter().map(|s| s.name.as_str()).collect();

    for service in services {
        in_degree.entry(service.name.as_str()).or_insert(0);
        for dep in &service.uses {
            if known.contains(dep.as_str()) {
                *in_degree.entry(service.name.as_str()).or_insert(0) += 1;
                dependents
                    .entry(dep.as_str())
                    .or_default()
                    .push(service.name.as_str());
            }
        }
    }

    let mut ready: Vec<&str> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&name, _)| name)
        .collect();
    ready.sort();

    let mut queue: VecDeque<&str> = ready.into();
    let mut order: Vec<&str> = Vec::new();

    while let Some(name) = queue.pop_front() {
        order.push(name);
        if let Some(next) = dependents.get(name) {
            let mut newly_ready = Vec::new();
            for &dependent in next {
                let deg = in_degree.get_mut(dependent).unwrap();
                *deg -= 1;
                if *deg == 0 {
                    newly_ready.push(dependent);
                }
            }
            if !newly_ready.is_empty() {
                let mut resorted: Vec<&str> = queue.iter().copied().chain(newly_ready).collect();
                resorted.sort();
                queue = resorted.into();
            }
        }
    }

    let ordered: BTreeSet<&str> = order.iter().copied().collect();
    for service in services {
        if !ordered.contains(service.name.as_str()) {
            order.push(service.name.as_str());
        }
    }

    order.into_iter().map(ServiceName::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ang_ir::ServiceRequires;
    use std::collections::BTreeMap as Map;

    fn svc(name: &str, uses: &[&str]) -> Service {
        Service {
            name: name.into(),
            methods: vec![],
            publishes: vec![],
            subscribes: Map::new(),
            uses: uses.iter().map(|&u| u.into()).collect(),
            requires: ServiceRequires::default(),
        }
    }

    #[test]
    fn s1_diamond_sorts_dependencies_before_dependents() {
        let services = vec![svc("A", &["B", "C"]), svc("B", &["C"]), svc("C", &[])];
        let order = order_services_by_dependencies(&services);
        let names: Vec<&str> = order.iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }

    #[test]
    fn s1_two_cycle_is_detected() {
        let services = vec![svc("A", &["B"]), svc("B", &["A"])];
        let err = validate_service_dependencies(&services).unwrap_err();
        assert!(matches!(&err[0], DependencyError::Cycle { participants } if participants == &vec!["A".to_string(), "B".to_string()]));
    }

    #[test]
    fn unknown_edge_is_rejected() {
        let services = vec![svc("A", &["Ghost"])];
        let err = validate_service_dependencies(&services).unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(matches!(&err[0], DependencyError::UnknownEdge { dep, .. } if dep == "Ghost"));
    }

    #[test]
    fn unknown_edge_near_miss_suggests_closest_known_name() {
        let services = vec![svc("A", &["Tenderz"]), svc("Tenders", &[])];
        let err = validate_service_dependencies(&services).unwrap_err();
        assert!(matches!(
            &err[0],
            DependencyError::UnknownEdge { suggestion: Some(s), .. } if s == "Tenders"
        ));
    }

    #[test]
    fn unresolved_cycle_still_appends_all_services() {
        let services = vec![svc("A", &["B"]), svc("B", &["A"]), svc("C", &[])];
        let order = order_services_by_dependencies(&services);
        assert_eq!(order.len(), 3);
    }
}
