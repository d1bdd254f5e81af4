//! Processing order for multiple lines
//!
//! A line whose end point touches another line's endpoint (within one cell)
//! depends on that line and is traced after it.

use counterpart_core::{Error, LineId, LineRecord, Result};
use geo::{Distance, Euclidean};

/// Nearest endpoint of another line to a line's end point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointProximity {
    /// Index of the line whose end point was measured
    pub line: usize,
    /// Index of the line owning the nearest other endpoint
    pub nearest: Option<usize>,
    /// Distance to that endpoint, in world units
    pub distance: f64,
}

/// Scheduling constraint of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Independent,
    /// Must be processed after the line at this index
    DependsOn(usize),
}

/// For each line's end point, the closest endpoint of any other line.
///
/// All start points are checked before any end point, each in line order,
/// and the first closest endpoint wins. A line that ends where
/// another one starts therefore depends on that downstream line.
pub fn nearest_endpoints(lines: &[LineRecord]) -> Vec<EndpointProximity> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let mut nearest = None;
            let mut best = f64::INFINITY;
            for use_start in [true, false] {
                for (j, other) in lines.iter().enumerate().filter(|(j, _)| *j != i) {
                    let endpoint = if use_start { other.start } else { other.end };
                    let d = Euclidean::distance(line.end, endpoint);
                    if d < best {
                        best = d;
                        nearest = Some(j);
                    }
                }
            }
            EndpointProximity {
                line: i,
                nearest,
                distance: best,
            }
        })
        .collect()
}

/// Classify lines: an endpoint within `cell_size` of another makes a dependent line.
///
/// The result is indexed by line; lines without a proximity record are independent.
pub fn classify(proximities: &[EndpointProximity], cell_size: f64) -> Vec<Dependency> {
    let mut dependencies = vec![Dependency::Independent; proximities.len()];
    for p in proximities {
        if let (Some(target), Some(slot)) = (p.nearest, dependencies.get_mut(p.line)) {
            if p.distance <= cell_size {
                *slot = Dependency::DependsOn(target);
            }
        }
    }
    dependencies
}

/// Total processing order over line indices.
///
/// Independent lines come first in input order. Dependents are then placed
/// immediately after their target once the target is placed, repeating
/// until all are placed.
///
/// # Errors
/// - `UnresolvedDependencyCycle` (with the ids of the stuck lines) when a pass
///   places nothing, i.e. the dependencies contain a cycle
/// - `InvalidParameter` for a target index outside the line set or when
///   `ids` and `dependencies` differ in length
pub fn resolve_order(ids: &[LineId], dependencies: &[Dependency]) -> Result<Vec<usize>> {
    let n = dependencies.len();
    if ids.len() != n {
        return Err(Error::InvalidParameter {
            name: "ids",
            value: ids.len().to_string(),
            reason: format!("expected one id per dependency ({})", n),
        });
    }

    let mut order = Vec::with_capacity(n);
    let mut placed = vec![false; n];
    let mut pending = Vec::new();

    for (line, dep) in dependencies.iter().enumerate() {
        match *dep {
            Dependency::Independent => {
                order.push(line);
                placed[line] = true;
            }
            Dependency::DependsOn(target) if target >= n => {
                return Err(Error::InvalidParameter {
                    name: "dependency",
                    value: format!("line {} -> index {}", ids[line], target),
                    reason: format!("only {} lines are known", n),
                });
            }
            Dependency::DependsOn(target) => pending.push((line, target)),
        }
    }

    while !pending.is_empty() {
        let before = pending.len();
        pending.retain(|&(line, target)| {
            if !placed[target] {
                return true;
            }
            let at = order.iter().position(|&l| l == target).map_or(order.len(), |p| p + 1);
            order.insert(at, line);
            placed[line] = true;
            false
        });

        if pending.len() == before {
            return Err(Error::UnresolvedDependencyCycle {
                lines: pending.iter().map(|&(line, _)| ids[line]).collect(),
            });
        }
    }

    Ok(order)
}

/// Classify and order `lines` in one go
pub fn processing_order(lines: &[LineRecord], cell_size: f64) -> Result<Vec<usize>> {
    let dependencies = classify(&nearest_endpoints(lines), cell_size);
    let ids: Vec<LineId> = lines.iter().map(|l| l.id).collect();
    resolve_order(&ids, &dependencies)
}
