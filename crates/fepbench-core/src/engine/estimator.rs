use super::error::EstimationError;
use crate::core::io::calculated::MIN_UNCERTAINTY;
use crate::core::models::femap::{Estimate, FeMap, Measurement};
use crate::core::models::ids::NodeId;
use crate::core::models::records::{CalculatedData, ExperimentalData};
use nalgebra::{Cholesky, DMatrix, DVector};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info, instrument};

/// Outcome of an estimation pass over a free-energy map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimationSummary {
    /// Ligands that received an absolute-value estimate.
    pub estimated: usize,
    /// Ligands with no path to the reference node.
    pub disconnected: usize,
}

/// Builds a free-energy map from experimental and calculated data.
///
/// Every experimental entry becomes a non-computational measurement from the reference
/// node; every calculated entry becomes a computational measurement between two ligands.
pub fn assemble(experimental: &ExperimentalData, calculated: &CalculatedData) -> FeMap {
    let mut map = FeMap::new();
    for record in experimental.iter() {
        map.add_absolute(&record.name, record.exp_dg, record.exp_dg_err);
    }
    for record in calculated.iter() {
        map.add_relative(&record.ligand_i, &record.ligand_j, record.ddg, record.ddg_err);
    }
    debug!(
        "Assembled free-energy map with {} ligands and {} measurements.",
        map.num_ligands(),
        map.measurements().len()
    );
    map
}

/// Assembles the map and populates it with absolute-value estimates.
pub fn build_femap(
    experimental: &ExperimentalData,
    calculated: &CalculatedData,
) -> Result<(FeMap, EstimationSummary), EstimationError> {
    let mut map = assemble(experimental, calculated);
    let summary = generate_absolute_values(&mut map)?;
    Ok((map, summary))
}

/// Ligands joined by ligand-to-ligand measurements, with the measurements that belong to them.
#[derive(Debug, Default)]
struct Component {
    members: Vec<NodeId>,
    edges: Vec<Measurement>,
    /// Measurements between the reference and a member.
    anchors: Vec<Measurement>,
}

/// Groups ligands by ligand-to-ligand connectivity, in first-seen order.
fn components(map: &FeMap) -> Vec<Component> {
    let adjacency = map.ligand_adjacency();
    let mut owner: HashMap<NodeId, usize> = HashMap::new();
    let mut components: Vec<Component> = Vec::new();
    for (id, _) in map.ligands() {
        if owner.contains_key(&id) {
            continue;
        }
        let index = components.len();
        let mut members = vec![id];
        owner.insert(id, index);
        let mut queue = VecDeque::from([id]);
        while let Some(node) = queue.pop_front() {
            for &next in adjacency.get(&node).into_iter().flatten() {
                if let Entry::Vacant(slot) = owner.entry(next) {
                    slot.insert(index);
                    members.push(next);
                    queue.push_back(next);
                }
            }
        }
        components.push(Component {
            members,
            ..Default::default()
        });
    }

    let reference = map.reference();
    for m in map.measurements() {
        if m.from == m.to {
            continue;
        }
        if m.from == reference || m.to == reference {
            let ligand = if m.from == reference { m.to } else { m.from };
            if let Some(&index) = owner.get(&ligand) {
                components[index].anchors.push(*m);
            }
        } else if let Some(&index) = owner.get(&m.from) {
            components[index].edges.push(*m);
        }
    }
    components
}

fn check_finite(map: &FeMap, m: &Measurement) -> Result<(), EstimationError> {
    if m.value.is_finite() && m.uncertainty.is_finite() {
        Ok(())
    } else {
        Err(EstimationError::NonFiniteMeasurement {
            from: map.ligand_name(m.from).unwrap_or("reference").to_string(),
            to: map.ligand_name(m.to).unwrap_or("reference").to_string(),
        })
    }
}

fn weight(uncertainty: f64) -> f64 {
    let sigma = uncertainty.max(MIN_UNCERTAINTY);
    1.0 / (sigma * sigma)
}

/// Solves the relative values of one component from its ligand-to-ligand edges alone.
///
/// The first member is held at zero. Returns the values and their covariance, both
/// indexed by member position.
fn relative_solution(
    component: &Component,
    local: &HashMap<NodeId, usize>,
) -> Result<(Vec<f64>, DMatrix<f64>), EstimationError> {
    let k = component.members.len();
    let mut values = vec![0.0; k];
    let mut covariance = DMatrix::<f64>::zeros(k, k);
    let n = k - 1;
    if n == 0 {
        return Ok((values, covariance));
    }

    // Unknown `u` is member `u + 1`.
    let mut fisher = DMatrix::<f64>::zeros(n, n);
    let mut z = DVector::<f64>::zeros(n);
    for m in &component.edges {
        let w = weight(m.uncertainty);
        let unknown = |id: &NodeId| local[id].checked_sub(1);
        let (i, j) = (unknown(&m.from), unknown(&m.to));
        if let Some(i) = i {
            fisher[(i, i)] += w;
            z[i] -= w * m.value;
        }
        if let Some(j) = j {
            fisher[(j, j)] += w;
            z[j] += w * m.value;
        }
        if let (Some(i), Some(j)) = (i, j) {
            fisher[(i, j)] -= w;
            fisher[(j, i)] -= w;
        }
    }

    let cholesky = Cholesky::new(fisher).ok_or(EstimationError::Singular { unknowns: n })?;
    let solution = cholesky.solve(&z);
    let inverse = cholesky.inverse();
    for a in 0..n {
        values[a + 1] = solution[a];
        for b in 0..n {
            covariance[(a + 1, b + 1)] = inverse[(a, b)];
        }
    }
    Ok((values, covariance))
}

/// Resolves one anchored component: relative values from computed edges, then a single
/// offset that makes the anchored members average to their experimental mean.
fn resolve_component(map: &FeMap, component: &Component) -> Result<Vec<Estimate>, EstimationError> {
    for m in component.edges.iter().chain(&component.anchors) {
        check_finite(map, m)?;
    }
    let local: HashMap<NodeId, usize> = component
        .members
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, i))
        .collect();
    let (relative, covariance) = relative_solution(component, &local)?;

    let reference = map.reference();
    let anchors: Vec<(usize, f64, f64)> = component
        .anchors
        .iter()
        .map(|m| {
            if m.from == reference {
                (local[&m.to], m.value, m.uncertainty)
            } else {
                (local[&m.from], -m.value, m.uncertainty)
            }
        })
        .collect();
    let count = anchors.len() as f64;
    let offset = anchors
        .iter()
        .map(|&(i, value, _)| value - relative[i])
        .sum::<f64>()
        / count;
    let offset_variance = anchors.iter().map(|&(_, _, s)| s * s).sum::<f64>() / (count * count);
    let anchor_covariance = anchors
        .iter()
        .flat_map(|&(a, _, _)| anchors.iter().map(move |&(b, _, _)| (a, b)))
        .map(|(a, b)| covariance[(a, b)])
        .sum::<f64>()
        / (count * count);

    Ok((0..component.members.len())
        .map(|i| {
            let cross = anchors.iter().map(|&(a, _, _)| covariance[(i, a)]).sum::<f64>() / count;
            let variance =
                covariance[(i, i)] - 2.0 * cross + anchor_covariance + offset_variance;
            Estimate {
                value: relative[i] + offset,
                uncertainty: variance.max(0.0).sqrt(),
            }
        })
        .collect())
}

/// Resolves absolute values for every ligand connected to the reference node.
///
/// Ligands joined by computed edges form a component whose internal structure comes
/// from those edges only: a weighted least-squares fit with `w = 1/σ²`, uncertainties
/// below [`MIN_UNCERTAINTY`] raised to it. Experimental values never reshape a component.
/// They only fix its position, so that its anchored ligands average to their mean
/// experimental dG. Uncertainties combine the fit covariance with the experimental
/// errors of the anchors.
///
/// Components without an experimental anchor have no path to the reference and keep no
/// estimate.
#[instrument(skip_all, name = "absolute_value_estimation")]
pub fn generate_absolute_values(map: &mut FeMap) -> Result<EstimationSummary, EstimationError> {
    map.clear_estimates();

    let mut estimated = 0;
    let mut disconnected = 0;
    for component in components(map) {
        if component.anchors.is_empty() {
            disconnected += component.members.len();
            continue;
        }
        let estimates = resolve_component(map, &component)?;
        for (&id, estimate) in component.members.iter().zip(estimates) {
            map.set_estimate(id, estimate);
        }
        estimated += component.members.len();
    }

    if disconnected > 0 {
        info!(
            "{} ligand(s) have no path to the reference node and receive no estimate.",
            disconnected
        );
    }
    info!("Estimated absolute values for {} ligand(s).", estimated);
    Ok(EstimationSummary {
        estimated,
        disconnected,
    })
}
