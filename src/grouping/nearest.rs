use log::{debug, info};

use crate::consensus::{ColumnHeader, ConsensusFeature, ConsensusMap, FeatureHandle};
use crate::feature::FeatureMap;

use super::{FeatureGrouper, GroupingConfig, GroupingError};

/// A feature flattened out of its map for indexing
struct Candidate {
    map: usize,
    id: u64,
    rt: f64,
    mz: f64,
    intensity: f64,
    charge: i32,
}

/// Greedy nearest-neighbor feature linker.
///
/// Features from all maps are visited in descending intensity. Each
/// unassigned feature seeds a consensus feature; for every other map the
/// unassigned, charge-compatible feature within both tolerances that
/// minimizes `(Δrt / rt_tol)² + (Δmz / mz_window)²` joins it. A consensus
/// feature therefore holds at most one feature per map, and every input
/// feature ends up in exactly one consensus feature.
///
/// Consensus position and intensity are member means; quality is map
/// coverage scaled by `1 - mean distance / 2`.
#[derive(Debug, Clone, Default)]
pub struct NearestNeighborGrouper {
    config: GroupingConfig,
}

impl NearestNeighborGrouper {
    /// Create a grouper with the given tolerances
    pub fn new(config: GroupingConfig) -> Self {
        Self { config }
    }

    /// Grouping parameters
    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    fn distance(&self, seed: &Candidate, other: &Candidate, mz_window: f64) -> f64 {
        let rt_term = (other.rt - seed.rt) / self.config.rt_tol;
        let mz_term = if mz_window > 0.0 {
            (other.mz - seed.mz) / mz_window
        } else {
            0.0
        };
        rt_term * rt_term + mz_term * mz_term
    }
}

impl FeatureGrouper for NearestNeighborGrouper {
    fn group(&self, maps: &[FeatureMap]) -> Result<ConsensusMap, GroupingError> {
        if maps.len() < self.min_maps() {
            return Err(GroupingError::TooFewMaps {
                required: self.min_maps(),
                found: maps.len(),
            });
        }
        self.config.validate()?;

        let candidates: Vec<Candidate> = maps
            .iter()
            .enumerate()
            .flat_map(|(map, fm)| {
                fm.features.iter().map(move |f| Candidate {
                    map,
                    id: f.id,
                    rt: f.rt,
                    mz: f.mz,
                    intensity: f.intensity,
                    charge: f.charge,
                })
            })
            .collect();

        let mut by_mz: Vec<usize> = (0..candidates.len()).collect();
        by_mz.sort_by(|&a, &b| candidates[a].mz.total_cmp(&candidates[b].mz));

        let mut seeds: Vec<usize> = (0..candidates.len()).collect();
        seeds.sort_by(|&a, &b| {
            candidates[b]
                .intensity
                .total_cmp(&candidates[a].intensity)
                .then(a.cmp(&b))
        });

        let mut assigned = vec![false; candidates.len()];
        let mut features = Vec::new();

        for seed_idx in seeds {
            if assigned[seed_idx] {
                continue;
            }
            let seed = &candidates[seed_idx];
            let mz_window = self.config.mz_window(seed.mz);

            // Nearest admissible candidate per map
            let mut best: Vec<Option<(usize, f64)>> = vec![None; maps.len()];
            let start = by_mz.partition_point(|&i| candidates[i].mz < seed.mz - mz_window);
            for &i in &by_mz[start..] {
                let other = &candidates[i];
                if other.mz > seed.mz + mz_window {
                    break;
                }
                if assigned[i]
                    || other.map == seed.map
                    || (other.rt - seed.rt).abs() > self.config.rt_tol
                    || !self.config.charge_merging.compatible(seed.charge, other.charge)
                {
                    continue;
                }

                let d = self.distance(seed, other, mz_window);
                match best[other.map] {
                    Some((_, best_d)) if best_d <= d => {}
                    _ => best[other.map] = Some((i, d)),
                }
            }

            let mut members = vec![(seed_idx, 0.0)];
            members.extend(best.into_iter().flatten());
            members.sort_by_key(|&(i, _)| candidates[i].map);

            for &(i, _) in &members {
                assigned[i] = true;
            }

            features.push(self.consensus_feature(&candidates, seed_idx, &members, maps.len()));
        }

        features.sort_by(|a, b| a.mz.total_cmp(&b.mz).then(a.rt.total_cmp(&b.rt)));

        let column_headers = maps
            .iter()
            .map(|fm| ColumnHeader {
                filename: fm.source_file().to_string(),
                size: fm.len(),
            })
            .collect();

        info!(
            "Grouped {} features from {} maps into {} consensus features",
            candidates.len(),
            maps.len(),
            features.len()
        );
        debug!("Grouping parameters: {:?}", self.config);

        Ok(ConsensusMap {
            column_headers,
            features,
        })
    }
}

impl NearestNeighborGrouper {
    fn consensus_feature(
        &self,
        candidates: &[Candidate],
        seed_idx: usize,
        members: &[(usize, f64)],
        n_maps: usize,
    ) -> ConsensusFeature {
        let n = members.len() as f64;
        let handles: Vec<FeatureHandle> = members
            .iter()
            .map(|&(i, _)| {
                let c = &candidates[i];
                FeatureHandle {
                    map_index: c.map,
                    feature_id: c.id,
                    rt: c.rt,
                    mz: c.mz,
                    intensity: c.intensity,
                    charge: c.charge,
                }
            })
            .collect();

        let seed_charge = candidates[seed_idx].charge;
        let charge = if seed_charge != 0 {
            seed_charge
        } else {
            handles.iter().map(|h| h.charge).find(|&c| c != 0).unwrap_or(0)
        };

        let linked = members.len() - 1;
        let mean_distance = if linked > 0 {
            members.iter().map(|&(_, d)| d).sum::<f64>() / linked as f64
        } else {
            0.0
        };
        let coverage = n / n_maps as f64;
        let quality = (coverage * (1.0 - mean_distance / 2.0)).clamp(0.0, 1.0);

        ConsensusFeature {
            id: uuid::Uuid::new_v4().as_u64_pair().0,
            rt: handles.iter().map(|h| h.rt).sum::<f64>() / n,
            mz: handles.iter().map(|h| h.mz).sum::<f64>() / n,
            intensity: handles.iter().map(|h| h.intensity).sum::<f64>() / n,
            charge,
            quality,
            handles,
        }
    }
}
