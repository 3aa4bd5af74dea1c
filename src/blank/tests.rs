use super::*;
use crate::consensus::{ColumnHeader, ConsensusFeature, ConsensusMap, FeatureHandle};
use crate::feature::{Feature, FeatureMap};
use crate::grouping::{FeatureGrouper, GroupingError, NearestNeighborGrouper};
use std::collections::{BTreeMap, HashSet};
use tempfile::tempdir;

/// Groups features with bit-identical m/z, ignoring retention time
struct ExactMzGrouper;

impl FeatureGrouper for ExactMzGrouper {
    fn group(&self, maps: &[FeatureMap]) -> Result<ConsensusMap, GroupingError> {
        if maps.len() < self.min_maps() {
            return Err(GroupingError::TooFewMaps {
                required: self.min_maps(),
                found: maps.len(),
            });
        }

        let mut groups: BTreeMap<u64, Vec<FeatureHandle>> = BTreeMap::new();
        for (map_index, map) in maps.iter().enumerate() {
            for f in &map.features {
                groups.entry(f.mz.to_bits()).or_default().push(FeatureHandle {
                    map_index,
                    feature_id: f.id,
                    rt: f.rt,
                    mz: f.mz,
                    intensity: f.intensity,
                    charge: f.charge,
                });
            }
        }

        let features = groups
            .into_values()
            .enumerate()
            .map(|(i, handles)| ConsensusFeature {
                id: 1000 + i as u64,
                rt: handles[0].rt,
                mz: handles[0].mz,
                intensity: handles[0].intensity,
                charge: 0,
                quality: 1.0,
                handles,
            })
            .collect();

        Ok(ConsensusMap {
            column_headers: maps
                .iter()
                .map(|m| ColumnHeader {
                    filename: m.source_file().to_string(),
                    size: m.len(),
                })
                .collect(),
            features,
        })
    }
}

struct FailingGrouper;

impl FeatureGrouper for FailingGrouper {
    fn group(&self, _maps: &[FeatureMap]) -> Result<ConsensusMap, GroupingError> {
        Err(GroupingError::InvalidTolerance {
            name: "rt_tol",
            value: -1.0,
        })
    }
}

/// One map holding one feature per `(id, mz, intensity)` triple
fn map(name: &str, features: &[(u64, f64, f64)]) -> FeatureMap {
    FeatureMap::with_features(
        name,
        features
            .iter()
            .map(|&(id, mz, intensity)| Feature::new(id, 100.0, mz, intensity))
            .collect(),
    )
}

fn filter() -> BlankFilter<ExactMzGrouper> {
    BlankFilter::new(ExactMzGrouper, BlankFilterConfig::default())
}

fn ids(map: &FeatureMap) -> HashSet<u64> {
    map.feature_ids()
}

#[test]
fn test_blank_ratio() {
    assert_eq!(blank_ratio(Some(5.0), Some(110.0)), Some(6.0 / 111.0));
    assert_eq!(blank_ratio(Some(0.0), Some(0.0)), Some(1.0));
    assert_eq!(blank_ratio(None, Some(10.0)), None);
    assert_eq!(blank_ratio(Some(10.0), None), None);
    assert_eq!(blank_ratio(Some(f64::NAN), Some(1.0)), None);
}

#[test]
fn test_partition_mean_policies() {
    let row = [Some(10.0), None, Some(20.0)];

    assert_eq!(partition_mean(&row, &[0, 2], MissingValues::Propagate), Some(15.0));
    assert_eq!(partition_mean(&row, &[0, 1], MissingValues::Propagate), None);
    assert_eq!(partition_mean(&row, &[], MissingValues::Propagate), None);

    assert_eq!(partition_mean(&row, &[0, 1], MissingValues::Zero), Some(5.0));
    assert_eq!(partition_mean(&row, &[], MissingValues::Zero), Some(0.0));
}

#[test]
fn test_partition_excludes_padding_columns() {
    let blanks = BlankSet::new(["blank"]);
    let partition = Partition::from_columns(
        &["s1.mzML", "blank.mzML", SYNTHETIC_MAP_NAME],
        2,
        &blanks,
    );

    assert_eq!(partition.sample_columns, vec![0]);
    assert_eq!(partition.blank_columns, vec![1]);
}

#[test]
fn test_blank_set_matches_by_stem() {
    let blanks = BlankSet::new(["blank1", "/runs/blank2.mzML"]);

    assert!(blanks.contains("blank1.mzML"));
    assert!(blanks.contains("/data/blank1.mzML"));
    assert!(blanks.contains("blank2"));
    assert!(!blanks.contains("sample1.mzML"));
    assert_eq!(blanks.stems(), vec!["blank1", "blank2"]);
}

#[test]
fn test_unmatched_blanks() {
    let maps = vec![map("s1.mzML", &[]), map("/runs/blank_01.mzML", &[])];
    let blanks = BlankSet::new(["blank_01", "blank_1", "blank_02.mzML"]);

    assert_eq!(blanks.unmatched(&maps), vec!["blank_02", "blank_1"]);
    assert!(BlankSet::new(["blank_01.mzML"]).unmatched(&maps).is_empty());
}

#[test]
fn test_misspelled_blank_deletes_nothing() -> Result<(), BlankError> {
    let maps = vec![
        map("s1.mzML", &[(1, 200.0, 100.0)]),
        map("blank_01.mzML", &[(2, 200.0, 1.0)]),
    ];

    let plan = filter().plan(&maps, &BlankSet::new(["blank_1"]))?;

    assert!(plan.deletions.is_empty());
    assert_eq!(plan.stats.unscored_rows, 1);
    assert!(plan.retained.iter().all(FeatureMap::is_empty));
    Ok(())
}

#[test]
fn test_low_blank_feature_is_kept() -> Result<(), BlankError> {
    let maps = vec![
        map("s1.mzML", &[(1, 200.0, 100.0)]),
        map("s2.mzML", &[(2, 200.0, 120.0)]),
        map("s3.mzML", &[(3, 200.0, 110.0)]),
        map("blank.mzML", &[(4, 200.0, 5.0)]),
    ];

    let plan = filter().plan(&maps, &BlankSet::new(["blank.mzML"]))?;

    assert_eq!(plan.scores.len(), 1);
    let score = &plan.scores[0];
    assert_eq!(score.avg_sample, Some(110.0));
    assert_eq!(score.avg_blank, Some(5.0));
    assert!((score.ratio.unwrap() - 6.0 / 111.0).abs() < 1e-12);
    assert!(score.is_real);

    assert_eq!(plan.deletions, vec!["blank.mzML".to_string()]);
    assert_eq!(plan.retained.len(), 3);
    for retained in &plan.retained {
        assert_eq!(retained.len(), 1);
    }
    Ok(())
}

#[test]
fn test_blank_dominated_feature_is_removed() -> Result<(), BlankError> {
    let maps = vec![
        map("s1.mzML", &[(1, 200.0, 10.0)]),
        map("s2.mzML", &[(2, 200.0, 8.0)]),
        map("s3.mzML", &[(3, 200.0, 9.0)]),
        map("blank.mzML", &[(4, 200.0, 50.0)]),
    ];

    let plan = filter().plan(&maps, &BlankSet::new(["blank"]))?;

    assert_eq!(plan.scores[0].ratio, Some(51.0 / 10.0));
    assert!(!plan.scores[0].is_real);
    assert!(plan.keep_ids.is_empty());
    assert!(plan.retained.iter().all(FeatureMap::is_empty));
    assert_eq!(plan.stats.background_rows, 1);
    Ok(())
}

#[test]
fn test_cutoff_is_strict() -> Result<(), BlankError> {
    // ratio = (2 + 1) / (9 + 1) = 0.3
    let maps = vec![
        map("s1.mzML", &[(1, 200.0, 9.0)]),
        map("blank.mzML", &[(2, 200.0, 2.0)]),
    ];

    let plan = filter().plan(&maps, &BlankSet::new(["blank"]))?;
    assert!(!plan.scores[0].is_real);

    let lenient = BlankFilter::new(ExactMzGrouper, BlankFilterConfig::with_cutoff(0.31));
    assert!(lenient.plan(&maps, &BlankSet::new(["blank"]))?.scores[0].is_real);
    Ok(())
}

#[test]
fn test_missing_coverage_is_never_real() -> Result<(), BlankError> {
    // 300.0 is absent from the blank, 400.0 from s2
    let maps = vec![
        map("s1.mzML", &[(1, 200.0, 1e6), (2, 300.0, 1e6), (3, 400.0, 1e6)]),
        map("s2.mzML", &[(4, 200.0, 1e6), (5, 300.0, 1e6)]),
        map("blank.mzML", &[(6, 200.0, 10.0), (7, 400.0, 10.0)]),
    ];

    let plan = filter().plan(&maps, &BlankSet::new(["blank"]))?;

    assert_eq!(plan.stats.consensus_rows, 3);
    assert_eq!(plan.stats.real_rows, 1);
    assert_eq!(plan.stats.unscored_rows, 2);
    assert_eq!(plan.keep_ids, [1, 4, 6].into_iter().collect());
    assert_eq!(ids(&plan.retained[0]), [1].into_iter().collect());
    assert_eq!(ids(&plan.retained[1]), [4].into_iter().collect());
    Ok(())
}

#[test]
fn test_zero_policy_scores_missing_coverage() -> Result<(), BlankError> {
    let maps = vec![
        map("s1.mzML", &[(1, 200.0, 1e6), (2, 300.0, 1e6), (3, 400.0, 1e6)]),
        map("s2.mzML", &[(4, 200.0, 1e6), (5, 300.0, 1e6)]),
        map("blank.mzML", &[(6, 200.0, 10.0), (7, 400.0, 10.0)]),
    ];
    let config = BlankFilterConfig {
        missing_values: MissingValues::Zero,
        ..Default::default()
    };

    let plan = BlankFilter::new(ExactMzGrouper, config).plan(&maps, &BlankSet::new(["blank"]))?;

    assert_eq!(plan.stats.real_rows, 3);
    assert_eq!(plan.stats.unscored_rows, 0);
    assert_eq!(ids(&plan.retained[0]), [1, 2, 3].into_iter().collect());
    assert_eq!(ids(&plan.retained[1]), [4, 5].into_iter().collect());
    Ok(())
}

#[test]
fn test_retained_ids_are_file_ids_intersect_keep_set() -> Result<(), BlankError> {
    let maps = vec![
        map("s1.mzML", &[(1, 200.0, 500.0), (2, 250.0, 3.0)]),
        map("s2.mzML", &[(3, 200.0, 700.0), (4, 250.0, 2.0)]),
        map("blank.mzML", &[(5, 200.0, 1.0), (6, 250.0, 40.0)]),
    ];

    let plan = filter().plan(&maps, &BlankSet::new(["blank"]))?;

    for (input, retained) in maps.iter().zip(&plan.retained) {
        let expected: HashSet<u64> = ids(input).intersection(&plan.keep_ids).copied().collect();
        assert_eq!(ids(retained), expected);
    }
    assert_eq!(plan.stats.features_before, 4);
    assert_eq!(plan.stats.features_after, 2);
    Ok(())
}

#[test]
fn test_only_blanks_are_deleted() -> Result<(), BlankError> {
    let maps = vec![
        map("blank_a.mzML", &[(1, 200.0, 1.0)]),
        map("s1.mzML", &[(2, 200.0, 100.0)]),
        map("blank_b.mzML", &[(3, 200.0, 1.0)]),
        map("s2.mzML", &[]),
    ];

    let plan = filter().plan(&maps, &BlankSet::new(["blank_a", "blank_b", "absent"]))?;

    assert_eq!(plan.deletions, vec!["blank_a.mzML", "blank_b.mzML"]);
    let retained: Vec<&str> = plan.retained.iter().map(|m| m.source_file()).collect();
    assert_eq!(retained, vec!["s1.mzML", "s2.mzML"]);
    Ok(())
}

#[test]
fn test_single_map_is_padded() -> Result<(), BlankError> {
    let maps = vec![map("only.mzML", &[(1, 200.0, 100.0), (2, 300.0, 1.0)])];
    let config = BlankFilterConfig {
        missing_values: MissingValues::Zero,
        ..Default::default()
    };

    let plan = BlankFilter::new(ExactMzGrouper, config).plan(&maps, &BlankSet::default())?;

    assert_eq!(plan.consensus.column_names(), vec!["only.mzML", SYNTHETIC_MAP_NAME]);
    assert_eq!(plan.retained.len(), 1);
    assert!(plan.deletions.is_empty());
    // 1 / 101 is real, 1 / 2 is not; the empty padding column does not count as a sample
    assert_eq!(ids(&plan.retained[0]), [1].into_iter().collect());
    Ok(())
}

#[test]
fn test_single_map_without_blanks_propagates_to_empty() -> Result<(), BlankError> {
    let maps = vec![map("only.mzML", &[(1, 200.0, 100.0)])];

    let plan = filter().plan(&maps, &BlankSet::default())?;

    assert_eq!(plan.stats.unscored_rows, 1);
    assert!(plan.retained[0].is_empty());
    Ok(())
}

#[test]
fn test_processing_step_recorded() -> Result<(), BlankError> {
    let maps = vec![
        map("s1.mzML", &[(1, 200.0, 100.0)]),
        map("blank.mzML", &[(2, 200.0, 1.0)]),
    ];

    let plan = filter().plan(&maps, &BlankSet::new(["blank"]))?;
    let step = plan.retained[0]
        .metadata
        .processing_history
        .last_of_type(BLANK_REMOVAL_STEP)
        .expect("blank removal step");

    assert_eq!(step.parameters.get("cutoff").map(String::as_str), Some("0.3"));
    assert_eq!(step.parameters.get("blanks").map(String::as_str), Some("blank"));
    assert_eq!(
        step.parameters.get("missing_values").map(String::as_str),
        Some("propagate")
    );
    Ok(())
}

#[test]
fn test_invalid_cutoff() {
    let maps = vec![map("s1.mzML", &[]), map("s2.mzML", &[])];

    for cutoff in [0.0, -0.3, f64::NAN, f64::INFINITY] {
        let result = BlankFilter::new(ExactMzGrouper, BlankFilterConfig::with_cutoff(cutoff))
            .plan(&maps, &BlankSet::default());
        assert!(matches!(result, Err(BlankError::InvalidCutoff(_))));
    }
}

#[test]
fn test_duplicate_source_rejected() {
    let maps = vec![map("a.mzML", &[]), map("/other/dir/a.mzML", &[])];

    let result = filter().plan(&maps, &BlankSet::default());
    assert!(matches!(result, Err(BlankError::DuplicateSource(name)) if name == "/other/dir/a.mzML"));
}

#[test]
fn test_all_blanks_rejected() {
    let maps = vec![map("b1.mzML", &[]), map("b2.mzML", &[])];

    let result = filter().plan(&maps, &BlankSet::new(["b1", "b2"]));
    assert!(matches!(result, Err(BlankError::NoSampleFiles)));

    let result = filter().plan(&[], &BlankSet::default());
    assert!(matches!(result, Err(BlankError::NoSampleFiles)));
}

#[test]
fn test_grouping_error_propagates() {
    let maps = vec![map("s1.mzML", &[]), map("s2.mzML", &[])];

    let result = BlankFilter::new(FailingGrouper, BlankFilterConfig::default())
        .plan(&maps, &BlankSet::default());
    assert!(matches!(
        result,
        Err(BlankError::Grouping(GroupingError::InvalidTolerance { .. }))
    ));
}

#[test]
fn test_plan_with_nearest_neighbor_grouper() -> Result<(), BlankError> {
    let maps = vec![
        FeatureMap::with_features("s1.mzML", vec![Feature::new(1, 120.0, 301.1410, 2e6)]),
        FeatureMap::with_features("s2.mzML", vec![Feature::new(2, 123.0, 301.1412, 3e6)]),
        FeatureMap::with_features("blank.mzML", vec![Feature::new(3, 121.0, 301.1409, 1e3)]),
    ];

    let filter = BlankFilter::new(NearestNeighborGrouper::default(), BlankFilterConfig::default());
    let plan = filter.plan(&maps, &BlankSet::new(["blank"]))?;

    assert_eq!(plan.stats.consensus_rows, 1);
    assert_eq!(plan.keep_ids, [1, 2, 3].into_iter().collect());
    Ok(())
}

#[test]
fn test_remove_blanks_in_dir() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = FeatureStore::open(dir.path())?;
    store.save(&map("s1.mzML", &[(1, 200.0, 100.0), (2, 300.0, 1.0)]))?;
    store.save(&map("s2.mzML", &[(3, 200.0, 120.0), (4, 300.0, 2.0)]))?;
    store.save(&map("blank.mzML", &[(5, 200.0, 5.0), (6, 300.0, 30.0)]))?;

    let stats = remove_blanks_in_dir(
        dir.path(),
        &BlankSet::new(["blank.mzML"]),
        ExactMzGrouper,
        &BlankFilterConfig::default(),
    )?;

    assert_eq!(stats.files_deleted, 1);
    assert_eq!(stats.files_rewritten, 2);
    assert!(!dir.path().join("blank.features.parquet").exists());

    let s1 = store.load(dir.path().join("s1.features.parquet"))?;
    let s2 = store.load(dir.path().join("s2.features.parquet"))?;
    assert_eq!(ids(&s1), [1].into_iter().collect());
    assert_eq!(ids(&s2), [3].into_iter().collect());
    assert!(s1
        .metadata
        .processing_history
        .last_of_type(BLANK_REMOVAL_STEP)
        .is_some());
    Ok(())
}

#[test]
fn test_apply_plan_unknown_map() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = FeatureStore::open(dir.path())?;
    let maps = vec![
        map("s1.mzML", &[(1, 200.0, 100.0)]),
        map("blank.mzML", &[(2, 200.0, 1.0)]),
    ];
    let plan = filter().plan(&maps, &BlankSet::new(["blank"]))?;

    let result = apply_plan(&store, &[], &plan);
    assert!(matches!(result, Err(BlankError::UnknownMap(name)) if name == "s1.mzML"));
    Ok(())
}

#[test]
fn test_stats_serialize() -> Result<(), BlankError> {
    let maps = vec![
        map("s1.mzML", &[(1, 200.0, 100.0)]),
        map("blank.mzML", &[(2, 200.0, 1.0)]),
    ];
    let stats = filter().plan(&maps, &BlankSet::new(["blank"]))?.stats;

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["real_rows"], 1);
    assert_eq!(json["files_deleted"], 1);
    assert!(stats.to_string().contains("1 real"));
    Ok(())
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ratio_is_positive_for_nonnegative_intensities(
            blank in 0.0f64..1e9,
            sample in 0.0f64..1e9,
        ) {
            let ratio = blank_ratio(Some(blank), Some(sample)).unwrap();
            prop_assert!(ratio > 0.0);
            prop_assert!(ratio.is_finite());
        }

        #[test]
        fn real_iff_ratio_below_cutoff(
            samples in prop::collection::vec(0.0f64..1e6, 1..5),
            blank in 0.0f64..1e6,
            cutoff in 0.01f64..2.0,
        ) {
            let mut maps: Vec<FeatureMap> = samples
                .iter()
                .enumerate()
                .map(|(i, &v)| map(&format!("s{i}.mzML"), &[(i as u64, 200.0, v)]))
                .collect();
            maps.push(map("blank.mzML", &[(99, 200.0, blank)]));

            let filter = BlankFilter::new(ExactMzGrouper, BlankFilterConfig::with_cutoff(cutoff));
            let plan = filter.plan(&maps, &BlankSet::new(["blank"])).unwrap();

            let avg_sample = samples.iter().sum::<f64>() / samples.len() as f64;
            let expected = (blank + 1.0) / (avg_sample + 1.0);
            let score = &plan.scores[0];
            prop_assert!((score.ratio.unwrap() - expected).abs() <= 1e-9 * expected);
            prop_assert_eq!(score.is_real, score.ratio.unwrap() < cutoff);

            let kept: usize = plan.retained.iter().map(FeatureMap::len).sum();
            prop_assert_eq!(kept, if score.is_real { samples.len() } else { 0 });
        }
    }
}
