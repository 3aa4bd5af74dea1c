use super::*;
use std::collections::HashMap;

const SAMPLE_SHEET: &str = "filename\tATTRIBUTE_Sample_Type\tATTRIBUTE_Treatment
blank_01.mzML\tBlank\t
control_01.mzML\tSample\tcontrol
treated_01.mzML\tsample\ttreated
pool_01.mzML\tQC\t
extra.mzML\t\t";

#[test]
fn test_sample_sheet_parsing() {
    let reader = std::io::Cursor::new(SAMPLE_SHEET);
    let sheet = SampleSheet::from_reader(reader).unwrap();

    assert_eq!(sheet.len(), 5);
    assert_eq!(sheet.entries[0].sample_type, SampleType::Blank);
    assert_eq!(sheet.entries[2].sample_type, SampleType::Sample);
    assert_eq!(sheet.entries[3].sample_type, SampleType::Pool);
    assert_eq!(sheet.entries[4].sample_type, SampleType::Unspecified);
    assert_eq!(
        sheet.entries[1].attributes.get("attribute_treatment"),
        Some(&"control".to_string())
    );
}

#[test]
fn test_sample_sheet_blanks() {
    let sheet = SampleSheet::from_reader(std::io::Cursor::new(SAMPLE_SHEET)).unwrap();
    assert_eq!(sheet.blanks(), vec!["blank_01.mzML".to_string()]);
}

#[test]
fn test_sample_sheet_plain_type_header() {
    let tsv = "filename\tSample_Type\ns1.mzML\tSample\nb1.mzML\tBLANK\n";
    let sheet = SampleSheet::from_reader(std::io::Cursor::new(tsv)).unwrap();
    assert_eq!(sheet.blanks(), vec!["b1.mzML".to_string()]);
}

#[test]
fn test_sample_sheet_missing_type_column() {
    let tsv = "filename\tcondition\ns1.mzML\tA\n";
    let result = SampleSheet::from_reader(std::io::Cursor::new(tsv));
    assert!(matches!(result, Err(MetadataError::MissingColumn(_))));
}

#[test]
fn test_sample_type_other_is_verbatim() {
    assert_eq!(
        SampleType::parse(" Standard "),
        SampleType::Other("Standard".to_string())
    );
}

#[test]
fn test_processing_history_record_orders_steps() {
    let mut history = ProcessingHistory::new();
    history.record("feature detection", HashMap::new());

    let mut params = HashMap::new();
    params.insert("cutoff".to_string(), "0.3".to_string());
    history.record("blank removal", params);

    assert_eq!(history.steps.len(), 2);
    assert_eq!(history.steps[1].order, 2);
    let step = history.last_of_type("blank removal").unwrap();
    assert_eq!(step.parameters.get("cutoff"), Some(&"0.3".to_string()));
    assert_eq!(step.software, "mzblank");
}

#[test]
fn test_map_metadata_parquet_roundtrip() {
    let mut metadata = FeatureMapMetadata::new("sample1.mzML");
    metadata.source_file.path = Some("/data/sample1.mzML".to_string());
    metadata.processing_history.record("feature detection", HashMap::new());

    let kv = metadata.to_parquet_metadata().unwrap();
    assert!(kv.contains_key(crate::schema::KEY_CREATED));

    let restored = FeatureMapMetadata::from_parquet_metadata(&kv).unwrap();
    assert_eq!(restored, metadata);
}

#[test]
fn test_map_metadata_missing_keys_default() {
    let restored = FeatureMapMetadata::from_parquet_metadata(&HashMap::new()).unwrap();
    assert!(restored.source_file.name.is_empty());
    assert!(restored.processing_history.steps.is_empty());
}
