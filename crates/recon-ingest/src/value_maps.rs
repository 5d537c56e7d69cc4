//! Enumerated value dictionaries.
//!
//! Source exports encode categorical variables as numeric codes; the
//! target registry stores labels. Dictionaries map code to label per
//! qualified source column. Codes absent from a dictionary pass
//! through unchanged downstream, by deliberate permissive policy.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::error::{IngestError, Result};

/// `qualified column name -> (raw code -> label)`.
pub type ValueMaps = BTreeMap<String, BTreeMap<String, String>>;

/// Load dictionaries from a JSON file shaped
/// `{"enct.sex": {"1": "Male", "2": "Female"}}`.
pub fn load_value_maps(path: &Path) -> Result<ValueMaps> {
    let contents = std::fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let maps: ValueMaps =
        serde_json::from_str(&contents).map_err(|source| IngestError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    info!(columns = maps.len(), file = %path.display(), "loaded value-mapping dictionaries");
    Ok(maps)
}

const YES_NO_COLUMNS: &[&str] = &[
    "flow.iat_stentintracran",
    "flow.iat_stentextracran",
    "flow.stroke_pre",
    "flow.tia_pre",
    "flow.ich_pre",
    "flow.hypertension",
    "flow.diabetes",
    "flow.hyperlipidemia",
    "flow.smoking",
    "flow.atrialfib",
    "flow.chd",
    "flow.lowoutput",
    "flow.pad",
    "flow.decompression",
    "img.iat_mech",
    "img.follow_mra",
    "img.follow_cta",
    "img.follow_ultrasound",
    "img.follow_dsa",
    "img.follow_tte",
    "img.follow_tee",
    "img.follow_holter",
    "med.aspirin_pre",
    "med.clopidogrel_pre",
    "med.prasugrel_pre",
    "med.ticagrelor_pre",
    "med.dipyridamole_pre",
    "med.vka_pre",
    "med.rivaroxaban_pre",
    "med.dabigatran_pre",
    "med.apixaban_pre",
    "med.edoxaban_pre",
    "med.parenteralanticg_pre",
    "med.antihypertensive_pre",
    "med.antilipid_pre",
    "med.hormone_pre",
    "med.treat_antiplatelet",
    "med.treat_anticoagulant",
    "med.treat_ivt",
    "enct.non_swiss",
];

const BILATERAL_COLUMNS: &[&str] = &["flow.mca", "flow.aca", "flow.pca", "flow.vertebrobasilar"];

fn dictionary(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(code, label)| ((*code).to_string(), (*label).to_string()))
        .collect()
}

/// The standard dictionaries shipped with the pipeline: yes/no flags,
/// laterality, device and destination codes, and the sex code pair.
pub fn default_value_maps() -> ValueMaps {
    let yes_no = dictionary(&[("0", "no"), ("1", "yes"), ("false", "no"), ("true", "yes")]);
    let bilateral = dictionary(&[
        ("0", "no"),
        ("1", ""),
        ("2", "right"),
        ("3", "left"),
        ("4", "bilateral"),
    ]);

    let mut maps = ValueMaps::new();
    for column in YES_NO_COLUMNS {
        maps.insert((*column).to_string(), yes_no.clone());
    }
    for column in BILATERAL_COLUMNS {
        maps.insert((*column).to_string(), bilateral.clone());
    }
    maps.insert(
        "enct.sex".to_string(),
        dictionary(&[("1", "Male"), ("2", "Female")]),
    );
    maps.insert(
        "enct.transport".to_string(),
        dictionary(&[
            ("1", "Ambulance"),
            ("2", "Helicopter"),
            ("3", "Other (taxi,self,relatives,friends...)"),
        ]),
    );
    maps.insert(
        "enct.discharge_destinat".to_string(),
        dictionary(&[
            ("1", "Home"),
            ("2", "Other acute care hospital"),
            ("3", "Rehabilitation Hospital"),
            (
                "4",
                "Nursing home, palliative care center, or other medical facility",
            ),
        ]),
    );
    maps.insert(
        "flow.prostheticvalves".to_string(),
        dictionary(&[("0", "None"), ("1", "Biological"), ("2", "Mechanical")]),
    );
    maps.insert(
        "img.firstimage_type".to_string(),
        dictionary(&[
            ("1", "CT"),
            ("2", "MRI"),
            ("3", "CT (external)"),
            ("4", "MRI (external)"),
        ]),
    );
    maps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_standard_columns() {
        let maps = default_value_maps();
        assert_eq!(maps["enct.sex"]["1"], "Male");
        assert_eq!(maps["enct.sex"]["2"], "Female");
        assert_eq!(maps["flow.hypertension"]["1"], "yes");
        assert_eq!(maps["flow.hypertension"]["0"], "no");
        assert_eq!(maps["flow.mca"]["4"], "bilateral");
        assert_eq!(maps["img.firstimage_type"]["2"], "MRI");
    }

    #[test]
    fn unmapped_codes_are_simply_absent() {
        let maps = default_value_maps();
        assert!(maps["enct.sex"].get("999").is_none());
    }

    #[test]
    fn loads_dictionaries_from_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("value_maps.json");
        std::fs::write(&path, r#"{"enct.sex": {"1": "Male", "2": "Female"}}"#)
            .expect("write fixture");
        let maps = load_value_maps(&path).expect("load");
        assert_eq!(maps["enct.sex"]["1"], "Male");
        assert_eq!(maps.len(), 1);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("value_maps.json");
        std::fs::write(&path, "not json").expect("write fixture");
        let error = load_value_maps(&path).expect_err("should fail");
        assert!(error.to_string().contains("value maps"));
    }
}
