//! Persisted per-test-set records.

use serde::{Deserialize, Serialize};

/// One refined I-V curve and its characteristic points, all numbers as
/// canonical decimal strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveRecord {
    #[serde(rename = "Index")]
    pub index: u32,
    #[serde(rename = "Voltages")]
    pub voltages: Vec<String>,
    #[serde(rename = "Currents")]
    pub currents: Vec<String>,
    pub v_oc: String,
    pub i_sc: String,
    pub v_mp: String,
    pub i_mp: String,
    pub p_mp: String,
    /// Cell temperature (K), 5 significant digits
    #[serde(rename = "Temperature")]
    pub temperature: String,
    #[serde(rename = "Irradiance")]
    pub irradiance: Option<String>,
    #[serde(rename = "Sweep direction")]
    pub sweep_direction: Option<String>,
    #[serde(rename = "Datetime")]
    pub datetime: Option<String>,
}

/// Everything generated for one test set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSetResult {
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Sandia ID")]
    pub sandia_id: String,
    #[serde(rename = "Material")]
    pub material: String,
    #[serde(rename = "IV Curves")]
    pub iv_curves: Vec<CurveRecord>,
}

impl TestSetResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: CurveRecord) {
        self.iv_curves.push(record);
    }

    pub fn curve(&self, index: u32) -> Option<&CurveRecord> {
        self.iv_curves.iter().find(|c| c.index == index)
    }

    pub fn len(&self) -> usize {
        self.iv_curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iv_curves.is_empty()
    }
}
