use serde::{Deserialize, Serialize};

use super::super::domain::CountryCode;

/// Regulatory parameters for the federation and citizenship regimes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityRules {
    pub target_nation: CountryCode,
    pub federation_min_residence_years: f64,
    pub majority_age: u32,
    pub citizenship_min_residence_years: f64,
    pub adjacent_nations: Vec<CountryCode>,
    pub allow_dual_citizenship: bool,
    pub naturalization_horizon_years: f64,
}

impl EligibilityRules {
    /// FIFA residency rules combined with San Marino citizenship law.
    pub fn san_marino() -> Self {
        Self {
            target_nation: CountryCode::from_static("SMR"),
            federation_min_residence_years: 5.0,
            majority_age: 18,
            citizenship_min_residence_years: 10.0,
            adjacent_nations: vec![CountryCode::from_static("ITA")],
            allow_dual_citizenship: false,
            naturalization_horizon_years: 5.0,
        }
    }

    pub fn is_adjacent(&self, code: &CountryCode) -> bool {
        self.adjacent_nations.contains(code)
    }
}

impl Default for EligibilityRules {
    fn default() -> Self {
        Self::san_marino()
    }
}
