use serde::{Deserialize, Serialize};

/// Descriptive company fields. Any of them may be missing upstream; the
/// presentation layer decides what to show in their place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub long_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<u64>,
    pub country: Option<String>,
}

impl CompanyProfile {
    pub fn is_empty(&self) -> bool {
        self.long_name.is_none()
            && self.sector.is_none()
            && self.industry.is_none()
            && self.market_cap.is_none()
            && self.country.is_none()
    }
}
