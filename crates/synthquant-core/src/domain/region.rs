use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Symbol;
use crate::ValidationError;

/// Supported listing regions for calibration lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "IN")]
    In,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::In => "IN",
        }
    }

    /// Symbol as the upstream provider expects it for this region.
    ///
    /// Indian listings resolve against the NSE unless an exchange suffix is
    /// already present.
    pub fn provider_symbol(&self, symbol: &Symbol) -> String {
        match self {
            Region::Us => symbol.as_str().to_owned(),
            Region::In => {
                let raw = symbol.as_str();
                if raw.ends_with(".NS") || raw.ends_with(".BO") {
                    raw.to_owned()
                } else {
                    format!("{raw}.NS")
                }
            }
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "US" => Ok(Region::Us),
            "IN" => Ok(Region::In),
            other => Err(ValidationError::UnsupportedRegion {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indian_symbols_gain_nse_suffix() {
        let symbol = Symbol::parse("RELIANCE").unwrap();
        assert_eq!(Region::In.provider_symbol(&symbol), "RELIANCE.NS");
    }

    #[test]
    fn existing_exchange_suffix_is_preserved() {
        let nse = Symbol::parse("TCS.NS").unwrap();
        let bse = Symbol::parse("TCS.BO").unwrap();
        assert_eq!(Region::In.provider_symbol(&nse), "TCS.NS");
        assert_eq!(Region::In.provider_symbol(&bse), "TCS.BO");
    }

    #[test]
    fn us_symbols_pass_through() {
        let symbol = Symbol::parse("AAPL").unwrap();
        assert_eq!(Region::Us.provider_symbol(&symbol), "AAPL");
    }

    #[test]
    fn rejects_unknown_region() {
        let err = "EU".parse::<Region>().expect_err("must fail");
        assert!(matches!(err, ValidationError::UnsupportedRegion { .. }));
    }
}
