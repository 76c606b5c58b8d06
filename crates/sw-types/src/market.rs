use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DataError;

/// Stablecoins tracked by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stablecoin {
    Usdc,
    Usdt,
    Dai,
    Frax,
    Tusd,
}

impl Stablecoin {
    /// All supported instruments, in the order the dashboard offers them.
    pub fn all() -> [Stablecoin; 5] {
        [
            Stablecoin::Usdc,
            Stablecoin::Usdt,
            Stablecoin::Dai,
            Stablecoin::Frax,
            Stablecoin::Tusd,
        ]
    }

    pub fn ticker(&self) -> &'static str {
        match self {
            Stablecoin::Usdc => "USDC",
            Stablecoin::Usdt => "USDT",
            Stablecoin::Dai => "DAI",
            Stablecoin::Frax => "FRAX",
            Stablecoin::Tusd => "TUSD",
        }
    }

    /// Static qualitative rating shown next to the ticker.
    pub fn safety_label(&self) -> SafetyLabel {
        match self {
            Stablecoin::Usdc | Stablecoin::Dai => SafetyLabel::VerySafe,
            Stablecoin::Usdt => SafetyLabel::ModerateRisk,
            Stablecoin::Frax => SafetyLabel::Caution,
            Stablecoin::Tusd => SafetyLabel::HighRisk,
        }
    }
}

impl fmt::Display for Stablecoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ticker())
    }
}

impl FromStr for Stablecoin {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Stablecoin::all()
            .into_iter()
            .find(|coin| coin.ticker().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DataError::UnknownInstrument {
                symbol: wanted.to_string(),
            })
    }
}

/// Qualitative safety rating attached to each instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SafetyLabel {
    VerySafe,
    ModerateRisk,
    Caution,
    HighRisk,
}

impl SafetyLabel {
    /// Status glyph printed alongside the label.
    pub fn badge(&self) -> &'static str {
        match self {
            SafetyLabel::VerySafe => "✅",
            SafetyLabel::ModerateRisk => "🟡",
            SafetyLabel::Caution => "🟠",
            SafetyLabel::HighRisk => "🔴",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyLabel::VerySafe => "Very Safe",
            SafetyLabel::ModerateRisk => "Moderate Risk",
            SafetyLabel::Caution => "Caution",
            SafetyLabel::HighRisk => "High Risk",
        }
    }
}

impl fmt::Display for SafetyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_lists_dashboard_order() {
        let tickers: Vec<&str> = Stablecoin::all().iter().map(|c| c.ticker()).collect();
        assert_eq!(tickers, vec!["USDC", "USDT", "DAI", "FRAX", "TUSD"]);
    }

    #[test]
    fn test_safety_labels() {
        assert_eq!(Stablecoin::Usdc.safety_label(), SafetyLabel::VerySafe);
        assert_eq!(Stablecoin::Usdt.safety_label(), SafetyLabel::ModerateRisk);
        assert_eq!(Stablecoin::Dai.safety_label(), SafetyLabel::VerySafe);
        assert_eq!(Stablecoin::Frax.safety_label(), SafetyLabel::Caution);
        assert_eq!(Stablecoin::Tusd.safety_label(), SafetyLabel::HighRisk);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("dai".parse::<Stablecoin>().unwrap(), Stablecoin::Dai);
        assert_eq!(" FRAX ".parse::<Stablecoin>().unwrap(), Stablecoin::Frax);
        assert_eq!("Usdt".parse::<Stablecoin>().unwrap(), Stablecoin::Usdt);
    }

    #[test]
    fn test_parse_unknown_symbol() {
        let err = "BUSD".parse::<Stablecoin>().unwrap_err();
        assert!(err.to_string().contains("BUSD"));
    }

    #[test]
    fn test_label_display_and_badge() {
        assert_eq!(format!("{}", SafetyLabel::ModerateRisk), "Moderate Risk");
        assert_eq!(SafetyLabel::HighRisk.badge(), "🔴");
        assert_eq!(format!("{}", Stablecoin::Tusd), "TUSD");
    }

    #[test]
    fn test_serde_uses_ticker() {
        let json = serde_json::to_string(&Stablecoin::Usdc).unwrap();
        assert_eq!(json, "\"USDC\"");
        let back: Stablecoin = serde_json::from_str("\"FRAX\"").unwrap();
        assert_eq!(back, Stablecoin::Frax);
    }
}
