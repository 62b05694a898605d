// =============================================================================
// Symbol directory — names and sectors for the tracked universe
// =============================================================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Sector assigned to symbols missing from the directory.
pub const FALLBACK_SECTOR: &str = "Technology";

/// Fifty large-cap US equities quoted by default.
pub const DEFAULT_UNIVERSE: [&str; 50] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "BRK.B", "UNH", "JNJ",
    "JPM", "V", "PG", "HD", "CVX", "MA", "PFE", "ABBV", "BAC", "KO",
    "AVGO", "PEP", "COST", "TMO", "MRK", "ACN", "WMT", "DIS", "ABT", "CRM",
    "VZ", "ADBE", "NFLX", "NKE", "CMCSA", "DHR", "TXN", "NEE", "BMY", "PM",
    "RTX", "QCOM", "HON", "UPS", "T", "SBUX", "MDT", "LOW", "IBM", "AMT",
];

/// The eleven GICS sectors reported in sector performance.
pub const SECTORS: [&str; 11] = [
    "Technology",
    "Healthcare",
    "Financials",
    "Consumer Discretionary",
    "Communication Services",
    "Industrials",
    "Consumer Staples",
    "Energy",
    "Utilities",
    "Real Estate",
    "Materials",
];

const KNOWN_SYMBOLS: [(&str, &str, &str); 50] = [
    ("AAPL", "Apple Inc.", "Technology"),
    ("MSFT", "Microsoft Corporation", "Technology"),
    ("GOOGL", "Alphabet Inc.", "Communication Services"),
    ("AMZN", "Amazon.com Inc.", "Consumer Discretionary"),
    ("NVDA", "NVIDIA Corporation", "Technology"),
    ("META", "Meta Platforms Inc.", "Communication Services"),
    ("TSLA", "Tesla Inc.", "Consumer Discretionary"),
    ("BRK.B", "Berkshire Hathaway Inc.", "Financials"),
    ("UNH", "UnitedHealth Group Inc.", "Healthcare"),
    ("JNJ", "Johnson & Johnson", "Healthcare"),
    ("JPM", "JPMorgan Chase & Co.", "Financials"),
    ("V", "Visa Inc.", "Financials"),
    ("PG", "Procter & Gamble Co.", "Consumer Staples"),
    ("HD", "Home Depot Inc.", "Consumer Discretionary"),
    ("CVX", "Chevron Corporation", "Energy"),
    ("MA", "Mastercard Inc.", "Financials"),
    ("PFE", "Pfizer Inc.", "Healthcare"),
    ("ABBV", "AbbVie Inc.", "Healthcare"),
    ("BAC", "Bank of America Corp.", "Financials"),
    ("KO", "Coca-Cola Co.", "Consumer Staples"),
    ("AVGO", "Broadcom Inc.", "Technology"),
    ("PEP", "PepsiCo Inc.", "Consumer Staples"),
    ("COST", "Costco Wholesale Corp.", "Consumer Staples"),
    ("TMO", "Thermo Fisher Scientific Inc.", "Healthcare"),
    ("MRK", "Merck & Co. Inc.", "Healthcare"),
    ("ACN", "Accenture plc", "Technology"),
    ("WMT", "Walmart Inc.", "Consumer Staples"),
    ("DIS", "Walt Disney Co.", "Communication Services"),
    ("ABT", "Abbott Laboratories", "Healthcare"),
    ("CRM", "Salesforce Inc.", "Technology"),
    ("VZ", "Verizon Communications Inc.", "Communication Services"),
    ("ADBE", "Adobe Inc.", "Technology"),
    ("NFLX", "Netflix Inc.", "Communication Services"),
    ("NKE", "Nike Inc.", "Consumer Discretionary"),
    ("CMCSA", "Comcast Corporation", "Communication Services"),
    ("DHR", "Danaher Corporation", "Healthcare"),
    ("TXN", "Texas Instruments Inc.", "Technology"),
    ("NEE", "NextEra Energy Inc.", "Utilities"),
    ("BMY", "Bristol-Myers Squibb Co.", "Healthcare"),
    ("PM", "Philip Morris International Inc.", "Consumer Staples"),
    ("RTX", "RTX Corporation", "Industrials"),
    ("QCOM", "Qualcomm Inc.", "Technology"),
    ("HON", "Honeywell International Inc.", "Industrials"),
    ("UPS", "United Parcel Service Inc.", "Industrials"),
    ("T", "AT&T Inc.", "Communication Services"),
    ("SBUX", "Starbucks Corporation", "Consumer Discretionary"),
    ("MDT", "Medtronic plc", "Healthcare"),
    ("LOW", "Lowe's Companies Inc.", "Consumer Discretionary"),
    ("IBM", "International Business Machines Corp.", "Technology"),
    ("AMT", "American Tower Corporation", "Real Estate"),
];

/// Display name and sector of one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub sector: String,
}

/// Static symbol -> name/sector lookup.
#[derive(Debug, Clone)]
pub struct SymbolDirectory {
    entries: HashMap<String, SymbolInfo>,
}

impl SymbolDirectory {
    pub fn new(entries: HashMap<String, SymbolInfo>) -> Self {
        Self { entries }
    }

    /// Look up `symbol`, synthesising `"<SYM> Inc."` in the fallback sector
    /// for unknown symbols.
    pub fn info(&self, symbol: &str) -> SymbolInfo {
        self.entries.get(symbol).cloned().unwrap_or_else(|| SymbolInfo {
            name: format!("{symbol} Inc."),
            sector: FALLBACK_SECTOR.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SymbolDirectory {
    fn default() -> Self {
        let entries = KNOWN_SYMBOLS
            .iter()
            .map(|&(symbol, name, sector)| {
                (
                    symbol.to_string(),
                    SymbolInfo {
                        name: name.to_string(),
                        sector: sector.to_string(),
                    },
                )
            })
            .collect();
        Self { entries }
    }
}
