use chrono::NaiveDateTime;

/// Single-symbol indicator snapshot from `/analysis/{symbol}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisReport {
    pub symbol: String,
    pub price: Option<f64>,
    pub rsi: Option<f64>,
    pub adx: Option<f64>,
    pub atr_percent: Option<f64>,
    pub bandwidth: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub dc_low: Option<f64>,
    pub dc_high: Option<f64>,
    pub timestamp: Option<NaiveDateTime>,
}

impl AnalysisReport {
    /// Label/value rows in display order. Missing values are `None`.
    pub fn rows(&self) -> [(&'static str, Option<f64>); 9] {
        [
            ("Fiyat", self.price),
            ("RSI", self.rsi),
            ("ADX", self.adx),
            ("ATR %", self.atr_percent),
            ("BB Genişlik", self.bandwidth),
            ("BB Üst", self.bb_upper),
            ("BB Alt", self.bb_lower),
            ("DC Alt", self.dc_low),
            ("DC Üst", self.dc_high),
        ]
    }
}
