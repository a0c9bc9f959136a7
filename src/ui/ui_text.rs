use std::sync::LazyLock;

// Glyphs available in egui's bundled fonts.
pub const ICON_DOT: &str = "\u{25cf}";
pub const ICON_PLAY: &str = "\u{25b6}";
pub const ICON_STOP: &str = "\u{23f9}";
pub const ICON_REFRESH: &str = "\u{1f504}";
pub const ICON_SEARCH: &str = "\u{1f50d}";
pub const ICON_CLOCK: &str = "\u{1f551}";
pub const ICON_WARNING: &str = "\u{26a0}";

pub struct UiText {
    pub app_title: String,

    // --- Status bar ---
    pub status_label: String,
    pub retry_scheduled: String,
    pub retry_exhausted: String,
    pub btn_reconnect: String,
    pub label_total_scans: String,
    pub label_signals_sent: String,
    pub label_last_scan: String,
    pub label_uptime: String,
    pub btn_refresh_stats: String,

    // --- Bot controls ---
    pub bot_heading: String,
    pub bot_running: String,
    pub bot_stopped: String,
    pub btn_start: String,
    pub btn_stop: String,

    // --- Mode ---
    pub mode_heading: String,
    pub mode_unknown: String,
    pub mode_min_score: String,
    pub mode_cooldown: String,
    pub mode_min_volume: String,
    pub mode_top_n: String,

    // --- Analysis ---
    pub analysis_heading: String,
    pub analysis_hint: String,
    pub btn_analyze: String,
    pub analysis_pending: String,
    pub analysis_empty: String,

    // --- Feed ---
    pub feed_heading: String,
    pub feed_empty: String,
    pub feed_received: String,
    pub col_time: String,
    pub col_symbol: String,
    pub col_side: String,
    pub col_regime: String,
    pub col_entry: String,
    pub col_sl: String,
    pub col_tp1: String,
    pub col_tp2: String,
    pub col_tp3: String,
    pub col_score: String,
    pub col_rr: String,
    pub col_reason: String,

    pub value_missing: String,
}

pub static UI_TEXT: LazyLock<UiText> = LazyLock::new(|| UiText {
    app_title: "Signal Desk".to_string(),

    status_label: "Bağlantı:".to_string(),
    retry_scheduled: "Yeniden deneme".to_string(),
    retry_exhausted: format!("{} Bağlantı kurulamadı", ICON_WARNING),
    btn_reconnect: format!("{} Yeniden bağlan", ICON_REFRESH),
    label_total_scans: "Tarama".to_string(),
    label_signals_sent: "Gönderilen sinyal".to_string(),
    label_last_scan: "Son tarama".to_string(),
    label_uptime: format!("{} Çalışma süresi", ICON_CLOCK),
    btn_refresh_stats: format!("{} Yenile", ICON_REFRESH),

    bot_heading: "Bot".to_string(),
    bot_running: "Çalışıyor".to_string(),
    bot_stopped: "Durduruldu".to_string(),
    btn_start: format!("{} Başlat", ICON_PLAY),
    btn_stop: format!("{} Durdur", ICON_STOP),

    mode_heading: "Mod".to_string(),
    mode_unknown: "Bilinmiyor".to_string(),
    mode_min_score: "Min skor".to_string(),
    mode_cooldown: "Bekleme (dk)".to_string(),
    mode_min_volume: "Min hacim (USDT)".to_string(),
    mode_top_n: "Tarama başına".to_string(),

    analysis_heading: format!("{} Analiz", ICON_SEARCH),
    analysis_hint: "ör. BTC-USDT".to_string(),
    btn_analyze: "Analiz et".to_string(),
    analysis_pending: "Analiz ediliyor...".to_string(),
    analysis_empty: "Henüz analiz yok".to_string(),

    feed_heading: "Sinyaller".to_string(),
    feed_empty: "Henüz sinyal yok".to_string(),
    feed_received: "Bu oturumda alınan".to_string(),
    col_time: "Saat".to_string(),
    col_symbol: "Sembol".to_string(),
    col_side: "Yön".to_string(),
    col_regime: "Rejim".to_string(),
    col_entry: "Giriş".to_string(),
    col_sl: "SL".to_string(),
    col_tp1: "TP1".to_string(),
    col_tp2: "TP2".to_string(),
    col_tp3: "TP3".to_string(),
    col_score: "Skor".to_string(),
    col_rr: "R:R".to_string(),
    col_reason: "Neden".to_string(),

    value_missing: "-".to_string(),
});
