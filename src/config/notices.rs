//! User-facing notification texts. The backend speaks Turkish, so do we.

pub struct NoticeText {
    pub new_signal_prefix: &'static str,
    pub bot_started: &'static str,
    pub bot_stopped: &'static str,
    pub mode_changed_prefix: &'static str,
    pub analysis_ready_prefix: &'static str,
    pub stats_refreshed: &'static str,
    pub empty_symbol: &'static str,
    pub request_failed_prefix: &'static str,
    pub network_error_prefix: &'static str,
}

pub const NOTICES: NoticeText = NoticeText {
    new_signal_prefix: "Yeni sinyal:",
    bot_started: "Bot başlatıldı",
    bot_stopped: "Bot durduruldu",
    mode_changed_prefix: "Mod değiştirildi:",
    analysis_ready_prefix: "Analiz hazır:",
    stats_refreshed: "İstatistikler güncellendi",
    empty_symbol: "Lütfen bir sembol girin",
    request_failed_prefix: "İstek başarısız",
    network_error_prefix: "Bağlantı hatası",
};
