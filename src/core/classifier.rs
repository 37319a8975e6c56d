/// Fastとみなすレイテンシの上限(ms、この値を含まない)
pub const FAST_THRESHOLD_MS: f64 = 50.0;

/// Mediumとみなすレイテンシの上限(ms、この値を含まない)
pub const MEDIUM_THRESHOLD_MS: f64 = 150.0;

/// レイテンシの重大度
/// 宣言順がレイテンシの昇順に対応する
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Fast,
    Medium,
    Slow,
}

impl Severity {
    /// レイテンシ(ms)を重大度に分類する
    ///
    /// 各帯域は下限を含み上限を含まない。NaNはSlowとして扱う。
    pub fn classify(latency_ms: f64) -> Self {
        if latency_ms < FAST_THRESHOLD_MS {
            Severity::Fast
        } else if latency_ms < MEDIUM_THRESHOLD_MS {
            Severity::Medium
        } else {
            Severity::Slow
        }
    }
}
