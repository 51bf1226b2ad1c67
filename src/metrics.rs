use std::sync::LazyLock;

use prometheus::*;

static METRIC_VERIFY_COUNT: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "fg_verify_count",
        "count of login photo verifications",
        &["result"]
    )
    .unwrap()
});

static METRIC_VERIFY_SIMILARITY: LazyLock<Histogram> = LazyLock::new(|| {
    register_histogram!(
        "fg_verify_similarity",
        "similarity score of the login photo verification",
        (5..=100).step_by(5).map(|x| x as f64).collect()
    )
    .unwrap()
});

/// 记录一次校验结果，result 取 pass/fail/error
pub fn inc_verify(result: &str) {
    METRIC_VERIFY_COUNT.with_label_values(&[result]).inc();
}

/// 记录一次相似度得分
pub fn observe_similarity(score: f64) {
    METRIC_VERIFY_SIMILARITY.observe(score);
}

/// 以 prometheus 文本格式导出全部指标，供 /metrics 抓取
pub fn export() -> prometheus::Result<String> {
    TextEncoder::new().encode_to_string(&gather())
}
