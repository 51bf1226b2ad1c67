use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use log::{debug, warn};

use crate::compare::{self, CompareError, JPEG_QUALITY, MATCH_THRESHOLD};
use crate::metrics;

/// 校验登录抓拍与参考照片是否匹配
///
/// 这是登录路径唯一的入口，严格 fail-closed：管线内任何错误
/// （载荷坏掉、参考照片读不到、字节解不出图）都不会向调用方传播，
/// 只记录日志并返回 false。调用方因此无法区分"照片不像"和
/// "解码失败"，这是有意保留的行为。需要得分和错误细节时用
/// [`try_verify`]。
pub async fn verify(reference: &Path, captured: &str) -> bool {
    match try_verify(reference, captured).await {
        Ok(score) => {
            debug!("相似度 {:.2}%，判定阈值 {}%", score, MATCH_THRESHOLD);
            metrics::observe_similarity(score);
            let pass = score >= MATCH_THRESHOLD;
            metrics::inc_verify(if pass { "pass" } else { "fail" });
            pass
        }
        Err(e) => {
            warn!("照片校验出错，按不通过处理: {}", e);
            metrics::inc_verify("error");
            false
        }
    }
}

/// 运行比对管线并返回相似度得分
///
/// 每次调用都重新读取并解码两张图片，不做任何缓存，
/// 对相同输入是纯函数，可以在任意 worker 上并发调用。
pub async fn try_verify(reference: &Path, captured: &str) -> Result<f64, CompareError> {
    let stored = tokio::fs::read(reference).await.map_err(CompareError::Storage)?;
    let reference = compare::normalize(&compare::decode_bytes(&stored)?);
    let captured = compare::normalize(&compare::decode_data_url(captured)?);
    Ok(compare::similarity(&reference, &captured))
}

/// 注册时保存参考照片
///
/// 解码 data URL，丢掉 alpha 转成 RGB，以 JPEG 质量 95 重编码落盘。
/// 参考照片在账号生命周期内只写这一次，之后只读。
pub fn save_reference(data_url: &str, path: &Path) -> Result<()> {
    let image = compare::decode_data_url(data_url)?;
    let rgb = image.to_rgb8();
    // 先在内存里编码完再整体落盘，写失败必须当场报出来，
    // 不能留下半截 JPEG 让之后的登录全部莫名失败
    let mut bytes = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY))
        .context("JPEG 编码失败")?;
    std::fs::write(path, bytes).with_context(|| format!("无法写入 {}", path.display()))?;
    Ok(())
}
