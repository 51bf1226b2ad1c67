use std::fmt;
use std::io;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage, imageops};

/// 归一化画布的边长
pub const CANONICAL_SIZE: u32 = 256;
/// 单通道差值容差，差值严格小于该值才算相似
pub const PIXEL_TOLERANCE: i16 = 50;
/// 判定通过的最低相似度（百分比），达到即通过
pub const MATCH_THRESHOLD: f64 = 10.0;
/// 注册时参考照片的 JPEG 重编码质量
pub const JPEG_QUALITY: u8 = 95;

/// 比对管线内部的错误分类
///
/// 归一化和打分对合法输入是全函数，所以只有两类错误。
#[derive(Debug)]
pub enum CompareError {
    /// base64 或图片字节无法解码
    Decode(String),
    /// 参考照片无法读取
    Storage(io::Error),
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(msg) => write!(f, "无法解码图片: {}", msg),
            Self::Storage(e) => write!(f, "无法读取参考照片: {}", e),
        }
    }
}

impl std::error::Error for CompareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(_) => None,
            Self::Storage(e) => Some(e),
        }
    }
}

/// 解码 data URL 形式的抓拍，如 `data:image/jpeg;base64,<payload>`
///
/// 只按第一个逗号切分，逗号前的头部内容不做检查；没有逗号视为非法输入。
pub fn decode_data_url(data: &str) -> Result<DynamicImage, CompareError> {
    let (_, payload) = data
        .split_once(',')
        .ok_or_else(|| CompareError::Decode("data URL 中没有逗号分隔符".to_string()))?;
    let bytes = STANDARD.decode(payload).map_err(|e| CompareError::Decode(e.to_string()))?;
    decode_bytes(&bytes)
}

/// 解码存储中的原始图片字节，格式由字节头自动识别
pub fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage, CompareError> {
    image::load_from_memory(bytes).map_err(|e| CompareError::Decode(e.to_string()))
}

/// 归一化为 256x256 的 RGB 画布
///
/// 任意尺寸、任意颜色模型（含 alpha、灰度、调色板）都被统一到同一形状，
/// 直接拉伸，不保留宽高比。拉伸产生的形变是评分语义的一部分，不是缺陷。
pub fn normalize(image: &DynamicImage) -> RgbImage {
    imageops::resize(&image.to_rgb8(), CANONICAL_SIZE, CANONICAL_SIZE, FilterType::Triangle)
}

/// 计算两张归一化图片的相似度百分比，范围 [0, 100]
///
/// 逐通道统计差值小于容差的位置占比。这是整图级别的粗粒度启发式，
/// 只反映颜色和亮度分布的接近程度，完全不涉及人脸结构，
/// 同光照同背景下拍别人也可能通过。需要更强的比对时应该替换
/// 这一层，而不是调松调紧这里的参数。
pub fn similarity(a: &RgbImage, b: &RgbImage) -> f64 {
    debug_assert_eq!(a.dimensions(), b.dimensions());

    let similar = a
        .as_raw()
        .iter()
        .zip(b.as_raw().iter())
        .filter(|(x, y)| (**x as i16 - **y as i16).abs() < PIXEL_TOLERANCE)
        .count();

    similar as f64 / a.as_raw().len() as f64 * 100.0
}
