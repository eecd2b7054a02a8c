//! 运行时错误.

use std::path::PathBuf;
use thiserror::Error;

/// 数据集参数包 ([`crate::DatasetParams`]) 校验错误.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    /// 有效类别个数与声明的类别数不一致.
    ///
    /// 第一个参数为有效类别个数, 第二个参数为声明的类别数.
    #[error("expected {1} valid classes, got {0}")]
    ValidClassCount(usize, usize),

    /// 颜色个数与声明的类别数不一致.
    #[error("expected {1} colors, got {0}")]
    ColorCount(usize, usize),

    /// 同一原始编码被声明了多次 (可能同时出现在有效与忽略列表中).
    #[error("raw code `{0}` is declared more than once")]
    DuplicateCode(u8),

    /// 原始编码超出了声明的编码空间.
    #[error("raw code `{0}` exceeds max raw code `{1}`")]
    CodeOutOfSpace(u8, u8),

    /// 原始编码既不是有效类别, 也不是忽略类别.
    #[error("raw code `{0}` is neither valid nor void")]
    UncoveredCode(u8),

    /// 哨兵值与合法训练索引冲突.
    #[error("ignore index `{0}` collides with class range 0..{1}")]
    IgnoreCollides(u8, usize),
}

/// 数据集加载运行时错误.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// 给定划分下没有找到任何图像.
    #[error("No files for the requested split {split} were found in {}", .path.display())]
    NoData {
        /// 划分名.
        split: String,
        /// 搜索的目录.
        path: PathBuf,
    },

    /// 索引越界.
    #[error("index {index} out of range for dataset of length {len}")]
    IndexOutOfRange {
        /// 请求的索引.
        index: usize,
        /// 数据集长度.
        len: usize,
    },

    /// 底层 I/O 错误.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// 出错文件.
        path: PathBuf,
        /// 底层错误.
        source: std::io::Error,
    },

    /// 图像解码或编码错误.
    #[error("image error on {}: {source}", .path.display())]
    Image {
        /// 出错文件.
        path: PathBuf,
        /// 底层错误.
        source: image::ImageError,
    },

    /// 遍历目录时出错.
    #[error("failed while traversing directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// 文件名不符合布局约定, 无法推导标签路径.
    #[error("malformed image file name: {}", .0.display())]
    MalformedName(PathBuf),

    /// 参数包不合法.
    #[error("invalid dataset params: {0}")]
    InvalidParams(#[from] ParamsError),

    /// 图像与标签的空间尺寸不一致. 参数依次为 (高, 宽).
    #[error("image shape {image:?} does not match label shape {label:?}")]
    ShapeMismatch {
        /// 图像形状.
        image: (usize, usize),
        /// 标签形状.
        label: (usize, usize),
    },

    /// 标签文件不是 8-bit 单通道灰度图, 无法无损读出原始编码.
    #[error("label {} must be 8-bit grayscale, got {color:?}", .path.display())]
    LabelFormat {
        /// 标签文件.
        path: PathBuf,
        /// 实际的像素格式.
        color: image::ColorType,
    },

    /// 启用变换时目标分辨率为零.
    #[error("invalid transform target {width}x{height}")]
    InvalidTarget {
        /// 目标宽度.
        width: u32,
        /// 目标高度.
        height: u32,
    },

    /// 标签中出现了编码空间以外的原始编码.
    #[error("raw code `{code}` in {} is not mapped", .path.display())]
    UnmappedCode {
        /// 原始编码.
        code: u8,
        /// 标签文件.
        path: PathBuf,
    },
}

/// 数据集加载结果.
pub type Result<T> = std::result::Result<T, DatasetError>;
