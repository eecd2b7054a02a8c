#![warn(missing_docs)]

//! 核心库. 读取 Cityscapes 格式的语义分割图像/标签对, 将标签像素重映射到固定的训练类别集合,
//! 按需缩放与归一化, 并以 `ndarray` 张量的形式交给训练循环.
//!
//! 该 crate 只提供 `safe` 接口, 且不在内部开启任何线程: 多个 worker
//! 并行读取由外部训练框架负责, 加载器本身只保证 `&self` 可共享.
//!
//! # 注意
//!
//! 1. 目录布局严格遵循 Cityscapes 的命名约定, 见 [`dataset::Layout`].
//!   若新数据按照该模式组织, 也可以工作.
//! 2. 所有错误以 [`DatasetError`] 返回, 不会 panic.
//!
//! # 功能
//!
//! ### 文件枚举 ✅
//!
//! 递归列出 `<root>/leftImg8bit/<split>` 下的图像, 按文件名约定推导标签路径.
//!
//! 实现位于 `city-berry/src/dataset/layout.rs`.
//!
//! ### 标签重映射 ✅
//!
//! 原始编码 -> 连续训练索引, void 编码 -> 忽略哨兵值. 参数包在构造时校验,
//! 保证有效与忽略编码恰好划分整个原始编码空间.
//!
//! 实现位于 `city-berry/src/data/remap.rs`.
//!
//! ### 缩放与归一化 ✅
//!
//! 图像可配置插值, 标签强制最近邻且全程为整数. 通道顺序可配置.
//!
//! 实现位于 `city-berry/src/data/transform.rs`.
//!
//! ### 颜色解码 ✅
//!
//! 单张与批量解码, 开启 `rayon` feature 后提供并行批量解码.
//!
//! 实现位于 `city-berry/src/data/decode.rs`.
//!
//! ### 可视化保存 ✅
//!
//! 实现位于 `city-berry/src/data/save.rs`.

/// 二维索引 (高, 宽).
pub type Idx2d = (usize, usize);

/// 标签与图像张量.
mod data;

pub use data::{
    class_presence, ChannelOrder, ColorTable, ImageTensor, ImgWriteRaw, ImgWriteVis, LabelEncoder,
    LabelMap, PaintedLabel, Transform,
};

pub mod consts;
pub mod dataset;
mod error;
mod params;
pub mod prelude;

pub use error::{DatasetError, ParamsError, Result};
pub use params::DatasetParams;
