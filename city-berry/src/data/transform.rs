//! 图像/标签的几何变换与归一化.

use super::LabelMap;
use crate::Idx2d;
use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::{Array3, Axis};

/// 图像张量的通道顺序.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelOrder {
    /// 与源文件相同.
    Rgb,

    /// 通道反转. 与以 BGR 顺序训练的模型兼容.
    #[default]
    Bgr,
}

impl ChannelOrder {
    /// 输出通道 `c` 所取的源通道.
    #[inline]
    pub const fn source_channel(self, c: usize) -> usize {
        match self {
            Self::Rgb => c,
            Self::Bgr => 2 - c,
        }
    }
}

/// 带有显式布局的图像张量.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageTensor {
    /// 未经变换的原始像素, (高, 宽, 通道), RGB 顺序.
    Hwc(Array3<u8>),

    /// 变换后的浮点张量, (通道, 高, 宽).
    Chw(Array3<f32>),
}

impl ImageTensor {
    /// 从 RGB 图像构造 [`ImageTensor::Hwc`].
    pub fn from_rgb(img: &RgbImage) -> Self {
        let (w, h) = img.dimensions();
        Self::Hwc(Array3::from_shape_fn(
            (h as usize, w as usize, 3),
            |(y, x, c)| img.get_pixel(x as u32, y as u32)[c],
        ))
    }

    /// 空间分辨率 (高, 宽).
    pub fn shape(&self) -> Idx2d {
        match self {
            Self::Hwc(a) => (a.len_of(Axis(0)), a.len_of(Axis(1))),
            Self::Chw(a) => (a.len_of(Axis(1)), a.len_of(Axis(2))),
        }
    }

    /// 通道数.
    pub fn channels(&self) -> usize {
        match self {
            Self::Hwc(a) => a.len_of(Axis(2)),
            Self::Chw(a) => a.len_of(Axis(0)),
        }
    }

    /// 若为浮点张量, 返回其引用.
    #[inline]
    pub fn as_chw(&self) -> Option<&Array3<f32>> {
        match self {
            Self::Chw(a) => Some(a),
            Self::Hwc(_) => None,
        }
    }

    /// 若为原始像素, 返回其引用.
    #[inline]
    pub fn as_hwc(&self) -> Option<&Array3<u8>> {
        match self {
            Self::Hwc(a) => Some(a),
            Self::Chw(_) => None,
        }
    }
}

/// 缩放 + 通道重排 + 归一化.
///
/// 图像按 `filter` 插值; 标签始终按最近邻插值, 且全程保持整数类型,
/// 因此不会产生原标签中不存在的像素值.
#[derive(Copy, Clone, Debug)]
pub struct Transform {
    width: u32,
    height: u32,
    filter: FilterType,
    channel_order: ChannelOrder,
    normalize: bool,
}

impl Transform {
    /// 初始化. `width` 和 `height` 为目标分辨率.
    #[inline]
    pub fn new(
        (width, height): (u32, u32),
        filter: FilterType,
        channel_order: ChannelOrder,
        normalize: bool,
    ) -> Self {
        Self {
            width,
            height,
            filter,
            channel_order,
            normalize,
        }
    }

    /// 目标分辨率 (宽, 高).
    #[inline]
    pub fn target(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 变换图像与标签. 二者各自独立缩放到目标分辨率.
    pub fn apply(&self, img: &RgbImage, label: &LabelMap) -> (ImageTensor, LabelMap) {
        let img = self.resize_image(img);
        (ImageTensor::Chw(self.to_chw(&img)), self.resize_label(label))
    }

    /// 按 `filter` 缩放图像.
    pub fn resize_image(&self, img: &RgbImage) -> RgbImage {
        imageops::resize(img, self.width, self.height, self.filter)
    }

    /// 最近邻缩放标签.
    pub fn resize_label(&self, label: &LabelMap) -> LabelMap {
        let gray = imageops::resize(
            &label.to_gray(),
            self.width,
            self.height,
            FilterType::Nearest,
        );
        LabelMap::from_gray(&gray)
    }

    /// (高, 宽, 通道) 的 8-bit 图像转为 (通道, 高, 宽) 的浮点张量,
    /// 同时按 `channel_order` 重排通道, 按 `normalize` 缩放到 `[0, 1]`.
    pub fn to_chw(&self, img: &RgbImage) -> Array3<f32> {
        let (w, h) = img.dimensions();
        let order = self.channel_order;
        Array3::from_shape_fn((3, h as usize, w as usize), |(c, y, x)| {
            let v = img.get_pixel(x as u32, y as u32)[order.source_channel(c)] as f32;
            if self.normalize {
                v / 255.0
            } else {
                v
            }
        })
    }
}
