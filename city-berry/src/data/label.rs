use crate::Idx2d;
use image::GrayImage;
use ndarray::iter::Iter;
use ndarray::{Array2, ArrayView2, Ix2};
use std::collections::BTreeSet;
use std::ops::Index;

/// 单通道、owned 的二维语义分割标签.
///
/// 重映射之前, 像素为原始类别编码; 重映射之后, 像素为训练索引或忽略哨兵值.
/// 该结构不记录自己处于哪个阶段, 由调用方保证.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelMap {
    data: Array2<u8>,
}

impl Index<Idx2d> for LabelMap {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

impl From<Array2<u8>> for LabelMap {
    #[inline]
    fn from(data: Array2<u8>) -> Self {
        Self { data }
    }
}

impl LabelMap {
    /// 直接初始化.
    #[inline]
    pub fn new(data: Array2<u8>) -> Self {
        Self { data }
    }

    /// 创建形状为 (高, 宽), 像素全为 `value` 的标签.
    #[inline]
    pub fn filled((h, w): Idx2d, value: u8) -> Self {
        Self {
            data: Array2::from_elem((h, w), value),
        }
    }

    /// 从 8-bit 灰度图构造. 图像坐标 `(x, y)` 对应索引 `(y, x)`.
    pub fn from_gray(img: &GrayImage) -> Self {
        let (w, h) = img.dimensions();
        let data = Array2::from_shape_fn((h as usize, w as usize), |(y, x)| {
            img.get_pixel(x as u32, y as u32)[0]
        });
        Self { data }
    }

    /// 转换为 8-bit 灰度图, 像素按原样保留.
    pub fn to_gray(&self) -> GrayImage {
        let (h, w) = self.shape();
        GrayImage::from_fn(w as u32, h as u32, |x, y| {
            image::Luma([self.data[(y as usize, x as usize)]])
        })
    }

    /// 获得底层数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView2<'_, u8> {
        self.data.view()
    }

    /// 消费自我, 获得底层数据.
    #[inline]
    pub fn into_array(self) -> Array2<u8> {
        self.data
    }

    /// 获取可以迭代标签像素的迭代器.
    #[inline]
    pub fn iter(&self) -> Iter<'_, u8, Ix2> {
        self.data.iter()
    }

    /// 获取给定位置 (高, 宽) 的像素值. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx2d) -> Option<&u8> {
        self.data.get(pos)
    }

    /// 标签的分辨率 (高, 宽).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 标签的像素个数.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 统计标签中值为 `label` 的像素总个数.
    #[inline]
    pub fn count(&self, label: u8) -> usize {
        self.data.iter().filter(|&p| *p == label).count()
    }

    /// 标签中出现过的所有像素值, 升序.
    pub fn unique(&self) -> BTreeSet<u8> {
        self.data.iter().copied().collect()
    }

    /// 将标签中值为 `old` 的像素全部替换为 `new`.
    ///
    /// 返回总共成功替换的个数.
    pub fn replace(&mut self, old: u8, new: u8) -> usize {
        let mut cnt = 0usize;
        self.data
            .iter_mut()
            .filter(|pix| **pix == old)
            .for_each(|p| {
                cnt += 1;
                *p = new;
            });
        cnt
    }
}
