//! 标签的持久化存储.

use super::{ColorTable, LabelMap};
use image::ImageResult;
use std::path::Path;

/// 表明一个可以通过 **可视化友好** 模式持久化存储的图像对象.
///
/// `ImgWriteVis` trait 的意图是, 图像将以 "可视化友好" 的方式保存,
/// 而不是 "as is" 的方式. 对于重映射后的标签, 这意味着每个训练索引被替换为
/// 颜色表中的 RGB 颜色.
pub trait ImgWriteVis {
    /// 按照一定的可视化规则将图片保存到 `path` 路径.
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()>;
}

/// 表明一个可以通过 **按原样** 模式持久化存储的图像对象.
///
/// 对于 [`LabelMap`], 像素值原样写入 8-bit 灰度图, 之后可以再次作为标签读入.
pub trait ImgWriteRaw {
    /// 按原样将图片保存到 `path` 路径.
    fn save_raw<P: AsRef<Path>>(&self, path: P) -> ImageResult<()>;
}

/// 与颜色表绑定的标签, 用于可视化保存.
pub struct PaintedLabel<'a> {
    label: &'a LabelMap,
    colors: &'a ColorTable,
}

impl ColorTable {
    /// 将 `label` 与当前颜色表绑定.
    #[inline]
    pub fn paint<'a>(&'a self, label: &'a LabelMap) -> PaintedLabel<'a> {
        PaintedLabel {
            label,
            colors: self,
        }
    }
}

/// 训练索引映射为颜色表中的颜色, 哨兵像素按 [`ColorTable::rgb8`] 规则处理.
impl ImgWriteVis for PaintedLabel<'_> {
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let (height, width) = self.label.shape();
        let mut buf = image::RgbImage::new(width as u32, height as u32);
        for ((h, w), &pix) in self.label.array_view().indexed_iter() {
            buf.put_pixel(w as u32, h as u32, image::Rgb(self.colors.rgb8(pix)));
        }
        buf.save(path)
    }
}

/// 按原样存储.
impl ImgWriteRaw for LabelMap {
    fn save_raw<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_gray().save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DatasetParams;
    use ndarray::array;

    #[test]
    fn test_save_raw_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label.png");
        let label = LabelMap::new(array![[0, 1, 250], [18, 2, 3]]);
        label.save_raw(&path).unwrap();

        let reloaded = LabelMap::from_gray(&image::open(&path).unwrap().into_luma8());
        assert_eq!(reloaded, label);
    }

    #[test]
    fn test_save_painted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vis.png");
        let table = ColorTable::new(&DatasetParams::cityscapes().with_ignore_color([0, 0, 0]));
        let label = LabelMap::new(array![[0, 250]]);
        table.paint(&label).save(&path).unwrap();

        let img = image::open(&path).unwrap().into_rgb8();
        assert_eq!(img.get_pixel(0, 0).0, [128, 64, 128]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0]);
    }
}
