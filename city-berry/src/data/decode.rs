//! 训练索引到可视化颜色的解码.

use super::LabelMap;
use crate::DatasetParams;
use ndarray::{Array3, Array4, ArrayView2, ArrayView3, ArrayViewMut3, Axis, Zip};

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
    }
}

/// 训练索引到 RGB 颜色的查找表. 构造后只读.
#[derive(Clone, Debug)]
pub struct ColorTable {
    colors: Vec<[u8; 3]>,
    ignore_index: u8,
    ignore_color: Option<[u8; 3]>,
}

impl ColorTable {
    /// 由参数包构建颜色表. 训练索引 `i` 的颜色为 `params.colors[i]`.
    pub fn new(params: &DatasetParams) -> Self {
        Self {
            colors: params.colors.clone(),
            ignore_index: params.ignore_index,
            ignore_color: params.ignore_color,
        }
    }

    /// 类别个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// 颜色表是否为空.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// 训练索引 `index` 的颜色. 越界时返回 `None`.
    #[inline]
    pub fn color(&self, index: usize) -> Option<[u8; 3]> {
        self.colors.get(index).copied()
    }

    /// 像素值 `v` 对应的 8-bit 颜色.
    ///
    /// 非训练索引的像素: 若为哨兵且设置了 `ignore_color`, 使用该颜色;
    /// 否则三个通道都保留原值.
    #[inline]
    pub fn rgb8(&self, v: u8) -> [u8; 3] {
        match self.colors.get(v as usize) {
            Some(&c) => c,
            None => match self.ignore_color {
                Some(c) if v == self.ignore_index => c,
                _ => [v; 3],
            },
        }
    }

    /// 将单张标签解码为 (高, 宽, 3) 的 `[0, 1]` 浮点图像.
    pub fn decode(&self, label: &LabelMap) -> Array3<f32> {
        let (h, w) = label.shape();
        let mut rgb = Array3::<f32>::zeros((h, w, 3));
        self.decode_into(label.array_view(), rgb.view_mut());
        rgb
    }

    /// 将 (批大小, 高, 宽) 的标签批解码为 (批大小, 高, 宽, 3) 的浮点图像批.
    pub fn decode_batch(&self, labels: ArrayView3<u8>) -> Array4<f32> {
        let (n, h, w) = labels.dim();
        let mut rgb = Array4::<f32>::zeros((n, h, w, 3));
        for (label, out) in labels.outer_iter().zip(rgb.outer_iter_mut()) {
            self.decode_into(label, out);
        }
        rgb
    }

    /// 借助 `rayon`, 并行地按批内每张标签解码.
    #[cfg(feature = "rayon")]
    pub fn par_decode_batch(&self, labels: ArrayView3<u8>) -> Array4<f32> {
        let (n, h, w) = labels.dim();
        let mut rgb = Array4::<f32>::zeros((n, h, w, 3));
        labels
            .axis_iter(Axis(0))
            .into_par_iter()
            .zip(rgb.axis_iter_mut(Axis(0)).into_par_iter())
            .for_each(|(label, out)| self.decode_into(label, out));
        rgb
    }

    fn decode_into(&self, label: ArrayView2<u8>, mut out: ArrayViewMut3<f32>) {
        Zip::from(out.lanes_mut(Axis(2)))
            .and(label)
            .for_each(|mut px, &v| {
                let c = self.rgb8(v);
                px[0] = c[0] as f32 / 255.0;
                px[1] = c[1] as f32 / 255.0;
                px[2] = c[2] as f32 / 255.0;
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::raw::CITYSCAPES_IGNORE;
    use ndarray::{array, Array3 as A3};

    fn float_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_uniform_label_decodes_to_its_color() {
        let params = DatasetParams::cityscapes();
        let table = ColorTable::new(&params);
        for k in 0..table.len() {
            let rgb = table.decode(&LabelMap::filled((4, 5), k as u8));
            assert_eq!(rgb.dim(), (4, 5, 3));
            let c = params.colors[k];
            for px in rgb.lanes(Axis(2)) {
                for ch in 0..3 {
                    assert!(float_eq(px[ch], c[ch] as f32 / 255.0));
                }
            }
        }
    }

    #[test]
    fn test_ignore_pixels() {
        let label = LabelMap::new(array![[0, CITYSCAPES_IGNORE]]);

        let legacy = ColorTable::new(&DatasetParams::cityscapes()).decode(&label);
        let v = CITYSCAPES_IGNORE as f32 / 255.0;
        assert!((0..3).all(|ch| float_eq(legacy[(0, 1, ch)], v)));

        let params = DatasetParams::cityscapes().with_ignore_color([0, 0, 0]);
        let black = ColorTable::new(&params).decode(&label);
        assert!((0..3).all(|ch| black[(0, 1, ch)] == 0.0));
        assert!(float_eq(black[(0, 0, 0)], 128.0 / 255.0));
    }

    #[test]
    fn test_batch_matches_single() {
        let table = ColorTable::new(&DatasetParams::cityscapes());
        let labels: A3<u8> = A3::from_shape_fn((3, 2, 4), |(n, h, w)| ((n + h + w) % 19) as u8);
        let batch = table.decode_batch(labels.view());
        assert_eq!(batch.dim(), (3, 2, 4, 3));
        for (i, label) in labels.outer_iter().enumerate() {
            let single = table.decode(&LabelMap::new(label.to_owned()));
            assert_eq!(batch.index_axis(Axis(0), i), single);
        }
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_par_batch_matches_batch() {
        let table = ColorTable::new(&DatasetParams::cityscapes());
        let labels: A3<u8> = A3::from_shape_fn((5, 3, 3), |(n, h, w)| ((n * h + w) % 19) as u8);
        assert_eq!(
            table.par_decode_batch(labels.view()),
            table.decode_batch(labels.view())
        );
    }
}
