//! 统计结果.

use city_berry::consts::CITYSCAPES_CLASS_NAMES;
use city_berry::{DatasetError, LabelMap};
use itertools::izip;
use ndarray::Array1;
use std::io::{self, Write};

/// 一个划分上各类别的像素数与出现图像数.
#[derive(Clone, Debug)]
pub struct FreqTable {
    pixels: Vec<u64>,
    images: Vec<u64>,
    ignored: u64,
    total: u64,
    samples: u64,
    failed: Vec<(usize, String)>,
}

impl FreqTable {
    pub fn new(num_classes: usize) -> Self {
        Self {
            pixels: vec![0; num_classes],
            images: vec![0; num_classes],
            ignored: 0,
            total: 0,
            samples: 0,
            failed: Vec::new(),
        }
    }

    /// 累加一张重映射后的标签及其类别出现向量. 不小于类别数的像素都计为忽略像素.
    pub fn add(&mut self, label: &LabelMap, presence: &Array1<f32>) {
        for &v in label.iter() {
            match self.pixels.get_mut(v as usize) {
                Some(c) => *c += 1,
                None => self.ignored += 1,
            }
        }
        for (img, &p) in izip!(&mut self.images, presence) {
            *img += u64::from(p > 0.0);
        }
        self.total += label.size() as u64;
        self.samples += 1;
    }

    /// 记录一个加载失败的样本.
    pub fn fail(&mut self, index: usize, err: DatasetError) {
        self.failed.push((index, err.to_string()));
    }

    /// 合并两个统计结果.
    pub fn merge(mut self, other: Self) -> Self {
        for (a, b) in self.pixels.iter_mut().zip(other.pixels) {
            *a += b;
        }
        for (a, b) in self.images.iter_mut().zip(other.images) {
            *a += b;
        }
        self.ignored += other.ignored;
        self.total += other.total;
        self.samples += other.samples;
        self.failed.extend(other.failed);
        self.failed.sort_unstable_by_key(|(i, _)| *i);
        self
    }

    /// 将统计结果写进 `w` 中.
    pub fn describe_into<W: Write>(&self, w: &mut W) -> io::Result<()> {
        const S4: &str = "    ";

        let ratio = |n: u64| {
            if self.total == 0 {
                0.0
            } else {
                n as f64 / self.total as f64
            }
        };

        writeln!(w, "Samples: {}", self.samples)?;
        writeln!(w, "Pixels: {}", self.total)?;
        writeln!(
            w,
            "Ignored pixels: {} ({:.4})",
            self.ignored,
            ratio(self.ignored)
        )?;
        for (i, (&px, &img)) in self.pixels.iter().zip(self.images.iter()).enumerate() {
            let name = CITYSCAPES_CLASS_NAMES.get(i).copied().unwrap_or("?");
            writeln!(
                w,
                "{S4}{i:>2} {name:<14} pixels {px:>12} ({:.4}), images {img}",
                ratio(px)
            )?;
        }
        for (i, e) in self.failed.iter() {
            writeln!(w, "{S4}sample {i} failed: {e}")?;
        }
        Ok(())
    }

    pub fn pixels(&self) -> &[u64] {
        &self.pixels
    }

    pub fn images(&self) -> &[u64] {
        &self.images
    }

    pub fn ignored(&self) -> u64 {
        self.ignored
    }

    pub fn failed(&self) -> &[(usize, String)] {
        &self.failed
    }
}
