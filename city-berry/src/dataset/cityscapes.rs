//! Cityscapes 语义分割数据集加载器.
//!
//! 构造时一次性列出文件并建立查找表; 之后按索引随机访问, 每次访问只读写局部数据.

use super::{Layout, LoaderConfig, OutputVariant};
use crate::data::{class_presence, ColorTable, ImageTensor, LabelEncoder, LabelMap};
use crate::error::{DatasetError, Result};
use crate::DatasetParams;
use image::DynamicImage;
use log::{Level, Log};
use ndarray::{Array1, Array3, Array4, ArrayView3};
use std::fmt;
use std::path::{Path, PathBuf};

/// 通过注入的 logger 输出一条日志.
macro_rules! emit {
    ($logger: expr, $lvl: expr, $($arg: tt)+) => {{
        let logger: &dyn Log = $logger;
        let meta = log::Metadata::builder()
            .level($lvl)
            .target(module_path!())
            .build();
        if logger.enabled(&meta) {
            logger.log(
                &log::Record::builder()
                    .metadata(meta)
                    .args(format_args!($($arg)+))
                    .module_path_static(Some(module_path!()))
                    .file_static(Some(file!()))
                    .line(Some(line!()))
                    .build(),
            );
        }
    }};
}

/// 一个样本的文件路径对.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleRecord {
    /// 图像文件.
    pub image: PathBuf,

    /// 由图像路径推导出的标签文件.
    pub label: PathBuf,
}

/// 样本的第三项输出, 由 [`OutputVariant`] 决定.
#[derive(Clone, Debug, PartialEq)]
pub enum Auxiliary {
    /// 标签的 RGB 可视化, (高, 宽, 3), 取值 `[0, 1]`.
    Rgb(Array3<f32>),

    /// 类别出现向量, 长度为类别数, 取值 0 或 1.
    Presence(Array1<f32>),
}

/// 单个样本.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// 图像.
    pub image: ImageTensor,

    /// 重映射后的标签, 与 `image` 空间分辨率一致.
    pub label: LabelMap,

    /// 附加输出.
    pub aux: Auxiliary,
}

/// Cityscapes 数据集加载器.
///
/// 文件列表、编码查找表与颜色表在构造后只读, 因此 `&self` 可以在多个线程间共享,
/// 由外部的训练框架并行调用 [`CityscapesDataset::get`].
pub struct CityscapesDataset {
    split: String,
    config: LoaderConfig,
    params: DatasetParams,
    encoder: LabelEncoder,
    colors: ColorTable,
    layout: Layout,
    images_base: PathBuf,
    labels_base: PathBuf,
    records: Vec<SampleRecord>,
    logger: &'static dyn Log,
}

impl CityscapesDataset {
    /// 以 Cityscapes 默认布局和进程全局 logger 打开数据集.
    ///
    /// 见 [`CityscapesDataset::open`].
    pub fn new<P: AsRef<Path>>(
        root: P,
        split: &str,
        config: LoaderConfig,
        params: DatasetParams,
    ) -> Result<Self> {
        Self::open(root, split, config, params, Layout::cityscapes(), log::logger())
    }

    /// 打开数据集.
    ///
    /// 1. 校验 `params`, 不合法时返回 [`DatasetError::InvalidParams`];
    /// 2. 启用变换且目标分辨率有一维为零时返回 [`DatasetError::InvalidTarget`];
    /// 3. 递归列出 `<root>/<image_dir>/<split>` 下所有图像并推导标签路径,
    ///    文件名无法推导标签路径的图像记一条 `warn` 后跳过;
    /// 4. 一个图像都没有时返回 [`DatasetError::NoData`].
    ///
    /// 该过程只读取目录项, 不打开任何文件.
    pub fn open<P: AsRef<Path>>(
        root: P,
        split: &str,
        config: LoaderConfig,
        params: DatasetParams,
        layout: Layout,
        logger: &'static dyn Log,
    ) -> Result<Self> {
        params.validate()?;
        if config.transform && (config.width == 0 || config.height == 0) {
            return Err(DatasetError::InvalidTarget {
                width: config.width,
                height: config.height,
            });
        }

        let root = root.as_ref();
        let images_base = layout.images_base(root, split);
        let labels_base = layout.labels_base(root, split);

        let mut records = Vec::new();
        for image in layout.enumerate_images(&images_base)? {
            match layout.label_path_for(&labels_base, &image) {
                Ok(label) => records.push(SampleRecord { image, label }),
                Err(e) => emit!(logger, Level::Warn, "Skipping {}: {}", image.display(), e),
            }
        }

        if records.is_empty() {
            return Err(DatasetError::NoData {
                split: split.to_string(),
                path: images_base,
            });
        }

        emit!(
            logger,
            Level::Debug,
            "Found {} images in split {} on {}",
            records.len(),
            split,
            images_base.display()
        );

        Ok(Self {
            split: split.to_string(),
            config,
            encoder: LabelEncoder::new(&params),
            colors: ColorTable::new(&params),
            params,
            layout,
            images_base,
            labels_base,
            records,
            logger,
        })
    }

    /// 替换日志输出目标. 之后的日志都交给 `logger`, 不再经过进程全局 logger.
    #[inline]
    pub fn with_logger(mut self, logger: &'static dyn Log) -> Self {
        self.logger = logger;
        self
    }

    /// 样本个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 是否没有样本. 成功构造的数据集总是非空.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 划分名.
    #[inline]
    pub fn split(&self) -> &str {
        &self.split
    }

    /// 图像搜索目录.
    #[inline]
    pub fn images_base(&self) -> &Path {
        &self.images_base
    }

    /// 加载器配置.
    #[inline]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// 参数包.
    #[inline]
    pub fn params(&self) -> &DatasetParams {
        &self.params
    }

    /// 颜色表.
    #[inline]
    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    /// 按本数据集的布局, 由图像路径推导标签路径.
    #[inline]
    pub fn label_path_for(&self, image: &Path) -> Result<PathBuf> {
        self.layout.label_path_for(&self.labels_base, image)
    }

    /// 构造时冻结的全部文件路径对.
    #[inline]
    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    /// 获取第 `index` 个样本.
    ///
    /// 依次: 读取图像与标签, 重映射标签, (按需) 计算类别出现向量, (按需) 变换,
    /// 最后按 [`OutputVariant`] 组装输出. 任一步失败即返回 `Err`, 不做重试.
    pub fn get(&self, index: usize) -> Result<Sample> {
        let record = self
            .records
            .get(index)
            .ok_or(DatasetError::IndexOutOfRange {
                index,
                len: self.len(),
            })?;

        emit!(
            self.logger,
            Level::Trace,
            "Loading image {} with labels {}",
            record.image.display(),
            record.label.display()
        );

        let img = open_image(&record.image)?.into_rgb8();
        let raw = match open_image(&record.label)? {
            DynamicImage::ImageLuma8(buf) => LabelMap::from_gray(&buf),
            other => {
                return Err(DatasetError::LabelFormat {
                    path: record.label.clone(),
                    color: other.color(),
                })
            }
        };

        let (w, h) = img.dimensions();
        if (h as usize, w as usize) != raw.shape() {
            return Err(DatasetError::ShapeMismatch {
                image: (h as usize, w as usize),
                label: raw.shape(),
            });
        }

        let label = self.encode_labels(&raw, &record.label)?;

        let presence = match self.config.variant {
            OutputVariant::ClassPresence => Some(class_presence(&label, self.params.num_classes)),
            OutputVariant::ColorDecoded => None,
        };

        let (image, label) = if self.config.transform {
            self.config.as_transform().apply(&img, &label)
        } else {
            (ImageTensor::from_rgb(&img), label)
        };

        let aux = match presence {
            Some(p) => Auxiliary::Presence(p),
            None => Auxiliary::Rgb(self.colors.decode(&label)),
        };

        Ok(Sample { image, label, aux })
    }

    /// 按索引序迭代所有样本.
    #[inline]
    pub fn iter(&self) -> SampleIter<'_> {
        SampleIter {
            dataset: self,
            next: 0,
        }
    }

    /// 将原始标签重映射为训练索引. `path` 仅用于错误信息.
    pub fn encode_labels(&self, raw: &LabelMap, path: &Path) -> Result<LabelMap> {
        self.encoder
            .encode(raw)
            .map_err(|code| DatasetError::UnmappedCode {
                code,
                path: path.to_owned(),
            })
    }

    /// 将单张标签解码为 (高, 宽, 3) 的 RGB 可视化.
    #[inline]
    pub fn decode_labels(&self, label: &LabelMap) -> Array3<f32> {
        self.colors.decode(label)
    }

    /// 将 (批大小, 高, 宽) 的标签批解码为 (批大小, 高, 宽, 3) 的 RGB 可视化.
    #[inline]
    pub fn decode_labels_batch(&self, labels: ArrayView3<u8>) -> Array4<f32> {
        self.colors.decode_batch(labels)
    }

    /// 借助 `rayon` 的 [`CityscapesDataset::decode_labels_batch`].
    #[cfg(feature = "rayon")]
    #[inline]
    pub fn par_decode_labels_batch(&self, labels: ArrayView3<u8>) -> Array4<f32> {
        self.colors.par_decode_batch(labels)
    }
}

impl fmt::Display for CityscapesDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dataset loader for Cityscapes {} split with {} images in {}...",
            self.split,
            self.len(),
            self.images_base.display()
        )
    }
}

impl fmt::Debug for CityscapesDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CityscapesDataset")
            .field("split", &self.split)
            .field("len", &self.len())
            .field("images_base", &self.images_base)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> IntoIterator for &'a CityscapesDataset {
    type Item = (usize, Result<Sample>);
    type IntoIter = SampleIter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// 样本迭代器. 每项为 (索引, 加载结果).
#[derive(Debug)]
pub struct SampleIter<'a> {
    dataset: &'a CityscapesDataset,
    next: usize,
}

impl Iterator for SampleIter<'_> {
    type Item = (usize, Result<Sample>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next;
        if idx >= self.dataset.len() {
            return None;
        }
        self.next += 1;
        Some((idx, self.dataset.get(idx)))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len();
        (n, Some(n))
    }
}

impl ExactSizeIterator for SampleIter<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.dataset.len() - self.next
    }
}

/// 打开图像文件, 文件句柄在返回前释放.
fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| match source {
        image::ImageError::IoError(source) => DatasetError::Io {
            path: path.to_owned(),
            source,
        },
        source => DatasetError::Image {
            path: path.to_owned(),
            source,
        },
    })
}
