//! 对 `city-berry::dataset` 的更一层封装. 提供更直接的数据集加载器.

use city_berry::dataset::{self, CityscapesDataset, LoaderConfig};
use city_berry::{DatasetParams, Result};
use std::env;
use std::path::{Path, PathBuf};

/// 指定数据集根目录的环境变量.
pub const ROOT_ENV: &str = "CITYSCAPES_DIR";

/// 获取 Cityscapes 数据集根目录.
///
/// 1. 若环境变量 `$CITYSCAPES_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/cityscapes`. 无法确定主目录时返回 `None`.
pub fn root_dir_from_env_or_home() -> Option<PathBuf> {
    match env::var(ROOT_ENV) {
        Ok(d) if !d.is_empty() => Some(PathBuf::from(d)),
        _ => dataset::home_dataset_dir_with(["cityscapes"]),
    }
}

/// 以 Cityscapes 默认参数打开 `root` 下的 `split` 划分.
pub fn open_split<P: AsRef<Path>>(
    root: P,
    split: &str,
    config: LoaderConfig,
) -> Result<CityscapesDataset> {
    CityscapesDataset::new(root, split, config, DatasetParams::cityscapes())
}
