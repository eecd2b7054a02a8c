//! 数据集目录布局约定.

use crate::consts::layout::*;
use crate::error::{DatasetError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 数据集目录布局.
///
/// 图像位于 `<root>/<image_dir>/<split>/**/*<image_suffix>`;
/// 标签位于 `<root>/<label_dir>/<split>/<父目录名>/<去掉尾部 strip_len 个字符的图像文件名><label_suffix>`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    /// 图像根目录名.
    pub image_dir: String,

    /// 标签根目录名.
    pub label_dir: String,

    /// 图像文件名后缀 (含扩展名).
    pub image_suffix: String,

    /// 推导标签文件名时, 从图像文件名尾部去掉的字符数.
    pub strip_len: usize,

    /// 标签文件名后缀 (含扩展名).
    pub label_suffix: String,
}

impl Default for Layout {
    #[inline]
    fn default() -> Self {
        Self::cityscapes()
    }
}

impl Layout {
    /// Cityscapes 精标注布局: `leftImg8bit/*_leftImg8bit.png` 对应
    /// `gtFine/*_gtFine_labelIds.png`.
    pub fn cityscapes() -> Self {
        Self {
            image_dir: IMAGE_DIR.to_string(),
            label_dir: LABEL_DIR.to_string(),
            image_suffix: IMAGE_SUFFIX.to_string(),
            strip_len: STRIP_LEN,
            label_suffix: LABEL_SUFFIX.to_string(),
        }
    }

    /// `<root>/<image_dir>/<split>`.
    pub fn images_base<P: AsRef<Path>>(&self, root: P, split: &str) -> PathBuf {
        let mut p = root.as_ref().to_owned();
        p.push(&self.image_dir);
        p.push(split);
        p
    }

    /// `<root>/<label_dir>/<split>`.
    pub fn labels_base<P: AsRef<Path>>(&self, root: P, split: &str) -> PathBuf {
        let mut p = root.as_ref().to_owned();
        p.push(&self.label_dir);
        p.push(split);
        p
    }

    /// 由图像路径推导标签路径.
    ///
    /// 图像父目录名 (城市名) 被保留, 文件名尾部 `strip_len` 个字符替换为 `label_suffix`.
    /// 图像没有父目录, 或文件名不足 `strip_len` 个字符时返回 [`DatasetError::MalformedName`].
    pub fn label_path_for<P: AsRef<Path>>(&self, labels_base: P, image: &Path) -> Result<PathBuf> {
        let malformed = || DatasetError::MalformedName(image.to_owned());

        let parent = image
            .parent()
            .and_then(Path::file_name)
            .ok_or_else(malformed)?;
        let name = image
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(malformed)?;
        let keep = name
            .chars()
            .count()
            .checked_sub(self.strip_len)
            .ok_or_else(malformed)?;

        let mut label_name: String = name.chars().take(keep).collect();
        label_name.push_str(&self.label_suffix);

        let mut p = labels_base.as_ref().to_owned();
        p.push(parent);
        p.push(label_name);
        Ok(p)
    }

    /// 递归列出 `images_base` 下所有以 `image_suffix` 结尾的文件, 按路径排序.
    ///
    /// `images_base` 本身可以是符号链接; 其下指向目录的符号链接不会进入,
    /// 指向文件的符号链接照常列出. `images_base` 不是目录时返回空列表.
    pub fn enumerate_images<P: AsRef<Path>>(&self, images_base: P) -> Result<Vec<PathBuf>> {
        let root = images_base.as_ref();
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            let matched = entry
                .file_name()
                .to_str()
                .is_some_and(|n| n.ends_with(&self.image_suffix));
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if is_file && matched {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}
