//! 数据集参数包.

use crate::consts::{self, color, raw};
use crate::error::ParamsError;
use itertools::Itertools;

/// 数据集参数包, 描述原始类别编码到训练索引的映射及可视化颜色.
///
/// 该结构本身只承载数据. 构造数据集时会调用 [`DatasetParams::validate`]
/// 检查其一致性, 通过校验的参数包在数据集生命周期内只读.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatasetParams {
    /// 有效原始编码. 位置即训练索引.
    pub valid_classes: Vec<u8>,

    /// 被忽略的原始编码, 重映射后统一为 `ignore_index`.
    pub void_classes: Vec<u8>,

    /// 每个训练索引的 RGB 颜色.
    pub colors: Vec<[u8; 3]>,

    /// 训练类别数.
    pub num_classes: usize,

    /// 忽略哨兵值. 必须不小于 `num_classes`.
    pub ignore_index: u8,

    /// 原始编码空间为 `0..=max_raw_code`.
    pub max_raw_code: u8,

    /// 解码可视化时哨兵像素的颜色. `None` 时哨兵像素保留 `value / 255`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ignore_color: Option<[u8; 3]>,
}

impl DatasetParams {
    /// Cityscapes 19 类训练配置.
    pub fn cityscapes() -> Self {
        Self {
            valid_classes: raw::CITYSCAPES_VALID.to_vec(),
            void_classes: raw::CITYSCAPES_VOID.to_vec(),
            colors: color::CITYSCAPES_COLORS.to_vec(),
            num_classes: consts::CITYSCAPES_NUM_CLASSES,
            ignore_index: raw::CITYSCAPES_IGNORE,
            max_raw_code: raw::CITYSCAPES_MAX_RAW,
            ignore_color: None,
        }
    }

    /// 设置哨兵像素的可视化颜色.
    #[inline]
    pub fn with_ignore_color(mut self, rgb: [u8; 3]) -> Self {
        self.ignore_color = Some(rgb);
        self
    }

    /// 检查参数包的一致性:
    ///
    /// 1. 有效编码个数、颜色个数均等于 `num_classes`;
    /// 2. 所有编码不超过 `max_raw_code`, 且不重复 (有效与忽略集合不相交);
    /// 3. 有效与忽略编码恰好覆盖 `0..=max_raw_code`;
    /// 4. `ignore_index` 不落在 `0..num_classes` 内.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.valid_classes.len() != self.num_classes {
            return Err(ParamsError::ValidClassCount(
                self.valid_classes.len(),
                self.num_classes,
            ));
        }
        if self.colors.len() != self.num_classes {
            return Err(ParamsError::ColorCount(self.colors.len(), self.num_classes));
        }
        if (self.ignore_index as usize) < self.num_classes {
            return Err(ParamsError::IgnoreCollides(
                self.ignore_index,
                self.num_classes,
            ));
        }

        let all_codes = || self.valid_classes.iter().chain(self.void_classes.iter());

        if let Some(&code) = all_codes().find(|&&c| c > self.max_raw_code) {
            return Err(ParamsError::CodeOutOfSpace(code, self.max_raw_code));
        }
        if let Some(&code) = all_codes().duplicates().next() {
            return Err(ParamsError::DuplicateCode(code));
        }

        // 无重复且不越界时, 总数相等即覆盖完整.
        let mut covered = [false; 256];
        all_codes().for_each(|&c| covered[c as usize] = true);
        match (0..=self.max_raw_code).find(|&c| !covered[c as usize]) {
            Some(code) => Err(ParamsError::UncoveredCode(code)),
            None => Ok(()),
        }
    }

    /// 训练索引 `index` 对应的颜色. 越界时返回 `None`.
    #[inline]
    pub fn color_of(&self, index: usize) -> Option<[u8; 3]> {
        self.colors.get(index).copied()
    }
}

impl Default for DatasetParams {
    #[inline]
    fn default() -> Self {
        Self::cityscapes()
    }
}
