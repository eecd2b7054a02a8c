//! 原始类别编码到训练索引的重映射.

use super::LabelMap;
use crate::DatasetParams;
use ndarray::{Array1, Zip};

/// 原始编码查找表. 构造后只读.
///
/// 表中每一项对应一个 `u8` 原始编码, `None` 表示该编码未被参数包覆盖.
#[derive(Clone, Debug)]
pub struct LabelEncoder {
    lut: [Option<u8>; 256],
    ignore_index: u8,
}

impl LabelEncoder {
    /// 由参数包构建查找表. 忽略编码映射为哨兵值, 有效编码映射为其在列表中的位置.
    ///
    /// # 注意
    ///
    /// `params` 应当已经通过 [`DatasetParams::validate`]. 若有效编码与忽略编码有交集,
    /// 有效编码优先.
    pub fn new(params: &DatasetParams) -> Self {
        let mut lut = [None; 256];
        for &code in params.void_classes.iter() {
            lut[code as usize] = Some(params.ignore_index);
        }
        for (index, &code) in params.valid_classes.iter().enumerate() {
            lut[code as usize] = Some(index as u8);
        }
        Self {
            lut,
            ignore_index: params.ignore_index,
        }
    }

    /// 查询单个原始编码. 未覆盖的编码返回 `None`.
    #[inline]
    pub fn lookup(&self, code: u8) -> Option<u8> {
        self.lut[code as usize]
    }

    /// 忽略哨兵值.
    #[inline]
    pub fn ignore_index(&self) -> u8 {
        self.ignore_index
    }

    /// 将原始标签整体重映射为训练索引.
    ///
    /// 每个像素只按其 **原始** 值查表一次, 因此同一次调用内不会发生二次变换.
    /// 但对已经重映射过的标签再次调用仍会按原始编码解释, 调用方需自行避免.
    ///
    /// 遇到未覆盖的原始编码时返回 `Err`, 携带第一个这样的编码 (行优先).
    pub fn encode(&self, raw: &LabelMap) -> Result<LabelMap, u8> {
        if let Some(&code) = raw.iter().find(|&&c| self.lut[c as usize].is_none()) {
            return Err(code);
        }
        let data = raw
            .array_view()
            .mapv(|c| self.lut[c as usize].unwrap_or(c));
        Ok(LabelMap::new(data))
    }
}

/// 计算标签中出现过的训练类别, 以长度为 `num_classes` 的 0/1 向量表示.
///
/// 不小于 `num_classes` 的像素值 (包括哨兵值) 不计入.
pub fn class_presence(label: &LabelMap, num_classes: usize) -> Array1<f32> {
    let mut presence = Array1::<f32>::zeros(num_classes);
    Zip::from(&label.array_view()).for_each(|&v| {
        if let Some(slot) = presence.get_mut(v as usize) {
            *slot = 1.0;
        }
    });
    presence
}
