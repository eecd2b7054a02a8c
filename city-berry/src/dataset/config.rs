use crate::data::{ChannelOrder, Transform};
use image::imageops::FilterType;

/// 每个样本附带的第三项输出.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputVariant {
    /// 附带标签的 RGB 可视化 (高, 宽, 3).
    #[default]
    ColorDecoded,

    /// 附带长度为类别数的类别出现向量.
    ClassPresence,
}

/// 加载器配置.
#[derive(Copy, Clone, Debug)]
pub struct LoaderConfig {
    /// 目标宽度.
    pub width: u32,

    /// 目标高度.
    pub height: u32,

    /// 变换时是否将图像像素缩放到 `[0, 1]`.
    pub normalize: bool,

    /// 是否缩放并重排图像. 关闭时图像以原始 (高, 宽, 通道) 像素返回.
    pub transform: bool,

    /// 图像插值方式. 标签始终使用最近邻.
    pub filter: FilterType,

    /// 变换后图像的通道顺序.
    pub channel_order: ChannelOrder,

    /// 样本输出形式.
    pub variant: OutputVariant,
}

impl LoaderConfig {
    /// 以目标分辨率初始化, 其余取默认值: 归一化开启, 变换关闭, 双线性插值,
    /// BGR 通道顺序, 附带 RGB 可视化.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            normalize: true,
            transform: false,
            filter: FilterType::Triangle,
            channel_order: ChannelOrder::Bgr,
            variant: OutputVariant::ColorDecoded,
        }
    }

    /// 设置是否归一化.
    #[inline]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// 设置是否变换.
    #[inline]
    pub fn with_transform(mut self, transform: bool) -> Self {
        self.transform = transform;
        self
    }

    /// 设置图像插值方式.
    #[inline]
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// 设置通道顺序.
    #[inline]
    pub fn with_channel_order(mut self, order: ChannelOrder) -> Self {
        self.channel_order = order;
        self
    }

    /// 设置输出形式.
    #[inline]
    pub fn with_variant(mut self, variant: OutputVariant) -> Self {
        self.variant = variant;
        self
    }

    /// 由当前配置构造变换.
    #[inline]
    pub fn as_transform(&self) -> Transform {
        Transform::new(
            (self.width, self.height),
            self.filter,
            self.channel_order,
            self.normalize,
        )
    }
}

impl Default for LoaderConfig {
    /// Cityscapes 常用的 512 x 256 训练分辨率.
    #[inline]
    fn default() -> Self {
        Self::new(512, 256)
    }
}
