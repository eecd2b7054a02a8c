//! 通用常量.

/// Cityscapes 原始标签 (`*_gtFine_labelIds.png`) 相关的像素值.
pub mod raw {
    /// 参与训练的原始类别编码. 其在数组中的位置即为训练索引.
    pub const CITYSCAPES_VALID: [u8; 19] = [
        7, 8, 11, 12, 13, 17, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 31, 32, 33,
    ];

    /// 被忽略 (void) 的原始类别编码.
    pub const CITYSCAPES_VOID: [u8; 15] = [0, 1, 2, 3, 4, 5, 6, 9, 10, 14, 15, 16, 18, 29, 30];

    /// 原始类别编码的最大值. 编码空间为 `0..=CITYSCAPES_MAX_RAW`.
    pub const CITYSCAPES_MAX_RAW: u8 = 33;

    /// 忽略像素在重映射后使用的哨兵值.
    pub const CITYSCAPES_IGNORE: u8 = 250;
}

/// RGB 颜色.
pub mod color {
    /// Cityscapes 19 个训练类别的可视化颜色, 与 `raw::CITYSCAPES_VALID` 一一对应.
    pub const CITYSCAPES_COLORS: [[u8; 3]; 19] = [
        [128, 64, 128],  // road
        [244, 35, 232],  // sidewalk
        [70, 70, 70],    // building
        [102, 102, 156], // wall
        [190, 153, 153], // fence
        [153, 153, 153], // pole
        [250, 170, 30],  // traffic light
        [220, 220, 0],   // traffic sign
        [107, 142, 35],  // vegetation
        [152, 251, 152], // terrain
        [0, 130, 180],   // sky
        [220, 20, 60],   // person
        [255, 0, 0],     // rider
        [0, 0, 142],     // car
        [0, 0, 70],      // truck
        [0, 60, 100],    // bus
        [0, 80, 100],    // train
        [0, 0, 230],     // motorcycle
        [119, 11, 32],   // bicycle
    ];

    /// 黑色.
    pub const BLACK: [u8; 3] = [0, 0, 0];
}

/// Cityscapes 训练类别数.
pub const CITYSCAPES_NUM_CLASSES: usize = 19;

/// Cityscapes 训练类别名, 与 `color::CITYSCAPES_COLORS` 一一对应.
pub const CITYSCAPES_CLASS_NAMES: [&str; CITYSCAPES_NUM_CLASSES] = [
    "road",
    "sidewalk",
    "building",
    "wall",
    "fence",
    "pole",
    "traffic light",
    "traffic sign",
    "vegetation",
    "terrain",
    "sky",
    "person",
    "rider",
    "car",
    "truck",
    "bus",
    "train",
    "motorcycle",
    "bicycle",
];

/// 数据集目录布局相关的字符串.
pub mod layout {
    /// 图像根目录名.
    pub const IMAGE_DIR: &str = "leftImg8bit";

    /// 标签根目录名.
    pub const LABEL_DIR: &str = "gtFine";

    /// 图像文件名后缀.
    pub const IMAGE_SUFFIX: &str = ".png";

    /// 图像文件名中需要被替换掉的尾部长度, 即 `leftImg8bit.png` 的长度.
    pub const STRIP_LEN: usize = 15;

    /// 标签文件名后缀.
    pub const LABEL_SUFFIX: &str = "gtFine_labelIds.png";
}

/// 数据集划分 (split) 名称.
pub mod split {
    /// 训练集.
    pub const TRAIN: &str = "train";

    /// 验证集.
    pub const VAL: &str = "val";

    /// 测试集.
    pub const TEST: &str = "test";
}
