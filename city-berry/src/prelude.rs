//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::Idx2d;

pub use crate::data::{
    ChannelOrder, ColorTable, ImageTensor, ImgWriteRaw, ImgWriteVis, LabelMap, Transform,
};
pub use crate::{DatasetError, DatasetParams, Result};

pub use crate::consts::raw::{CITYSCAPES_IGNORE, CITYSCAPES_VALID, CITYSCAPES_VOID};
pub use crate::consts::{CITYSCAPES_CLASS_NAMES, CITYSCAPES_NUM_CLASSES};

pub use crate::dataset::home_dataset_dir_with;
pub use crate::dataset::{
    Auxiliary, CityscapesDataset, Layout, LoaderConfig, OutputVariant, Sample,
};
