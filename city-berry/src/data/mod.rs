//! 标签与图像张量的基础数据结构及逐样本变换.
//!
//! 这里的所有操作都是纯函数式的单样本变换, 不涉及文件遍历.

mod decode;
mod label;
mod remap;
mod save;
mod transform;

pub use decode::ColorTable;
pub use label::LabelMap;
pub use remap::{class_presence, LabelEncoder};
pub use save::{ImgWriteRaw, ImgWriteVis, PaintedLabel};
pub use transform::{ChannelOrder, ImageTensor, Transform};
