//! 在临时目录中构造最小的 Cityscapes 目录树, 端到端地检查加载器.

use city_berry::prelude::*;
use city_berry::{ParamsError, Result as BerryResult};
use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use log::{Log, Metadata, Record};
use ndarray::Array3;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const STEM: &str = "aachen_000000_000019";

/// 原始标签: 左半 road (7), 右上 car (26), 右下 void (0).
fn raw_label(w: u32, h: u32) -> GrayImage {
    GrayImage::from_fn(w, h, |x, y| {
        if x < w / 2 {
            Luma([7])
        } else if y < h / 2 {
            Luma([26])
        } else {
            Luma([0])
        }
    })
}

/// 在 `root` 下写入 `split/city` 的一对图像/标签, 返回图像路径.
fn write_pair(root: &Path, split: &str, city: &str, stem: &str, label: &GrayImage) -> PathBuf {
    let img_dir = root.join("leftImg8bit").join(split).join(city);
    let lbl_dir = root.join("gtFine").join(split).join(city);
    fs::create_dir_all(&img_dir).unwrap();
    fs::create_dir_all(&lbl_dir).unwrap();

    let (w, h) = label.dimensions();
    let img = RgbImage::from_fn(w, h, |x, y| Rgb([(x * 20) as u8, (y * 20) as u8, 90]));
    let img_path = img_dir.join(format!("{stem}_leftImg8bit.png"));
    img.save(&img_path).unwrap();
    label
        .save(lbl_dir.join(format!("{stem}_gtFine_labelIds.png")))
        .unwrap();
    img_path
}

fn single_pair_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_pair(dir.path(), "train", "aachen", STEM, &raw_label(8, 6));
    dir
}

fn label_file(root: &Path) -> PathBuf {
    root.join("gtFine/train/aachen")
        .join(format!("{STEM}_gtFine_labelIds.png"))
}

fn allowed(v: u8) -> bool {
    (v as usize) < CITYSCAPES_NUM_CLASSES || v == CITYSCAPES_IGNORE
}

#[test]
fn test_end_to_end_transformed() {
    let dir = single_pair_root();
    let config = LoaderConfig::new(4, 3).with_transform(true);
    let ds = CityscapesDataset::new(dir.path(), "train", config, DatasetParams::cityscapes())
        .unwrap();
    assert_eq!(ds.len(), 1);

    let sample = ds.get(0).unwrap();
    let img = sample.image.as_chw().unwrap();
    assert_eq!(img.dim(), (3, 3, 4));
    assert!(img.iter().all(|&v| (0.0..=1.0).contains(&v)));

    assert_eq!(sample.label.shape(), (3, 4));
    assert!(sample.label.iter().copied().all(allowed));

    let Auxiliary::Rgb(rgb) = &sample.aux else {
        panic!("expected color decoded output");
    };
    assert_eq!(rgb.dim(), (3, 4, 3));
    // road = [128, 64, 128]
    assert_eq!(rgb[(0, 0, 0)], 128.0 / 255.0);
    assert_eq!(rgb[(0, 0, 1)], 64.0 / 255.0);
}

#[test]
fn test_end_to_end_raw_image() {
    let dir = single_pair_root();
    let ds = CityscapesDataset::new(
        dir.path(),
        "train",
        LoaderConfig::new(4, 3),
        DatasetParams::cityscapes(),
    )
    .unwrap();

    let sample = ds.get(0).unwrap();
    let img = sample.image.as_hwc().unwrap();
    assert_eq!(img.dim(), (6, 8, 3));
    assert_eq!(img[(2, 3, 0)], 60);
    assert_eq!(img[(2, 3, 1)], 40);
    assert_eq!(img[(2, 3, 2)], 90);

    let label = &sample.label;
    assert_eq!(label.shape(), (6, 8));
    assert_eq!(label[(0, 0)], 0); // road
    assert_eq!(label[(0, 7)], 13); // car
    assert_eq!(label[(5, 7)], CITYSCAPES_IGNORE);
}

#[test]
fn test_class_presence_variant() {
    let dir = single_pair_root();
    let config = LoaderConfig::new(4, 3)
        .with_transform(true)
        .with_variant(OutputVariant::ClassPresence);
    let ds = CityscapesDataset::new(dir.path(), "train", config, DatasetParams::cityscapes())
        .unwrap();

    let Auxiliary::Presence(p) = ds.get(0).unwrap().aux else {
        panic!("expected class presence output");
    };
    assert_eq!(p.len(), CITYSCAPES_NUM_CLASSES);
    assert_eq!(p[0], 1.0);
    assert_eq!(p[13], 1.0);
    assert_eq!(p.sum(), 2.0);
}

#[test]
fn test_empty_splits() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("leftImg8bit").join("val")).unwrap();
    for split in ["train", "val", "test"] {
        let err = CityscapesDataset::new(
            dir.path(),
            split,
            LoaderConfig::default(),
            DatasetParams::cityscapes(),
        )
        .unwrap_err();
        match err {
            DatasetError::NoData { split: s, path } => {
                assert_eq!(s, split);
                assert!(path.ends_with(Path::new("leftImg8bit").join(split)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn test_index_out_of_range() {
    let dir = single_pair_root();
    let ds = CityscapesDataset::new(
        dir.path(),
        "train",
        LoaderConfig::default(),
        DatasetParams::cityscapes(),
    )
    .unwrap();
    assert!(matches!(
        ds.get(1),
        Err(DatasetError::IndexOutOfRange { index: 1, len: 1 })
    ));
}

#[test]
fn test_missing_label_file() {
    let dir = single_pair_root();
    fs::remove_file(label_file(dir.path())).unwrap();
    let ds = CityscapesDataset::new(
        dir.path(),
        "train",
        LoaderConfig::default(),
        DatasetParams::cityscapes(),
    )
    .unwrap();
    assert!(matches!(ds.get(0), Err(DatasetError::Io { .. })));
}

#[test]
fn test_unmapped_code_fails_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let mut label = raw_label(4, 4);
    label.put_pixel(1, 1, Luma([40]));
    write_pair(dir.path(), "val", "bonn", STEM, &label);

    let ds = CityscapesDataset::new(
        dir.path(),
        "val",
        LoaderConfig::default(),
        DatasetParams::cityscapes(),
    )
    .unwrap();
    assert!(matches!(
        ds.get(0),
        Err(DatasetError::UnmappedCode { code: 40, .. })
    ));
}

#[test]
fn test_label_must_be_gray8() {
    let dir = single_pair_root();
    let ds = CityscapesDataset::new(
        dir.path(),
        "train",
        LoaderConfig::default(),
        DatasetParams::cityscapes(),
    )
    .unwrap();

    // 16-bit 的 road (7) 若被降采样为 8-bit 会变成 void.
    ImageBuffer::<Luma<u16>, Vec<u16>>::from_pixel(8, 6, Luma([7]))
        .save(label_file(dir.path()))
        .unwrap();
    assert!(matches!(
        ds.get(0),
        Err(DatasetError::LabelFormat {
            color: image::ColorType::L16,
            ..
        })
    ));

    RgbImage::from_pixel(8, 6, Rgb([7, 7, 7]))
        .save(label_file(dir.path()))
        .unwrap();
    match ds.get(0) {
        Err(DatasetError::LabelFormat { path, color }) => {
            assert_eq!(path, label_file(dir.path()));
            assert_eq!(color, image::ColorType::Rgb8);
        }
        other => panic!("unexpected result: {:?}", other.map(|s| s.label.shape())),
    }
}

#[test]
fn test_zero_target_rejected() {
    let dir = single_pair_root();
    for (w, h) in [(0, 0), (0, 3), (4, 0)] {
        let config = LoaderConfig::new(w, h).with_transform(true);
        let err = CityscapesDataset::new(dir.path(), "train", config, DatasetParams::cityscapes())
            .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::InvalidTarget { width, height } if (width, height) == (w, h)
        ));
    }

    // 不做变换时目标分辨率不参与加载.
    let ds = CityscapesDataset::new(
        dir.path(),
        "train",
        LoaderConfig::new(0, 0),
        DatasetParams::cityscapes(),
    )
    .unwrap();
    assert_eq!(ds.get(0).unwrap().label.shape(), (6, 8));
}

#[test]
fn test_shape_mismatch() {
    let dir = single_pair_root();
    raw_label(5, 5).save(label_file(dir.path())).unwrap();
    let ds = CityscapesDataset::new(
        dir.path(),
        "train",
        LoaderConfig::default(),
        DatasetParams::cityscapes(),
    )
    .unwrap();
    assert!(matches!(
        ds.get(0),
        Err(DatasetError::ShapeMismatch {
            image: (6, 8),
            label: (5, 5)
        })
    ));
}

#[test]
fn test_invalid_params_rejected() {
    let dir = single_pair_root();
    let mut params = DatasetParams::cityscapes();
    params.void_classes.retain(|&c| c != 30);
    let err = CityscapesDataset::new(dir.path(), "train", LoaderConfig::default(), params)
        .unwrap_err();
    assert!(matches!(
        err,
        DatasetError::InvalidParams(ParamsError::UncoveredCode(30))
    ));
}

#[test]
fn test_records_iter_and_summary() {
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init();

    let dir = tempfile::tempdir().unwrap();
    write_pair(dir.path(), "train", "bremen", "bremen_000001_000019", &raw_label(4, 2));
    write_pair(dir.path(), "train", "aachen", STEM, &raw_label(4, 2));

    let ds = CityscapesDataset::new(
        dir.path(),
        "train",
        LoaderConfig::default(),
        DatasetParams::cityscapes(),
    )
    .unwrap();

    let records = ds.records();
    assert_eq!(records.len(), 2);
    assert!(records[0].image.ends_with(format!("aachen/{STEM}_leftImg8bit.png")));
    assert!(records[0]
        .label
        .ends_with(format!("gtFine/train/aachen/{STEM}_gtFine_labelIds.png")));
    assert!(records[1].image.starts_with(dir.path().join("leftImg8bit/train/bremen")));

    let it = ds.iter();
    assert_eq!(it.len(), 2);
    let all: Vec<(usize, BerryResult<Sample>)> = it.collect();
    assert_eq!(all.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![0, 1]);
    assert!(all.iter().all(|(_, r)| r.is_ok()));

    let summary = ds.to_string();
    assert!(summary.starts_with("Dataset loader for Cityscapes train split with 2 images in"));
    assert!(summary.contains("leftImg8bit"));

    let image = &records[1].image;
    assert_eq!(ds.label_path_for(image).unwrap(), records[1].label);
}

#[test]
fn test_decode_labels_batch() {
    let dir = single_pair_root();
    let ds = CityscapesDataset::new(
        dir.path(),
        "train",
        LoaderConfig::default(),
        DatasetParams::cityscapes(),
    )
    .unwrap();

    let labels = Array3::<u8>::from_elem((2, 3, 3), 10);
    let rgb = ds.decode_labels_batch(labels.view());
    assert_eq!(rgb.dim(), (2, 3, 3, 3));
    // sky = [0, 130, 180]
    assert!(rgb.outer_iter().all(|img| img == ds.decode_labels(&LabelMap::filled((3, 3), 10))));
    assert_eq!(rgb[(1, 2, 2, 1)], 130.0 / 255.0);
}

/// 记录所有日志的 logger.
struct Capture(Mutex<Vec<String>>);

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.0
            .lock()
            .unwrap()
            .push(format!("{} {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}

#[test]
fn test_injected_logger() {
    let capture = capture();
    let dir = single_pair_root();
    let ds = CityscapesDataset::open(
        dir.path(),
        "train",
        LoaderConfig::default(),
        DatasetParams::cityscapes(),
        Layout::cityscapes(),
        capture,
    )
    .unwrap();
    ds.get(0).unwrap();

    let lines = capture.0.lock().unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("DEBUG Found 1 images in split train on"));
    assert!(lines[1].starts_with("TRACE Loading image"));
}

fn capture() -> &'static Capture {
    Box::leak(Box::new(Capture(Mutex::new(Vec::new()))))
}

#[test]
fn test_with_logger() {
    let capture = capture();
    let dir = single_pair_root();
    let ds = CityscapesDataset::new(
        dir.path(),
        "train",
        LoaderConfig::default(),
        DatasetParams::cityscapes(),
    )
    .unwrap()
    .with_logger(capture);
    ds.get(0).unwrap();

    let lines = capture.0.lock().unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("TRACE Loading image"));
}

#[test]
fn test_short_file_name_skipped() {
    let capture = capture();
    let dir = single_pair_root();
    let stray = dir.path().join("leftImg8bit/train/aachen/x.png");
    fs::write(&stray, b"").unwrap();

    let ds = CityscapesDataset::open(
        dir.path(),
        "train",
        LoaderConfig::default(),
        DatasetParams::cityscapes(),
        Layout::cityscapes(),
        capture,
    )
    .unwrap();
    assert_eq!(ds.len(), 1);
    assert!(ds.records()[0].image.ends_with(format!("{STEM}_leftImg8bit.png")));

    let lines = capture.0.lock().unwrap();
    assert!(lines
        .iter()
        .any(|l| l.starts_with("WARN Skipping") && l.contains("x.png")));

    fs::remove_file(&ds.records()[0].image).unwrap();
    let err = CityscapesDataset::new(
        dir.path(),
        "train",
        LoaderConfig::default(),
        DatasetParams::cityscapes(),
    )
    .unwrap_err();
    assert!(matches!(err, DatasetError::NoData { .. }));
}
