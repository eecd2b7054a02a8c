//! 程序运行函数.

use crate::result::FreqTable;
use city_berry::dataset::{Auxiliary, LoaderConfig, OutputVariant, Sample};
use city_berry::{class_presence, Result};
use std::path::Path;
use std::thread;
use utils::loader;

/// 实际运行. 样本按步长分给各线程, 每个线程独立调用 `get`.
pub fn run(root: &Path, split: &str) -> Result<FreqTable> {
    // 不做变换, 按原分辨率统计. 出现向量用于统计每类出现的图像数.
    let config = LoaderConfig::default().with_variant(OutputVariant::ClassPresence);
    let ds = loader::open_split(root, split, config)?;
    log::info!("{ds}");

    let num_classes = ds.params().num_classes;
    let workers = utils::cpus().clamp(1, ds.len());

    let tables = thread::scope(|s| {
        let ds = &ds;
        let handles: Vec<_> = (0..workers)
            .map(|k| {
                s.spawn(move || {
                    let mut table = FreqTable::new(num_classes);
                    for i in (k..ds.len()).step_by(workers) {
                        match ds.get(i) {
                            Ok(Sample { label, aux, .. }) => match aux {
                                Auxiliary::Presence(p) => table.add(&label, &p),
                                Auxiliary::Rgb(_) => {
                                    table.add(&label, &class_presence(&label, num_classes))
                                }
                            },
                            Err(e) => {
                                log::warn!("sample {i} failed: {e}");
                                table.fail(i, e);
                            }
                        }
                    }
                    table
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|th| th.join().expect("Thread joining error"))
            .collect::<Vec<_>>()
    });

    Ok(tables
        .into_iter()
        .fold(FreqTable::new(num_classes), FreqTable::merge))
}
