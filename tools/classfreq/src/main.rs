//! 统计 Cityscapes 某一划分中各训练类别的像素频率与出现图像数.
//!
//! 用法: `classfreq [split] [root]`. `split` 默认为 `train`;
//! `root` 默认取 `$CITYSCAPES_DIR`, 其次 `$HOME/dataset/cityscapes`.

mod result;
mod runner;

use city_berry::consts::split;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()
        .expect("logger already initialized");

    let mut args = std::env::args().skip(1);
    let split = args.next().unwrap_or_else(|| split::TRAIN.to_string());
    let Some(root) = args
        .next()
        .map(PathBuf::from)
        .or_else(utils::loader::root_dir_from_env_or_home)
    else {
        log::error!("Cannot locate dataset root, set ${}", utils::loader::ROOT_ENV);
        return ExitCode::FAILURE;
    };

    println!("Counting classes of split `{split}` in {}...", root.display());
    match runner::run(&root, &split) {
        Ok(table) => {
            utils::sep();
            let mut out = std::io::stdout().lock();
            if let Err(e) = table
                .describe_into(&mut out)
                .and_then(|_| utils::sep_to(&mut out))
            {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
