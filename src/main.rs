//! peak: 二元函数遗传算法寻优［命令行版］
//!
//! 用法：`peak sweep [config.yaml] [--seed N] [--output DIR]` 按配置进行参数扫描实验；
//! `peak single --parents 20 --generations 30 ...` 运行一次并逐代输出统计量。
//! 设置环境变量 `RUST_LOG=debug` 可以看到每一代的记录。

use clap::Parser;
use peak::experiments::{report_run, run_experiments};
use peak::interfaces::command_line::{read_config, Command, CommandLine, CommandLineArgs};
use peak::run::Run;
use peak::Error;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = CommandLineArgs::parse();
    match &args.command {
        Command::Sweep {
            config,
            seed,
            output,
        } => {
            let mut config = read_config(config)?;
            if seed.is_some() {
                config.seed = *seed;
            }
            let command_line = CommandLine::new(output.clone())?;
            command_line.save_config(&config)?;
            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let results = run_experiments(&config, &mut rng, &command_line)?;
            let runs: usize = results.iter().map(|(_, summaries)| summaries.len()).sum();
            if let Some(dir) = &command_line.output_dir {
                info!("共完成 {runs} 次运行，结果保存在 {} 中", dir.display());
            }
        }
        Command::Single { seed, .. } => {
            let parameters = args.command.parameters().ok_or("缺少控制参数")?;
            let run = match seed {
                Some(seed) => Run::with_seed(parameters, *seed)?,
                None => Run::from_entropy(parameters)?,
            };
            println!("{}", run.parameters());
            println!();
            report_run(&run, &CommandLine::console());
        }
    }
    Ok(())
}
