use crate::config::{ExperimentConfig, Parameters};
use crate::interfaces::{Interface, Message};
use crate::Error;
use chrono::Local;
use clap::{Parser, Subcommand};
use csv::WriterBuilder;
use std::fs::{create_dir_all, read_to_string, write, OpenOptions};
use std::path::PathBuf;
use tracing::error;

/// 命令行参数的定义
#[derive(Parser, Clone)]
#[command(name = "二元函数遗传算法寻优")]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
pub struct CommandLineArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// 命令行中所有可用的子命令
#[derive(Subcommand, Clone)]
pub enum Command {
    /// 按实验配置依次改变各个控制参数，统计每次运行的收敛情况
    Sweep {
        /// 实验配置文件，不提供时使用内置的默认实验
        config: Option<PathBuf>,
        /// 随机数种子，覆盖配置文件中的设置
        #[arg(short, long)]
        seed: Option<u64>,
        /// 输出目录，默认为带时间戳的 output-* 目录
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// 以给定的控制参数运行一次，逐代输出统计量
    Single {
        #[arg(long, default_value_t = 60)]
        parents: usize,
        #[arg(long, default_value_t = 60)]
        children: usize,
        #[arg(long, default_value_t = 60)]
        generations: usize,
        #[arg(long, default_value_t = 0.5)]
        selection_rate: f64,
        #[arg(long, default_value_t = 0.1)]
        mutation_rate: f64,
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

impl Command {
    /// 单次运行的控制参数；对 Sweep 子命令返回 None
    pub fn parameters(&self) -> Option<Parameters> {
        match *self {
            Command::Single {
                parents,
                children,
                generations,
                selection_rate,
                mutation_rate,
                ..
            } => Some(Parameters {
                parents,
                children,
                generations,
                selection_rate,
                mutation_rate,
            }),
            Command::Sweep { .. } => None,
        }
    }
}

/// 读取实验配置，没有给出路径时使用默认配置
pub fn read_config(path: &Option<PathBuf>) -> Result<ExperimentConfig, Error> {
    match path {
        Some(path) => {
            let content = read_to_string(path)
                .map_err(|e| Error::from(format!("无法读取 {}：{e}", path.display())))?;
            ExperimentConfig::from_yaml(&content)
        }
        None => Ok(ExperimentConfig::default()),
    }
}

/// 通过命令行来使用的入口，实现了界面特征；结果表同时写入输出目录
pub struct CommandLine {
    pub output_dir: Option<PathBuf>,
}

impl CommandLine {
    /// 不写文件，只输出到终端
    pub fn console() -> Self {
        Self { output_dir: None }
    }

    pub fn new(maybe_output_dir: Option<PathBuf>) -> Result<Self, Error> {
        let output_dir = maybe_output_dir.unwrap_or_else(|| {
            let time = Local::now().format("%m-%d+%H_%M_%S").to_string();
            PathBuf::from(format!("output-{time}"))
        });
        create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir: Some(output_dir),
        })
    }

    pub fn save_config(&self, config: &ExperimentConfig) -> Result<(), Error> {
        if let Some(dir) = &self.output_dir {
            write(dir.join("config.yaml"), config.to_yaml()?)?;
        }
        Ok(())
    }

    fn table_path(&self, abbreviation: &str) -> Option<PathBuf> {
        self.output_dir
            .as_ref()
            .map(|dir| dir.join(format!("{abbreviation}.tsv")))
    }

    fn append_row(&self, abbreviation: &str, row: &[String], truncate: bool) -> Result<(), Error> {
        let Some(path) = self.table_path(abbreviation) else {
            return Ok(());
        };
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(!truncate)
            .truncate(truncate)
            .open(path)?;
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(file);
        writer.write_record(row)?;
        writer.flush()?;
        Ok(())
    }
}

impl Interface for CommandLine {
    fn post(&self, message: Message) {
        match message {
            Message::Experiment {
                varied,
                fixed,
                header,
            } => {
                println!();
                println!("{}", varied.title());
                println!();
                for (name, value) in fixed {
                    println!("{name}: {value}");
                }
                println!();
                println!("{}\t|\t{}", header[0], header[1..].join("\t"));
                println!();
                if let Err(e) = self.append_row(varied.abbreviation(), &header, true) {
                    error!("无法写入结果表：{e}");
                }
            }
            Message::Summary { varied, row } => {
                println!("{}\t|\t{}", row[0], row[1..].join("\t"));
                if let Err(e) = self.append_row(varied.abbreviation(), &row, false) {
                    error!("无法写入结果表：{e}");
                }
            }
            Message::Generation {
                generation,
                mean_fitness,
                best,
                best_fitness,
            } => println!("第 {generation} 代\t平均适应度 {mean_fitness:.3}\t最优 {best_fitness:.3}\t{best}"),
            Message::Finished {
                generation_with_best_mean_fitness,
                generation_with_best_candidate,
                best,
            } => {
                println!("平均适应度最高的是第 {generation_with_best_mean_fitness} 代");
                println!("最优个体出现在第 {generation_with_best_candidate} 代：{best}");
            }
        }
    }
}
