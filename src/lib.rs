//! libpeak 是一个二进制编码的遗传算法，在有界的二维定义域上寻找一个固定二元函数的最大值，
//! 用来从经验上研究各个控制参数（亲代和子代种群大小、代数、选择率、变异率）对收敛速度和解的质量的影响。
//!
//! 每个个体用两条 16 位的二进制串编码一对坐标，通过二元锦标赛选择、均匀杂交和逐位翻转变异进行进化。
//! 所有随机操作都显式地接收一个随机数生成器，因此给定种子时整个过程是可复现的。
//!
//! peak 是使用 libpeak 实现的命令行程序，可以按配置文件批量进行参数扫描实验，也可以单独运行一次并逐代查看统计量。
//!
//! ```
//! use peak::config::Parameters;
//! use peak::run::Run;
//!
//! let parameters = Parameters { parents: 20, children: 20, generations: 30, ..Parameters::default() };
//! let run = Run::with_seed(parameters, 42)?;
//! let best = run.best_candidate_in_generation(run.generation_with_best_candidate())?;
//! println!("{best}");
//! # Ok::<(), peak::Error>(())
//! ```

pub mod candidate;
pub mod cohort;
pub mod config;
pub mod error;
pub mod experiments;
pub mod genome;
pub mod interfaces;
pub mod run;

pub use error::Error;
