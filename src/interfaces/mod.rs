use crate::experiments::Varied;
use serde::Serialize;

pub mod command_line;

/// 向用户反馈的消息类型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// 一组实验开始，附带保持不变的参数和结果表头
    Experiment {
        varied: Varied,
        fixed: Vec<(&'static str, String)>,
        header: Vec<String>,
    },
    /// 一次运行的汇总
    Summary { varied: Varied, row: Vec<String> },
    /// 单次运行中某一代的统计量
    Generation {
        generation: usize,
        mean_fitness: f64,
        best: String,
        best_fitness: f64,
    },
    /// 单次运行结束
    Finished {
        generation_with_best_mean_fitness: usize,
        generation_with_best_candidate: usize,
        best: String,
    },
}

/// 定义了向用户报告消息的接口，用于统一各种输出方式
///
/// 只需要实现 post 方法，就可向用户报告实验中产生的各种数据
pub trait Interface {
    fn post(&self, message: Message);
}
