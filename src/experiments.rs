//! 参数扫描实验：每组实验只改变一个控制参数，其余参数取基准值，并汇总每次运行的收敛情况

use crate::config::{ExperimentConfig, Parameters};
use crate::interfaces::{Interface, Message};
use crate::run::Run;
use crate::Error;
use itertools::Itertools;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// 被改变的参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Varied {
    Parents,
    Children,
    Generations,
    SelectionRate,
    MutationRate,
}

impl Varied {
    pub fn title(&self) -> &'static str {
        match self {
            Varied::Parents => "改变亲代种群大小",
            Varied::Children => "改变子代种群大小",
            Varied::Generations => "改变代数",
            Varied::SelectionRate => "改变选择率",
            Varied::MutationRate => "改变变异率",
        }
    }

    /// 表头中该参数一列的缩写
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Varied::Parents => "PPS",
            Varied::Children => "CPS",
            Varied::Generations => "G",
            Varied::SelectionRate => "SR",
            Varied::MutationRate => "MR",
        }
    }

    pub fn value_of(&self, parameters: &Parameters) -> String {
        match self {
            Varied::Parents => parameters.parents.to_string(),
            Varied::Children => parameters.children.to_string(),
            Varied::Generations => parameters.generations.to_string(),
            Varied::SelectionRate => parameters.selection_rate.to_string(),
            Varied::MutationRate => parameters.mutation_rate.to_string(),
        }
    }

    /// 其余保持不变的参数，用于在每组实验之前说明
    pub fn fixed(&self, parameters: &Parameters) -> Vec<(&'static str, String)> {
        let all = [
            (Varied::Parents, "Parent population"),
            (Varied::Children, "Child population"),
            (Varied::Generations, "Generations"),
            (Varied::SelectionRate, "Selection rate"),
            (Varied::MutationRate, "Mutation rate"),
        ];
        all.iter()
            .filter(|(varied, _)| varied != self)
            .map(|(varied, name)| (*name, varied.value_of(parameters)))
            .collect()
    }
}

/// 一组实验：基准参数加上被改变参数的各个取值
#[derive(Debug, Clone)]
pub struct Experiment {
    pub varied: Varied,
    pub baseline: Parameters,
    pub runs: Vec<Parameters>,
}

impl ExperimentConfig {
    /// 按参数的固定顺序展开为若干组实验，没有配置取值的参数不做实验
    pub fn experiments(&self) -> Vec<Experiment> {
        let base = self.baseline;
        let sweeps = self.sweeps.clone().unwrap_or_default();
        let mut experiments = vec![];
        let mut push = |varied: Varied, runs: Vec<Parameters>| {
            if !runs.is_empty() {
                experiments.push(Experiment {
                    varied,
                    baseline: base,
                    runs,
                });
            }
        };
        let values = |v: Option<Vec<usize>>| v.unwrap_or_default().into_iter();
        let rates = |v: Option<Vec<f64>>| v.unwrap_or_default().into_iter();
        push(
            Varied::Parents,
            values(sweeps.parents).map(|parents| Parameters { parents, ..base }).collect(),
        );
        push(
            Varied::Children,
            values(sweeps.children).map(|children| Parameters { children, ..base }).collect(),
        );
        push(
            Varied::Generations,
            values(sweeps.generations)
                .map(|generations| Parameters { generations, ..base })
                .collect(),
        );
        push(
            Varied::SelectionRate,
            rates(sweeps.selection_rate)
                .map(|selection_rate| Parameters { selection_rate, ..base })
                .collect(),
        );
        push(
            Varied::MutationRate,
            rates(sweeps.mutation_rate)
                .map(|mutation_rate| Parameters { mutation_rate, ..base })
                .collect(),
        );
        experiments
    }
}

/// 一次运行的汇总，对应结果表中的一行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub value: String,
    /// 平均适应度最高的一代
    pub gwbmf: usize,
    pub bmf: f64,
    /// 最优个体出现的一代
    pub gwbi: usize,
    pub bix: f64,
    pub biy: f64,
    pub bif: f64,
    pub mean_milestones: Vec<Option<usize>>,
    pub best_milestones: Vec<Option<usize>>,
}

impl Summary {
    pub fn of(run: &Run, varied: Varied, milestones: &[f64]) -> Result<Self, Error> {
        let gwbmf = run.generation_with_best_mean_fitness();
        let gwbi = run.generation_with_best_candidate();
        let best = run.best_candidate_in_generation(gwbi)?;
        let (bix, biy) = best.coordinates();
        Ok(Self {
            value: varied.value_of(run.parameters()),
            gwbmf,
            bmf: run.mean_fitness_of_generation(gwbmf)?,
            gwbi,
            bix,
            biy,
            bif: best.fitness(),
            mean_milestones: milestones
                .iter()
                .map(|&m| run.generations_to_reach_mean_fitness(m))
                .collect(),
            best_milestones: milestones
                .iter()
                .map(|&m| run.generations_to_reach_best_fitness(m))
                .collect(),
        })
    }

    pub fn header(varied: Varied, milestones: &[f64]) -> Vec<String> {
        let mut header: Vec<String> = [varied.abbreviation(), "GWBMF", "BMF", "GWBI", "BIX", "BIY", "BIF"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        header.extend(milestones.iter().map(|m| format!("M>={m}")));
        header.extend(milestones.iter().map(|m| format!("B>={m}")));
        header
    }

    /// 显示用的一行，浮点数截断到三位小数，未达到的里程碑记为 -
    pub fn row(&self) -> Vec<String> {
        let milestone = |g: &Option<usize>| g.map_or("-".to_string(), |g| g.to_string());
        let mut row = vec![
            self.value.clone(),
            self.gwbmf.to_string(),
            shorten(self.bmf).to_string(),
            self.gwbi.to_string(),
            shorten(self.bix).to_string(),
            shorten(self.biy).to_string(),
            shorten(self.bif).to_string(),
        ];
        row.extend(self.mean_milestones.iter().map(milestone));
        row.extend(self.best_milestones.iter().map(milestone));
        row
    }
}

/// 向零截断到三位小数
pub fn shorten(value: f64) -> f64 {
    (value * 1000.0).trunc() / 1000.0
}

/// 依次运行所有实验，通过界面报告每一组的说明和每一行结果
pub fn run_experiments<R: Rng + ?Sized>(
    config: &ExperimentConfig,
    rng: &mut R,
    interface: &dyn Interface,
) -> Result<Vec<(Experiment, Vec<Summary>)>, Error> {
    let milestones = config.milestones();
    let mut results = vec![];
    for experiment in config.experiments() {
        info!(
            varied = experiment.varied.abbreviation(),
            values = %experiment.runs.iter().map(|p| experiment.varied.value_of(p)).join(","),
            "开始一组实验"
        );
        interface.post(Message::Experiment {
            varied: experiment.varied,
            fixed: experiment.varied.fixed(&experiment.baseline),
            header: Summary::header(experiment.varied, &milestones),
        });
        let mut summaries = Vec::with_capacity(experiment.runs.len());
        for parameters in &experiment.runs {
            let run = Run::new(*parameters, rng)?;
            let summary = Summary::of(&run, experiment.varied, &milestones)?;
            interface.post(Message::Summary {
                varied: experiment.varied,
                row: summary.row(),
            });
            summaries.push(summary);
        }
        results.push((experiment, summaries));
    }
    Ok(results)
}

/// 逐代报告一次运行的统计量，最后报告最好的一代
pub fn report_run(run: &Run, interface: &dyn Interface) {
    let history = run.history();
    for (generation, (&mean_fitness, best)) in history
        .mean_fitnesses()
        .iter()
        .zip(history.best_candidates())
        .enumerate()
    {
        interface.post(Message::Generation {
            generation,
            mean_fitness,
            best: best.to_string(),
            best_fitness: best.fitness(),
        });
    }
    let generation_with_best_candidate = run.generation_with_best_candidate();
    let best = &history.best_candidates()[generation_with_best_candidate];
    interface.post(Message::Finished {
        generation_with_best_mean_fitness: run.generation_with_best_mean_fitness(),
        generation_with_best_candidate,
        best: best.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        messages: RefCell<Vec<Message>>,
    }

    impl Interface for Recorder {
        fn post(&self, message: Message) {
            self.messages.borrow_mut().push(message);
        }
    }

    #[test]
    fn shorten_truncates_toward_zero() {
        assert_eq!(shorten(2.56789), 2.567);
        assert_eq!(shorten(-1.23456), -1.234);
        assert_eq!(shorten(0.0004), 0.0);
    }

    #[test]
    fn default_config_expands_to_five_experiments() {
        let experiments = ExperimentConfig::default().experiments();
        let varied: Vec<_> = experiments.iter().map(|e| e.varied).collect();
        assert_eq!(
            varied,
            vec![
                Varied::Parents,
                Varied::Children,
                Varied::Generations,
                Varied::SelectionRate,
                Varied::MutationRate
            ]
        );
        assert_eq!(experiments[0].runs.len(), 6);
        assert_eq!(experiments[3].runs.len(), 9);
        assert_eq!(experiments[0].runs[2].parents, 40);
        assert_eq!(experiments[0].runs[2].children, 60);
        assert_eq!(experiments[4].runs[8].mutation_rate, 0.9);
        assert_eq!(experiments[4].runs[8].selection_rate, 0.5);
    }

    #[test]
    fn fixed_lists_everything_but_the_varied_parameter() {
        let fixed = Varied::Children.fixed(&Parameters::default());
        let names: Vec<_> = fixed.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec!["Parent population", "Generations", "Selection rate", "Mutation rate"]
        );
    }

    #[test]
    fn header_and_row_have_same_width() {
        let milestones = [2.0, 2.5];
        let run = Run::with_seed(
            Parameters {
                parents: 6,
                children: 6,
                generations: 4,
                ..Parameters::default()
            },
            1,
        )
        .unwrap();
        let summary = Summary::of(&run, Varied::Generations, &milestones).unwrap();
        assert_eq!(summary.value, "4");
        assert_eq!(
            Summary::header(Varied::Generations, &milestones).len(),
            summary.row().len()
        );
        assert_eq!(summary.bif, run.best_candidate_in_generation(summary.gwbi).unwrap().fitness());
    }

    #[test]
    fn runs_configured_sweeps_and_reports_them() {
        let config = ExperimentConfig {
            info: None,
            seed: None,
            baseline: Parameters {
                parents: 6,
                children: 6,
                generations: 3,
                ..Parameters::default()
            },
            milestones: Some(vec![1.0]),
            sweeps: Some(SweepConfig {
                children: Some(vec![2, 4]),
                mutation_rate: Some(vec![0.0]),
                ..SweepConfig::default()
            }),
        };
        let recorder = Recorder::default();
        let mut rng = StdRng::seed_from_u64(17);
        let results = run_experiments(&config, &mut rng, &recorder).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].1.len(), 2);
        assert_eq!(results[0].1[1].value, "4");
        assert_eq!(results[1].1[0].value, "0");
        // 两组说明加三行结果
        assert_eq!(recorder.messages.borrow().len(), 5);
    }

    #[test]
    fn report_run_posts_every_generation_then_finishes() {
        let run = Run::with_seed(
            Parameters {
                parents: 5,
                children: 5,
                generations: 7,
                ..Parameters::default()
            },
            2,
        )
        .unwrap();
        let recorder = Recorder::default();
        report_run(&run, &recorder);
        let messages = recorder.messages.borrow();
        assert_eq!(messages.len(), 9);
        assert!(matches!(messages[0], Message::Generation { generation: 0, .. }));
        assert!(matches!(messages[7], Message::Generation { generation: 7, .. }));
        match &messages[8] {
            Message::Finished {
                generation_with_best_candidate,
                ..
            } => assert_eq!(*generation_with_best_candidate, run.generation_with_best_candidate()),
            _ => panic!("最后一条消息应当是 Finished"),
        }
    }
}
