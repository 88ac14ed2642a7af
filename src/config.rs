//! 控制参数与实验配置的定义，可以从 YAML 文件读入

use crate::cohort::MAX_COHORT_SIZE;
use crate::Error;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::BTreeMap;
use std::fmt::Display;

/// 一次运行的五个控制参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub parents: usize,
    pub children: usize,
    pub generations: usize,
    pub selection_rate: f64,
    pub mutation_rate: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            parents: 60,
            children: 60,
            generations: 60,
            selection_rate: 0.5,
            mutation_rate: 0.1,
        }
    }
}

impl Parameters {
    pub fn validate(&self) -> Result<(), Error> {
        if self.parents == 0 {
            return Err("亲代种群大小至少为 1".into());
        }
        if self.children == 0 {
            return Err("子代种群大小至少为 1".into());
        }
        if !(self.selection_rate.is_finite() && self.selection_rate > 0.0) {
            return Err(format!("选择率 {} 必须为正数", self.selection_rate).into());
        }
        // 选出的亲代与子代合并后不能超过种群上限
        let selected = (self.parents as f64 * self.selection_rate).floor();
        if selected > MAX_COHORT_SIZE as f64
            || self.parents > MAX_COHORT_SIZE
            || self.children > MAX_COHORT_SIZE - (selected as usize).max(1)
        {
            return Err(format!(
                "种群过大：亲代 {}、选择率 {}、子代 {} 超过上限 {MAX_COHORT_SIZE}",
                self.parents, self.selection_rate, self.children
            )
            .into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(format!("变异率 {} 不在 [0, 1] 之间", self.mutation_rate).into());
        }
        Ok(())
    }
}

impl Display for Parameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Number of parents: {}", self.parents)?;
        writeln!(f, "Number of children: {}", self.children)?;
        writeln!(f, "Number of generations: {}", self.generations)?;
        writeln!(f, "Selection rate: {}", self.selection_rate)?;
        write!(f, "Mutation rate: {}", self.mutation_rate)
    }
}

/// 每一组实验中被改变的那个参数的取值列表
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepConfig {
    pub parents: Option<Vec<usize>>,
    pub children: Option<Vec<usize>>,
    pub generations: Option<Vec<usize>>,
    pub selection_rate: Option<Vec<f64>>,
    pub mutation_rate: Option<Vec<f64>>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub info: Option<BTreeMap<String, String>>,
    pub seed: Option<u64>,
    #[serde(default)]
    pub baseline: Parameters,
    pub milestones: Option<Vec<f64>>,
    pub sweeps: Option<SweepConfig>,
}

const DOUBLING: [usize; 6] = [10, 20, 40, 80, 160, 320];
const RATES: [f64; 9] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
const MILESTONES: [f64; 6] = [2.0, 2.1, 2.2, 2.3, 2.4, 2.5];

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            info: None,
            seed: None,
            baseline: Parameters::default(),
            milestones: Some(MILESTONES.to_vec()),
            sweeps: Some(SweepConfig {
                parents: Some(DOUBLING.to_vec()),
                children: Some(DOUBLING.to_vec()),
                generations: Some(DOUBLING.to_vec()),
                selection_rate: Some(RATES.to_vec()),
                mutation_rate: Some(RATES.to_vec()),
            }),
        }
    }
}

impl ExperimentConfig {
    pub fn from_yaml(content: &str) -> Result<Self, Error> {
        let config: ExperimentConfig = serde_yaml::from_str(content)?;
        config.baseline.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, Error> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn milestones(&self) -> Vec<f64> {
        self.milestones.clone().unwrap_or_else(|| MILESTONES.to_vec())
    }
}
