//! 一次完整的进化：按给定的控制参数运行全部代数，并记录每一代的平均适应度和最优个体
//!
//! 第 0 代是未经进化的初始种群，第 `generations` 代是最终种群，所以记录一共有 `generations + 1` 项。

use crate::candidate::Candidate;
use crate::cohort::Cohort;
use crate::config::Parameters;
use crate::Error;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use web_time::Instant;

/// 逐代记录的统计量，以及基于它们的查询
#[derive(Debug, Clone)]
pub struct History {
    mean_fitnesses: Vec<f64>,
    best_candidates: Vec<Candidate>,
}

impl History {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            mean_fitnesses: Vec::with_capacity(capacity),
            best_candidates: Vec::with_capacity(capacity),
        }
    }

    /// 直接由已有的记录构造，两个序列必须等长且非空
    pub fn from_records(
        mean_fitnesses: Vec<f64>,
        best_candidates: Vec<Candidate>,
    ) -> Result<Self, Error> {
        if mean_fitnesses.len() != best_candidates.len() {
            return Err(format!(
                "平均适应度记录 {} 项与最优个体记录 {} 项不一致",
                mean_fitnesses.len(),
                best_candidates.len()
            )
            .into());
        }
        if mean_fitnesses.is_empty() {
            return Err("记录不能为空".into());
        }
        Ok(Self {
            mean_fitnesses,
            best_candidates,
        })
    }

    fn record(&mut self, cohort: &Cohort) -> Result<(), Error> {
        let mean_fitness = cohort.mean_fitness()?;
        let best = cohort.best_candidate()?.clone();
        debug!(
            generation = self.mean_fitnesses.len(),
            mean_fitness,
            best_fitness = best.fitness(),
            "记录一代"
        );
        self.mean_fitnesses.push(mean_fitness);
        self.best_candidates.push(best);
        Ok(())
    }

    /// 记录的项数，即代数加一
    pub fn len(&self) -> usize {
        self.mean_fitnesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean_fitnesses.is_empty()
    }

    pub fn mean_fitnesses(&self) -> &[f64] {
        &self.mean_fitnesses
    }

    pub fn best_candidates(&self) -> &[Candidate] {
        &self.best_candidates
    }

    fn check(&self, generation: usize) -> Result<(), Error> {
        if generation >= self.len() {
            return Err(format!("第 {generation} 代不存在，共记录了 {} 代", self.len()).into());
        }
        Ok(())
    }

    pub fn mean_fitness_of_generation(&self, generation: usize) -> Result<f64, Error> {
        self.check(generation)?;
        Ok(self.mean_fitnesses[generation])
    }

    pub fn best_candidate_in_generation(&self, generation: usize) -> Result<&Candidate, Error> {
        self.check(generation)?;
        Ok(&self.best_candidates[generation])
    }

    /// 平均适应度最高的一代；并列时取最早的
    pub fn generation_with_best_mean_fitness(&self) -> usize {
        first_maximum(self.mean_fitnesses.iter().copied())
    }

    /// 最优个体适应度最高的一代；并列时取最早的
    pub fn generation_with_best_candidate(&self) -> usize {
        first_maximum(self.best_candidates.iter().map(Candidate::fitness))
    }

    /// 平均适应度第一次达到 `milestone` 的代数，未达到时返回 `None`
    pub fn generations_to_reach_mean_fitness(&self, milestone: f64) -> Option<usize> {
        self.mean_fitnesses
            .iter()
            .position(|&fitness| fitness >= milestone)
    }

    /// 最优个体适应度第一次达到 `milestone` 的代数，未达到时返回 `None`
    pub fn generations_to_reach_best_fitness(&self, milestone: f64) -> Option<usize> {
        self.best_candidates
            .iter()
            .position(|candidate| candidate.fitness() >= milestone)
    }
}

// 只有严格更大才替换，保证取到第一个最大值
fn first_maximum(values: impl Iterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (index, value) in values.enumerate() {
        if index == 0 || best_value < value {
            best = index;
            best_value = value;
        }
    }
    best
}

/// 一次运行；构造时同步地完成全部进化，此后只读
#[derive(Debug, Clone)]
pub struct Run {
    parameters: Parameters,
    history: History,
}

impl Run {
    pub fn new<R: Rng + ?Sized>(parameters: Parameters, rng: &mut R) -> Result<Self, Error> {
        parameters.validate()?;
        let start = Instant::now();
        let history = evolve(&parameters, rng)?;
        info!(
            parents = parameters.parents,
            children = parameters.children,
            generations = parameters.generations,
            selection_rate = parameters.selection_rate,
            mutation_rate = parameters.mutation_rate,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "进化完成"
        );
        Ok(Self {
            parameters,
            history,
        })
    }

    pub fn with_seed(parameters: Parameters, seed: u64) -> Result<Self, Error> {
        Self::new(parameters, &mut StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(parameters: Parameters) -> Result<Self, Error> {
        Self::new(parameters, &mut rand::rng())
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn parents(&self) -> usize {
        self.parameters.parents
    }

    pub fn children(&self) -> usize {
        self.parameters.children
    }

    pub fn generations(&self) -> usize {
        self.parameters.generations
    }

    pub fn selection_rate(&self) -> f64 {
        self.parameters.selection_rate
    }

    pub fn mutation_rate(&self) -> f64 {
        self.parameters.mutation_rate
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn mean_fitness_of_generation(&self, generation: usize) -> Result<f64, Error> {
        self.history.mean_fitness_of_generation(generation)
    }

    pub fn best_candidate_in_generation(&self, generation: usize) -> Result<&Candidate, Error> {
        self.history.best_candidate_in_generation(generation)
    }

    pub fn generation_with_best_mean_fitness(&self) -> usize {
        self.history.generation_with_best_mean_fitness()
    }

    pub fn generation_with_best_candidate(&self) -> usize {
        self.history.generation_with_best_candidate()
    }

    pub fn generations_to_reach_mean_fitness(&self, milestone: f64) -> Option<usize> {
        self.history.generations_to_reach_mean_fitness(milestone)
    }

    pub fn generations_to_reach_best_fitness(&self, milestone: f64) -> Option<usize> {
        self.history.generations_to_reach_best_fitness(milestone)
    }
}

/// 进化的主循环
fn evolve<R: Rng + ?Sized>(parameters: &Parameters, rng: &mut R) -> Result<History, Error> {
    let Parameters {
        parents: parents_size,
        children: children_size,
        generations,
        selection_rate,
        mutation_rate,
    } = *parameters;
    let mut history = History::with_capacity(generations + 1);
    let mut parents = Cohort::of_size(parents_size, rng);

    for _ in 0..generations {
        history.record(&parents)?;
        // 按选择率从亲代中选出参与繁殖的个体
        let selected = parents.binary_tournament_select_rate(selection_rate, rng)?;
        // 每个子代位置都重新用锦标赛挑选一对亲本
        let mut children = Vec::with_capacity(children_size);
        for _ in 0..children_size {
            let father = selected.binary_tournament_select_one(rng)?;
            let mother = selected.binary_tournament_select_one(rng)?;
            children.push(father.mate(mother, rng)?);
        }
        let mut union = selected.combine(&Cohort::of_candidates(children));
        union.mutate_all(mutation_rate, rng);
        parents = union.binary_tournament_select(parents_size, rng)?;
    }
    history.record(&parents)?;
    Ok(history)
}
