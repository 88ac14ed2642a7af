//! 种群：一代中所有个体的集合，提供统计量、二元锦标赛选择、合并与整体变异

use crate::candidate::Candidate;
use crate::Error;
use rand::Rng;
use std::cmp::Ordering;
use std::fmt::Display;

/// 一次选择得到的种群大小上限
pub const MAX_COHORT_SIZE: usize = 1 << 24;

#[derive(Debug, Clone, Default)]
pub struct Cohort {
    candidates: Vec<Candidate>,
}

impl Cohort {
    /// 生成 `size` 个随机个体
    pub fn of_size<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let candidates = (0..size).map(|_| Candidate::random(rng)).collect();
        Self { candidates }
    }

    pub fn of_candidates(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn size(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        self.candidates
    }

    fn ensure_not_empty(&self, operation: &str) -> Result<(), Error> {
        if self.candidates.is_empty() {
            return Err(format!("空种群无法{operation}").into());
        }
        Ok(())
    }

    pub fn mean_fitness(&self) -> Result<f64, Error> {
        self.ensure_not_empty("计算平均适应度")?;
        let total: f64 = self.candidates.iter().map(Candidate::fitness).sum();
        Ok(total / self.candidates.len() as f64)
    }

    /// 线性扫描求适应度最大的个体，并列时取最先出现的
    pub fn best_candidate(&self) -> Result<&Candidate, Error> {
        self.ensure_not_empty("求最优个体")?;
        let mut best = &self.candidates[0];
        let mut best_fitness = best.fitness();
        for candidate in &self.candidates[1..] {
            let fitness = candidate.fitness();
            if fitness > best_fitness {
                best = candidate;
                best_fitness = fitness;
            }
        }
        Ok(best)
    }

    /// 有放回地随机抽取两个个体（可能是同一个），返回适应度更高者；相等时各以 0.5 的概率返回
    pub fn binary_tournament_select_one<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<&Candidate, Error> {
        self.ensure_not_empty("进行锦标赛选择")?;
        let first = &self.candidates[rng.random_range(0..self.candidates.len())];
        let second = &self.candidates[rng.random_range(0..self.candidates.len())];
        let selection = match first.compare(second) {
            Ordering::Greater => first,
            Ordering::Less => second,
            Ordering::Equal => {
                if rng.random::<f64>() < 0.5 {
                    first
                } else {
                    second
                }
            }
        };
        Ok(selection)
    }

    /// 独立地进行 `target_size` 次锦标赛，得到一个新种群；个体可以重复入选。
    /// 目标大小为 0 时按 1 处理，超过 [`MAX_COHORT_SIZE`] 时报错
    pub fn binary_tournament_select<R: Rng + ?Sized>(
        &self,
        target_size: usize,
        rng: &mut R,
    ) -> Result<Cohort, Error> {
        if target_size > MAX_COHORT_SIZE {
            return Err(format!("选择的目标大小 {target_size} 超过上限 {MAX_COHORT_SIZE}").into());
        }
        let target_size = target_size.max(1);
        let mut selection = Vec::with_capacity(target_size);
        for _ in 0..target_size {
            selection.push(self.binary_tournament_select_one(rng)?.clone());
        }
        Ok(Cohort::of_candidates(selection))
    }

    /// 按比例选择：目标大小为 `floor(size * rate)`，同样至少为 1；比例大于 1 时必然有重复
    pub fn binary_tournament_select_rate<R: Rng + ?Sized>(
        &self,
        rate: f64,
        rng: &mut R,
    ) -> Result<Cohort, Error> {
        let target_size = (self.candidates.len() as f64 * rate).floor();
        // 负数和 NaN 在转换时饱和为 0，随后被提升为 1
        self.binary_tournament_select(target_size as usize, rng)
    }

    /// 依次拼接两个种群，不去重也不排序
    pub fn combine(&self, other: &Cohort) -> Cohort {
        let mut candidates = Vec::with_capacity(self.size() + other.size());
        candidates.extend_from_slice(&self.candidates);
        candidates.extend_from_slice(&other.candidates);
        Cohort::of_candidates(candidates)
    }

    /// 原地变异所有个体的基因型，不可撤销
    pub fn mutate_all<R: Rng + ?Sized>(&mut self, rate: f64, rng: &mut R) {
        for candidate in &mut self.candidates {
            candidate.genome_mut().mutate(rate, rng);
        }
    }
}

impl Display for Cohort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Size: {}", self.size())?;
        match (self.mean_fitness(), self.best_candidate()) {
            (Ok(mean), Ok(best)) => {
                writeln!(f, "Mean fitness: {mean}")?;
                write!(f, "Best individual: {best}")
            }
            _ => write!(f, "(empty)"),
        }
    }
}
