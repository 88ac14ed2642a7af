//! 个体：把基因型解码为定义域内的一对实数，并计算适应度

use crate::genome::{Genome, BITS};
use crate::Error;
use rand::Rng;
use std::cmp::Ordering;
use std::fmt::Display;

/// 定义域下界
pub const MIN: f64 = -10.0;
/// 定义域上界（取不到）
pub const MAX: f64 = 10.0;

/// 需要求最大值的二元函数，越大越好
///
/// 在 (-2, 0) 附近有一个高度约为 1 的峰，在 (5.5, 2) 附近有一个高度约为 2.57 的峰
pub fn objective(x: f64, y: f64) -> f64 {
    (-0.7 * (x + 2.0) * (x + 2.0)).exp() * (-0.9 * y * y).exp()
        + 2.0 * (-(x - 5.0) * (x - 6.0)).exp() * (-(y - 2.0) * (y - 2.0)).exp()
}

/// 把 `length` 位的无符号整数线性映射到 [MIN, MAX)
pub fn scale(value: u32, length: usize) -> f64 {
    MIN + value as f64 * ((MAX - MIN) / 2f64.powi(length as i32))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    genome: Genome,
}

impl Candidate {
    pub fn new(genome: Genome) -> Self {
        Self { genome }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(Genome::random_default(rng))
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// 变异只能通过这里进行，调用之后适应度随之改变
    pub fn genome_mut(&mut self) -> &mut Genome {
        &mut self.genome
    }

    pub fn x(&self) -> f64 {
        scale(self.genome.decode_x(), self.genome.len())
    }

    pub fn y(&self) -> f64 {
        scale(self.genome.decode_y(), self.genome.len())
    }

    pub fn coordinates(&self) -> (f64, f64) {
        (self.x(), self.y())
    }

    /// 每次调用都重新解码计算，不做缓存
    pub fn fitness(&self) -> f64 {
        let (x, y) = self.coordinates();
        objective(x, y)
    }

    pub fn mate<R: Rng + ?Sized>(&self, other: &Candidate, rng: &mut R) -> Result<Candidate, Error> {
        Ok(Candidate::new(self.genome.crossover(&other.genome, rng)?))
    }

    /// 按适应度比较的全序；基因型不同但适应度相同的两个个体比较结果为相等
    pub fn compare(&self, other: &Candidate) -> Ordering {
        self.fitness().total_cmp(&other.fitness())
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x: {} y: {} f(x, y): {}", self.x(), self.y(), self.fitness())
    }
}
