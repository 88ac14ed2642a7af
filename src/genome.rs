//! 基因型：用两条定长的二进制串编码两个无符号整数
//!
//! 两条串的长度总是相同，最高位在前。变异是原地进行的，因此一个基因型只能被一个个体独占。

use crate::Error;
use rand::Rng;
use std::fmt::Display;

/// 默认的二进制串长度
pub const BITS: usize = 16;

/// 解码结果是 `u32`，所以串长最多为 32
pub const MAX_BITS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    x: Vec<bool>,
    y: Vec<bool>,
}

fn decode(bits: &[bool]) -> u32 {
    bits.iter().fold(0, |value, &bit| (value << 1) | bit as u32)
}

fn check_length(length: usize) -> Result<(), Error> {
    if length == 0 || length > MAX_BITS {
        return Err(format!("串长 {length} 不在 1 到 {MAX_BITS} 之间").into());
    }
    Ok(())
}

impl Genome {
    /// 每一位独立地以 0.5 的概率取 1；长度必须在 1 到 [`MAX_BITS`] 之间
    pub fn random<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Result<Self, Error> {
        check_length(length)?;
        Ok(Self::sample(rng, length))
    }

    /// 默认长度 [`BITS`] 的随机基因型
    pub fn random_default<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::sample(rng, BITS)
    }

    fn sample<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Self {
        let mut x = Vec::with_capacity(length);
        let mut y = Vec::with_capacity(length);
        for _ in 0..length {
            x.push(rng.random::<f64>() < 0.5);
            y.push(rng.random::<f64>() < 0.5);
        }
        Self { x, y }
    }

    /// 由给定的两条串构造；两条串必须等长，且长度在 1 到 [`MAX_BITS`] 之间
    pub fn from_bits(x: Vec<bool>, y: Vec<bool>) -> Result<Self, Error> {
        if x.len() != y.len() {
            return Err(format!("x 串长 {} 与 y 串长 {} 不一致", x.len(), y.len()).into());
        }
        check_length(x.len())?;
        Ok(Self { x, y })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x_bits(&self) -> &[bool] {
        &self.x
    }

    pub fn y_bits(&self) -> &[bool] {
        &self.y
    }

    pub fn decode_x(&self) -> u32 {
        decode(&self.x)
    }

    pub fn decode_y(&self) -> u32 {
        decode(&self.y)
    }

    /// 均匀杂交：x 串和 y 串的每一位各自独立地等概率继承自某一方亲本
    pub fn crossover<R: Rng + ?Sized>(&self, other: &Genome, rng: &mut R) -> Result<Genome, Error> {
        if self.len() != other.len() {
            return Err(format!("无法杂交：串长 {} 与 {} 不一致", self.len(), other.len()).into());
        }
        let mut x = Vec::with_capacity(self.len());
        let mut y = Vec::with_capacity(self.len());
        for i in 0..self.len() {
            x.push(if rng.random::<f64>() < 0.5 { self.x[i] } else { other.x[i] });
            y.push(if rng.random::<f64>() < 0.5 { self.y[i] } else { other.y[i] });
        }
        Ok(Genome { x, y })
    }

    /// 原地变异：每一位独立地以 `rate` 的概率翻转。`rate` 不做校验，0 不变，1 全部翻转
    pub fn mutate<R: Rng + ?Sized>(&mut self, rate: f64, rng: &mut R) {
        for i in 0..self.len() {
            if rng.random::<f64>() < rate {
                self.x[i] = !self.x[i];
            }
            if rng.random::<f64>() < rate {
                self.y[i] = !self.y[i];
            }
        }
    }
}

impl Display for Genome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let render = |bits: &[bool]| -> String {
            bits.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
        };
        write!(f, "x: {}\ty: {}", render(&self.x), render(&self.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bits(pattern: &str) -> Vec<bool> {
        pattern.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn decodes_most_significant_bit_first() {
        let genome = Genome::from_bits(bits("0000000000000101"), bits("1000000000000000")).unwrap();
        assert_eq!(genome.decode_x(), 5);
        assert_eq!(genome.decode_y(), 32768);
        let full = Genome::from_bits(vec![true; 16], vec![false; 16]).unwrap();
        assert_eq!(full.decode_x(), 65535);
        assert_eq!(full.decode_y(), 0);
    }

    #[test]
    fn rejects_malformed_bits() {
        assert!(Genome::from_bits(vec![true; 16], vec![true; 15]).is_err());
        assert!(Genome::from_bits(vec![], vec![]).is_err());
        assert!(Genome::from_bits(vec![true; 33], vec![true; 33]).is_err());
        assert!(Genome::from_bits(vec![true; 32], vec![true; 32]).is_ok());
    }

    #[test]
    fn random_rejects_lengths_outside_decodable_range() {
        let mut rng = StdRng::seed_from_u64(2);
        assert!(Genome::random(&mut rng, 0).is_err());
        assert!(Genome::random(&mut rng, MAX_BITS + 1).is_err());
        assert!(Genome::random(&mut rng, 40).is_err());
        assert_eq!(Genome::random(&mut rng, 1).unwrap().len(), 1);
        assert_eq!(Genome::random(&mut rng, MAX_BITS).unwrap().len(), MAX_BITS);
    }

    #[test]
    fn random_genome_has_requested_length() {
        let mut rng = StdRng::seed_from_u64(1);
        let genome = Genome::random_default(&mut rng);
        assert_eq!(genome.x_bits().len(), BITS);
        assert_eq!(genome.y_bits().len(), BITS);
    }

    #[test]
    fn crossover_only_inherits_parental_bits() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let a = Genome::random_default(&mut rng);
            let b = Genome::random_default(&mut rng);
            let child = a.crossover(&b, &mut rng).unwrap();
            for i in 0..BITS {
                assert!(child.x_bits()[i] == a.x_bits()[i] || child.x_bits()[i] == b.x_bits()[i]);
                assert!(child.y_bits()[i] == a.y_bits()[i] || child.y_bits()[i] == b.y_bits()[i]);
            }
        }
    }

    #[test]
    fn crossover_leaves_parents_untouched() {
        let mut rng = StdRng::seed_from_u64(8);
        let a = Genome::random_default(&mut rng);
        let b = Genome::random_default(&mut rng);
        let (a0, b0) = (a.clone(), b.clone());
        let _ = a.crossover(&b, &mut rng).unwrap();
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn crossover_of_identical_parents_is_a_copy() {
        let mut rng = StdRng::seed_from_u64(9);
        let a = Genome::random_default(&mut rng);
        assert_eq!(a.crossover(&a, &mut rng).unwrap(), a);
    }

    #[test]
    fn crossover_rejects_unequal_lengths() {
        let mut rng = StdRng::seed_from_u64(10);
        let a = Genome::random(&mut rng, 16).unwrap();
        let b = Genome::random(&mut rng, 8).unwrap();
        assert!(a.crossover(&b, &mut rng).is_err());
    }

    #[test]
    fn zero_rate_mutation_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let mut genome = Genome::random_default(&mut rng);
            let (x, y) = (genome.decode_x(), genome.decode_y());
            genome.mutate(0.0, &mut rng);
            assert_eq!((genome.decode_x(), genome.decode_y()), (x, y));
        }
    }

    #[test]
    fn full_rate_mutation_inverts_every_bit() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..100 {
            let mut genome = Genome::random_default(&mut rng);
            let (x, y) = (genome.decode_x(), genome.decode_y());
            genome.mutate(1.0, &mut rng);
            assert_eq!(genome.decode_x(), !x & 0xFFFF);
            assert_eq!(genome.decode_y(), !y & 0xFFFF);
        }
    }

    #[test]
    fn displays_bit_strings() {
        let genome = Genome::from_bits(bits("1010"), bits("0011")).unwrap();
        assert_eq!(genome.to_string(), "x: 1010\ty: 0011");
    }
}
