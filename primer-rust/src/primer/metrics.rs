use crate::error::{PrimerError, Result};

/// 一段序列中 A/T、G/C 及其他字符的计数。
/// GC 含量与 Wallace Tm 只依赖这些计数，搜索引擎用前缀和直接得到窗口计数。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BaseCounts {
    pub at: usize,
    pub gc: usize,
    /// 不在字母表内的字符，只计入长度
    pub other: usize,
}

impl BaseCounts {
    pub fn of(seq: &[u8]) -> Self {
        let mut counts = Self::default();
        for &b in seq {
            match b {
                b'A' | b'T' => counts.at += 1,
                b'G' | b'C' => counts.gc += 1,
                _ => counts.other += 1,
            }
        }
        counts
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.at + self.gc + self.other
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 100 * (G + C) / len
    #[inline]
    pub fn gc_content(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(PrimerError::EmptyInput);
        }
        Ok(100.0 * self.gc as f64 / self.len() as f64)
    }

    /// Wallace rule: Tm = 2*(A+T) + 4*(G+C)
    #[inline]
    pub fn melting_temp(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(PrimerError::EmptyInput);
        }
        Ok((2 * self.at + 4 * self.gc) as f64)
    }
}

/// GC 含量（百分比，[0, 100]）
pub fn gc_content(seq: &[u8]) -> Result<f64> {
    BaseCounts::of(seq).gc_content()
}

/// Wallace 规则熔解温度，简单加和估计，非最近邻热力学模型
pub fn melting_temp(seq: &[u8]) -> Result<f64> {
    BaseCounts::of(seq).melting_temp()
}

/// 前缀计数表：prefix[i] 为 seq[0..i) 的计数，任意窗口 O(1) 求得。
pub struct PrefixCounts {
    at: Vec<usize>,
    gc: Vec<usize>,
}

impl PrefixCounts {
    pub fn new(seq: &[u8]) -> Self {
        let mut at = Vec::with_capacity(seq.len() + 1);
        let mut gc = Vec::with_capacity(seq.len() + 1);
        at.push(0);
        gc.push(0);
        let (mut a, mut g) = (0usize, 0usize);
        for &b in seq {
            match b {
                b'A' | b'T' => a += 1,
                b'G' | b'C' => g += 1,
                _ => {}
            }
            at.push(a);
            gc.push(g);
        }
        Self { at, gc }
    }

    /// 窗口 [start, end) 的计数
    #[inline]
    pub fn window(&self, start: usize, end: usize) -> BaseCounts {
        let at = self.at[end] - self.at[start];
        let gc = self.gc[end] - self.gc[start];
        BaseCounts { at, gc, other: end - start - at - gc }
    }
}
