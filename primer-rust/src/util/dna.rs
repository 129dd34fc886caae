use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{PrimerError, Result};

/// 允许的碱基字母表
pub const ALPHABET: [u8; 4] = [b'A', b'T', b'C', b'G'];

/// 清洗原始输入：去掉所有空白（含换行 / \r），转为大写。
/// 不做字母表替换，非法字符留给 [`validate`] 报告。
pub fn normalize_seq(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    for &b in raw {
        if b.is_ascii_whitespace() {
            continue;
        }
        out.push(b.to_ascii_uppercase());
    }
    out
}

/// 检查序列只包含 {A, T, C, G}，返回第一个非法字符的位置。
pub fn validate(seq: &[u8]) -> Result<()> {
    for (position, &b) in seq.iter().enumerate() {
        if !ALPHABET.contains(&b) {
            return Err(PrimerError::InvalidAlphabet { base: b as char, position });
        }
    }
    Ok(())
}

#[inline]
pub fn complement_base(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        other => other,
    }
}

/// Watson-Crick 互补，长度与方向不变
pub fn complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().map(|&b| complement_base(b)).collect()
}

pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len());
    for &b in seq.iter().rev() {
        out.push(complement_base(b));
    }
    out
}

/// 经过校验的 DNA 序列。只能通过 [`DnaSequence::parse`] 等校验路径构造，
/// 因此搜索引擎拿到的序列一定满足字母表约束。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DnaSequence(String);

impl DnaSequence {
    /// 从用户原始文本构造：去空白、转大写、校验。
    pub fn parse(raw: &str) -> Result<Self> {
        let norm = normalize_seq(raw.as_bytes());
        Self::from_bytes(&norm)
    }

    /// 从已规范化的字节构造（不再去空白 / 转大写）
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        validate(bytes)?;
        // validate() 保证了纯 ASCII
        Ok(Self(bytes.iter().map(|&b| b as char).collect()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 半开区间 [start, end) 的子序列，区间越界或倒置时返回 None
    pub fn get(&self, start: usize, end: usize) -> Option<DnaSequence> {
        self.0.get(start..end).map(|s| DnaSequence(s.to_string()))
    }

    /// crate 内部使用，调用方保证区间合法
    pub(crate) fn slice(&self, start: usize, end: usize) -> DnaSequence {
        DnaSequence(self.0[start..end].to_string())
    }

    pub fn complement(&self) -> DnaSequence {
        DnaSequence(complement(self.as_bytes()).into_iter().map(char::from).collect())
    }

    pub fn reverse_complement(&self) -> DnaSequence {
        DnaSequence(revcomp(self.as_bytes()).into_iter().map(char::from).collect())
    }
}

impl fmt::Display for DnaSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DnaSequence {
    type Err = PrimerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<[u8]> for DnaSequence {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Serialize for DnaSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
