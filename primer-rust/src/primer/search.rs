use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{PrimerError, Result};
use crate::primer::metrics::PrefixCounts;
use crate::util::dna::DnaSequence;

/// 工作序列在长度迭代之间的处理方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// 兼容模式：每完成一个引物长度，工作序列去掉末尾一个碱基。
    /// 较短引物只在逐步截短的序列上搜索。
    #[default]
    Shrinking,
    /// 修正模式：每个长度都扫描完整输入，偏移量相对于原始序列。
    FullSequence,
}

/// 引物搜索参数，默认值为常用 PCR 引物设计经验规则
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub min_length: usize,
    pub max_length: usize,
    pub min_melt_temp: f64,
    pub max_melt_temp: f64,
    pub min_gc: f64,
    pub max_gc: f64,
    pub mode: SearchMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_length: 17,
            max_length: 25,
            min_melt_temp: 55.0,
            max_melt_temp: 60.0,
            min_gc: 50.0,
            max_gc: 60.0,
            mode: SearchMode::Shrinking,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        let bounds = [
            ("min_melt_temp", self.min_melt_temp),
            ("max_melt_temp", self.max_melt_temp),
            ("min_gc", self.min_gc),
            ("max_gc", self.max_gc),
        ];
        for (name, value) in bounds {
            if !value.is_finite() {
                return Err(PrimerError::InvalidConfig(format!("{} must be a finite number, got {}", name, value)));
            }
        }
        if self.min_length == 0 {
            return Err(PrimerError::InvalidConfig("min_length must be at least 1".into()));
        }
        if self.min_length > self.max_length {
            return Err(PrimerError::InvalidConfig(format!(
                "min_length {} exceeds max_length {}",
                self.min_length, self.max_length
            )));
        }
        if self.min_melt_temp > self.max_melt_temp {
            return Err(PrimerError::InvalidConfig(format!(
                "min_melt_temp {} exceeds max_melt_temp {}",
                self.min_melt_temp, self.max_melt_temp
            )));
        }
        if self.min_gc > self.max_gc {
            return Err(PrimerError::InvalidConfig(format!(
                "min_gc {} exceeds max_gc {}",
                self.min_gc, self.max_gc
            )));
        }
        Ok(())
    }
}

/// 候选引物
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrimerCandidate {
    pub bases: DnaSequence,
    /// 产生该候选的外层迭代长度（== bases.len()）
    pub length: usize,
    /// 在该外层迭代时工作序列中的 0 起始偏移
    pub start_offset: usize,
    pub melting_temp: f64,
    pub gc_content: f64,
}

/// 返回实际会检查到位置的引物长度（降序）及其对应的工作序列长度。
/// Shrinking 模式下第 k 个长度（从 0 计）的工作序列比输入短 k 个碱基，
/// 每个长度的检查位置数恒为 `seq_len - max_length`；
/// 因此 `max_length >= seq_len` 时一个位置都不检查。
/// 放不下任何位置的长度不会出现在结果中，结果长度不超过 `seq_len`。
pub fn search_windows(seq_len: usize, config: &SearchConfig) -> Vec<(usize, usize)> {
    if config.min_length > config.max_length {
        return Vec::new();
    }
    match config.mode {
        SearchMode::Shrinking => {
            if config.max_length >= seq_len {
                return Vec::new();
            }
            (config.min_length..=config.max_length)
                .rev()
                .enumerate()
                .map(|(step, primer_length)| (primer_length, seq_len - step))
                .collect()
        }
        SearchMode::FullSequence => {
            // primer_length < seq_len 才至少有一个位置
            let top = config.max_length.min(seq_len.saturating_sub(1));
            if config.min_length > top {
                return Vec::new();
            }
            (config.min_length..=top).rev().map(|primer_length| (primer_length, seq_len)).collect()
        }
    }
}

/// 滑动窗口搜索所有满足 Tm 与 GC 条件的引物。
///
/// 外层按长度从 `max_length` 递减到 `min_length`，内层偏移从 0 递增，
/// 每个长度共检查 `working_len - primer_length` 个位置（最后一个可放下的位置不检查）。
/// 先判 Tm 再判 GC；结果按产生顺序返回，不重排。没有候选时返回空列表。
pub fn find_primers(sequence: &DnaSequence, config: &SearchConfig) -> Result<Vec<PrimerCandidate>> {
    config.validate()?;

    let prefix = PrefixCounts::new(sequence.as_bytes());
    let mut primers = Vec::new();

    for (primer_length, working_len) in search_windows(sequence.len(), config) {
        // working 是输入的前缀，因此窗口计数可直接用整条序列的前缀和
        for start_offset in 0..working_len.saturating_sub(primer_length) {
            let counts = prefix.window(start_offset, start_offset + primer_length);

            let melting_temp = counts.melting_temp()?;
            if melting_temp < config.min_melt_temp || melting_temp > config.max_melt_temp {
                continue;
            }
            let gc_content = counts.gc_content()?;
            if gc_content < config.min_gc || gc_content > config.max_gc {
                continue;
            }

            primers.push(PrimerCandidate {
                bases: sequence.slice(start_offset, start_offset + primer_length),
                length: primer_length,
                start_offset,
                melting_temp,
                gc_content,
            });
        }
    }

    Ok(primers)
}

/// 并行搜索多条序列，结果顺序与输入一致。
/// 在调用方的 rayon 线程池中运行（`pool.install(|| ...)`）。
pub fn find_primers_batch(sequences: &[DnaSequence], config: &SearchConfig) -> Result<Vec<Vec<PrimerCandidate>>> {
    config.validate()?;
    sequences.par_iter().map(|seq| find_primers(seq, config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primer::metrics::{gc_content, melting_temp};

    const ATCG32: &str = "ATCGATCGATCGATCGATCGATCGATCGATCG";

    fn seq(s: &str) -> DnaSequence {
        DnaSequence::parse(s).unwrap()
    }

    /// 不做前缀和、真正截短工作序列的直接实现，用来对照
    fn naive_search(sequence: &DnaSequence, config: &SearchConfig) -> Vec<(String, usize, usize)> {
        let mut working = sequence.as_bytes().to_vec();
        let mut out = Vec::new();
        for primer_length in (config.min_length..=config.max_length).rev() {
            let n = working.len().saturating_sub(primer_length);
            for x in 0..n {
                let cand = &working[x..x + primer_length];
                let tm = melting_temp(cand).unwrap();
                if tm < config.min_melt_temp || tm > config.max_melt_temp {
                    continue;
                }
                let gc = gc_content(cand).unwrap();
                if gc < config.min_gc || gc > config.max_gc {
                    continue;
                }
                out.push((String::from_utf8(cand.to_vec()).unwrap(), primer_length, x));
            }
            if config.mode == SearchMode::Shrinking {
                working.pop();
            }
        }
        out
    }

    fn summary(c: &[PrimerCandidate]) -> Vec<(String, usize, usize)> {
        c.iter().map(|p| (p.bases.to_string(), p.length, p.start_offset)).collect()
    }

    #[test]
    fn default_config_matches_pcr_rules() {
        let c = SearchConfig::default();
        assert_eq!((c.min_length, c.max_length), (17, 25));
        assert_eq!((c.min_melt_temp, c.max_melt_temp), (55.0, 60.0));
        assert_eq!((c.min_gc, c.max_gc), (50.0, 60.0));
        assert_eq!(c.mode, SearchMode::Shrinking);
    }

    #[test]
    fn shrinking_window_schedule() {
        let windows = search_windows(ATCG32.len(), &SearchConfig::default());
        assert_eq!(windows.len(), 9);
        assert_eq!(windows[0], (25, 32));
        assert_eq!(windows[8], (17, 24));
        for (i, &(len, working)) in windows.iter().enumerate() {
            assert_eq!(len, 25 - i);
            assert_eq!(working, 32 - i);
        }
    }

    #[test]
    fn full_sequence_window_schedule() {
        let config = SearchConfig { mode: SearchMode::FullSequence, ..SearchConfig::default() };
        let windows = search_windows(ATCG32.len(), &config);
        assert!(windows.iter().all(|&(_, working)| working == 32));
        assert_eq!(windows.last(), Some(&(17, 32)));
    }

    #[test]
    fn shrinking_offsets_come_from_truncated_window() {
        // 全部放开过滤，只观察检查过的位置
        let config = SearchConfig {
            min_melt_temp: 0.0,
            max_melt_temp: 1000.0,
            min_gc: 0.0,
            max_gc: 100.0,
            ..SearchConfig::default()
        };
        let hits = find_primers(&seq(ATCG32), &config).unwrap();

        let offsets = |len: usize| -> Vec<usize> {
            hits.iter().filter(|p| p.length == len).map(|p| p.start_offset).collect()
        };
        // length 25 在 32 碱基上检查 32 - 25 = 7 个位置
        assert_eq!(offsets(25), (0..7).collect::<Vec<_>>());
        // length 17 在截短到 24 碱基的序列上检查 24 - 17 = 7 个位置
        assert_eq!(offsets(17), (0..7).collect::<Vec<_>>());
        assert!(hits.iter().all(|p| p.start_offset + p.length < 32 - (25 - p.length)));

        let full = SearchConfig { mode: SearchMode::FullSequence, ..config };
        let hits_full = find_primers(&seq(ATCG32), &full).unwrap();
        let full_17: Vec<usize> = hits_full.iter().filter(|p| p.length == 17).map(|p| p.start_offset).collect();
        assert_eq!(full_17, (0..15).collect::<Vec<_>>());
    }

    #[test]
    fn atcg_repeat_default_hits() {
        let s = seq(ATCG32);
        let hits = find_primers(&s, &SearchConfig::default()).unwrap();
        let got: Vec<(usize, usize)> = hits.iter().map(|p| (p.length, p.start_offset)).collect();
        // 20-mer 恰好含 5 个 ATCG：Tm 60, GC 50%
        let expected = vec![
            (20, 0), (20, 1), (20, 2), (20, 3), (20, 4), (20, 5), (20, 6),
            (19, 1), (19, 2), (19, 5), (19, 6),
            (18, 2), (18, 6),
        ];
        assert_eq!(got, expected);
        assert_eq!(summary(&hits), naive_search(&s, &SearchConfig::default()));
    }

    #[test]
    fn uniform_sequence_yields_nothing() {
        let s = seq(&"A".repeat(30));
        assert!(find_primers(&s, &SearchConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn short_sequence_yields_nothing() {
        let s = seq("GCGCATATGC");
        assert!(find_primers(&s, &SearchConfig::default()).unwrap().is_empty());
        assert!(find_primers(&DnaSequence::default(), &SearchConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn candidates_satisfy_filters() {
        let s = seq("GATTACAGCGTACGATCGGCTAGCTAGGCTTACGATCGATGCGCTAGCATGCAATCGGACTAGCATCGGATCG");
        for mode in [SearchMode::Shrinking, SearchMode::FullSequence] {
            let config = SearchConfig { mode, ..SearchConfig::default() };
            let hits = find_primers(&s, &config).unwrap();
            assert!(!hits.is_empty());
            for p in &hits {
                assert_eq!(p.bases.len(), p.length);
                assert!((config.min_length..=config.max_length).contains(&p.length));
                assert!((config.min_melt_temp..=config.max_melt_temp).contains(&p.melting_temp));
                assert!((config.min_gc..=config.max_gc).contains(&p.gc_content));
                assert_eq!(p.melting_temp, melting_temp(p.bases.as_bytes()).unwrap());
                assert_eq!(p.gc_content, gc_content(p.bases.as_bytes()).unwrap());
                assert_eq!(p.bases.as_str(), &s.as_str()[p.start_offset..p.start_offset + p.length]);
            }
            assert_eq!(summary(&hits), naive_search(&s, &config));
        }
    }

    #[test]
    fn ordering_is_length_desc_then_offset_asc() {
        let s = seq("GATTACAGCGTACGATCGGCTAGCTAGGCTTACGATCGATGCGCTAGCATGCAATCGGACTAGCATCGGATCG");
        let hits = find_primers(&s, &SearchConfig::default()).unwrap();
        for pair in hits.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.length > b.length || (a.length == b.length && a.start_offset < b.start_offset));
        }
    }

    #[test]
    fn shrinking_drops_hits_near_the_end() {
        // 唯一合格的 17-mer 位于序列末尾附近：修正模式能找到，兼容模式找不到
        let primer = "GCGATCGTAGCATTACG"; // 9 GC + 8 AT: Tm 52
        let s = seq(&format!("{}{}{}", "A".repeat(20), primer, "TT"));
        let config = SearchConfig {
            min_melt_temp: 52.0,
            max_melt_temp: 52.0,
            min_gc: 50.0,
            max_gc: 55.0,
            min_length: 17,
            max_length: 25,
            ..SearchConfig::default()
        };
        let shrinking = find_primers(&s, &config).unwrap();
        assert!(shrinking.iter().all(|p| p.bases.as_str() != primer));

        let full = find_primers(&s, &SearchConfig { mode: SearchMode::FullSequence, ..config }).unwrap();
        let found: Vec<_> = full.iter().filter(|p| p.bases.as_str() == primer).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start_offset, 20);
    }

    #[test]
    fn invalid_config_rejected() {
        let s = seq(ATCG32);
        let bad = [
            SearchConfig { min_length: 0, ..SearchConfig::default() },
            SearchConfig { min_length: 26, ..SearchConfig::default() },
            SearchConfig { min_melt_temp: 61.0, ..SearchConfig::default() },
            SearchConfig { min_gc: 70.0, ..SearchConfig::default() },
        ];
        for c in bad {
            assert!(matches!(find_primers(&s, &c), Err(PrimerError::InvalidConfig(_))));
        }
    }

    #[test]
    fn non_finite_bounds_rejected() {
        let s = seq(ATCG32);
        let bad = [
            SearchConfig { min_melt_temp: f64::NAN, ..SearchConfig::default() },
            SearchConfig { max_melt_temp: f64::INFINITY, ..SearchConfig::default() },
            SearchConfig { min_gc: f64::NEG_INFINITY, ..SearchConfig::default() },
            SearchConfig { max_gc: f64::NAN, ..SearchConfig::default() },
        ];
        for c in bad {
            assert!(matches!(c.validate(), Err(PrimerError::InvalidConfig(_))), "{:?}", c);
            assert!(find_primers(&s, &c).is_err());
        }
    }

    #[test]
    fn huge_max_length_is_bounded_by_sequence() {
        let s = seq(ATCG32);
        let huge = SearchConfig { max_length: usize::MAX, ..SearchConfig::default() };
        assert!(huge.validate().is_ok());

        // Shrinking：每个长度的位置数为 32 - max_length，恒为空
        assert!(search_windows(s.len(), &huge).is_empty());
        assert!(find_primers(&s, &huge).unwrap().is_empty());
        let at_len = SearchConfig { max_length: 32, ..SearchConfig::default() };
        assert!(find_primers(&s, &at_len).unwrap().is_empty());

        // FullSequence：从 31 开始，与 max_length = 31 完全一致
        let huge_full = SearchConfig { mode: SearchMode::FullSequence, ..huge };
        let windows = search_windows(s.len(), &huge_full);
        assert_eq!(windows.first(), Some(&(31, 32)));
        assert_eq!(windows.len(), 31 - 17 + 1);
        let capped = SearchConfig { max_length: 31, ..huge_full };
        assert_eq!(find_primers(&s, &huge_full).unwrap(), find_primers(&s, &capped).unwrap());
        assert_eq!(summary(&find_primers(&s, &capped).unwrap()), naive_search(&s, &capped));
    }

    #[test]
    fn config_from_partial_json() {
        let c: SearchConfig = serde_json::from_str(r#"{"min_length": 18, "mode": "full_sequence"}"#).unwrap();
        assert_eq!(c.min_length, 18);
        assert_eq!(c.max_length, 25);
        assert_eq!(c.mode, SearchMode::FullSequence);
    }

    #[test]
    fn batch_matches_sequential_in_order() {
        let seqs = vec![
            seq("GATTACAGCGTACGATCGGCTAGCTAGGCTTACGATCGATGCGCTAGCATGCAATCGGACTAGCATCGGATCG"),
            seq(&"A".repeat(30)),
            seq("CGATCGGCTAGCTAGGCTTACGATCGATGCGCTAGCATGCAATCGG"),
        ];
        let config = SearchConfig::default();
        let batch = find_primers_batch(&seqs, &config).unwrap();
        assert_eq!(batch.len(), seqs.len());
        for (s, hits) in seqs.iter().zip(&batch) {
            assert_eq!(hits, &find_primers(s, &config).unwrap());
        }
        assert!(batch[1].is_empty());
    }
}
