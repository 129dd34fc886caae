//! # primer-rust
//!
//! PCR 引物设计辅助工具：在 DNA 序列上查找满足长度、熔解温度（Wallace 规则）
//! 与 GC 含量约束的候选引物，并可按退火区域把序列切成 5' / 退火区 / 3' 三段。
//!
//! ## 快速示例
//!
//! ```rust
//! use primer_rust::primer::{find_primers, split, SearchConfig, SplitMode};
//! use primer_rust::util::dna::DnaSequence;
//!
//! let seq = DnaSequence::parse("ATCGATCGATCGATCGATCGATCGATCGATCG").unwrap();
//! let hits = find_primers(&seq, &SearchConfig::default()).unwrap();
//! assert!(hits.iter().all(|p| p.bases.len() == p.length));
//!
//! let parts = split(&seq, 4, 8, 25, SplitMode::Extended).unwrap();
//! assert_eq!(parts.annealing_area.as_str(), "ATCG");
//! ```
//!
//! ## 模块说明
//!
//! - [`util`] — 序列清洗、字母表校验、互补 / 反向互补
//! - [`primer`] — GC / Tm 计算、滑动窗口引物搜索、退火区域切分、引物对设计
//! - [`io`] — FASTA 读取与 TSV / JSON 结果输出
//! - [`config`] — 搜索参数的配置文件与命令行覆盖
//! - [`error`] — 核心错误类型

pub mod config;
pub mod error;
pub mod io;
pub mod primer;
pub mod util;

pub use error::PrimerError;
