use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::primer::anneal::{self, AnnealingSplit, SplitMode};
use crate::primer::search::{self, PrimerCandidate, SearchConfig};
use crate::util::dna::DnaSequence;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignOptions {
    pub search: SearchConfig,
    pub split_mode: SplitMode,
}

/// 退火区域两侧的引物设计结果
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrimerDesign {
    pub split: AnnealingSplit,
    /// 5' 片段上的正向引物
    pub forward: Vec<PrimerCandidate>,
    /// 3' 片段反向互补链上的反向引物，偏移相对于反向互补序列
    pub reverse: Vec<PrimerCandidate>,
}

/// 切分序列并分别在两侧搜索引物。
/// 5' 延伸长度取 `search.max_length`。
pub fn design(
    sequence: &DnaSequence,
    position_start: usize,
    position_end: usize,
    opts: &DesignOptions,
) -> Result<PrimerDesign> {
    opts.search.validate()?;
    let split = anneal::split(sequence, position_start, position_end, opts.search.max_length, opts.split_mode)?;

    let forward = search::find_primers(&split.five_end, &opts.search)?;
    let reverse = search::find_primers(&split.three_end.reverse_complement(), &opts.search)?;

    Ok(PrimerDesign { split, forward, reverse })
}
