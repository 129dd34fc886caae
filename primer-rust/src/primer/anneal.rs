use serde::{Deserialize, Serialize};

use crate::error::{PrimerError, Result};
use crate::util::dna::DnaSequence;

/// 5' 侧片段的切法
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// five_end = seq[0 .. start + max_primer_length)，
    /// 跨越退火区域左边界的引物也能完整落在 5' 片段内
    #[default]
    Extended,
    /// five_end = seq[0 .. start)
    Plain,
}

/// 序列按退火区域切成三段
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnnealingSplit {
    pub five_end: DnaSequence,
    pub three_end: DnaSequence,
    pub annealing_area: DnaSequence,
}

/// 以 [position_start, position_end) 为退火区域切分序列。
///
/// 位置倒置或超出序列长度时返回 `InvalidRange`；
/// Extended 模式下 5' 片段的延伸部分截断到序列末尾。
pub fn split(
    sequence: &DnaSequence,
    position_start: usize,
    position_end: usize,
    max_primer_length: usize,
    mode: SplitMode,
) -> Result<AnnealingSplit> {
    let len = sequence.len();
    if position_start > position_end || position_end > len {
        return Err(PrimerError::InvalidRange { start: position_start, end: position_end, len });
    }

    let five_end_stop = match mode {
        SplitMode::Extended => position_start.saturating_add(max_primer_length).min(len),
        SplitMode::Plain => position_start,
    };

    Ok(AnnealingSplit {
        five_end: sequence.slice(0, five_end_stop),
        three_end: sequence.slice(position_end, len),
        annealing_area: sequence.slice(position_start, position_end),
    })
}
