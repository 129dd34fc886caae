use thiserror::Error;

/// 核心库的错误类型。全部为值级错误，由调用方（CLI）转换为用户可见信息。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrimerError {
    /// 序列中出现 {A, T, C, G} 之外的字符
    #[error("The input may only consist of A, T, C or G.")]
    InvalidAlphabet { base: char, position: usize },

    /// 对空序列计算 GC 含量 / Tm
    #[error("cannot compute a primer metric on an empty sequence")]
    EmptyInput,

    /// 退火区域位置越界或倒置
    #[error("invalid annealing range {start}..{end} for a sequence of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("invalid search config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PrimerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_alphabet_message_is_user_facing() {
        let e = PrimerError::InvalidAlphabet { base: 'X', position: 3 };
        assert_eq!(e.to_string(), "The input may only consist of A, T, C or G.");
    }

    #[test]
    fn invalid_range_reports_positions() {
        let e = PrimerError::InvalidRange { start: 8, end: 4, len: 16 };
        assert_eq!(e.to_string(), "invalid annealing range 8..4 for a sequence of length 16");
    }
}
