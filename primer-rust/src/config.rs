use anyhow::{Context, Result};

use crate::primer::search::{SearchConfig, SearchMode};

/// 命令行显式给出的搜索参数，未给出的字段保留配置文件 / 默认值
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SearchOverrides {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min_melt_temp: Option<f64>,
    pub max_melt_temp: Option<f64>,
    pub min_gc: Option<f64>,
    pub max_gc: Option<f64>,
    pub full_sequence: bool,
}

impl SearchOverrides {
    pub fn apply(&self, mut config: SearchConfig) -> SearchConfig {
        if let Some(v) = self.min_length {
            config.min_length = v;
        }
        if let Some(v) = self.max_length {
            config.max_length = v;
        }
        if let Some(v) = self.min_melt_temp {
            config.min_melt_temp = v;
        }
        if let Some(v) = self.max_melt_temp {
            config.max_melt_temp = v;
        }
        if let Some(v) = self.min_gc {
            config.min_gc = v;
        }
        if let Some(v) = self.max_gc {
            config.max_gc = v;
        }
        if self.full_sequence {
            config.mode = SearchMode::FullSequence;
        }
        config
    }
}

/// 从 JSON 文件读取搜索参数，缺省字段取默认值。
/// 只做反序列化，合法性在命令行覆盖之后由 [`resolve`] 检查。
pub fn load_search_config(path: &str) -> Result<SearchConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("cannot read config '{}'", path))?;
    parse_search_config(&text).with_context(|| format!("invalid config '{}'", path))
}

pub fn parse_search_config(text: &str) -> Result<SearchConfig> {
    let config: SearchConfig = serde_json::from_str(text)?;
    Ok(config)
}

/// 默认值 <- 配置文件 <- 命令行
pub fn resolve(path: Option<&str>, overrides: &SearchOverrides) -> Result<SearchConfig> {
    let base = match path {
        Some(p) => load_search_config(p)?,
        None => SearchConfig::default(),
    };
    let config = overrides.apply(base);
    config.validate()?;
    Ok(config)
}
