use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::primer::search::{PrimerCandidate, SearchConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Tsv,
    Json,
}

/// JSON 报告外层：工具信息、生成时间与搜索参数
#[derive(Debug, Serialize)]
pub struct Report<'a, T: Serialize> {
    pub tool: &'static str,
    pub version: &'static str,
    pub generated_at: String,
    pub config: &'a SearchConfig,
    pub results: T,
}

impl<'a, T: Serialize> Report<'a, T> {
    pub fn new(config: &'a SearchConfig, results: T) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            generated_at: chrono::Utc::now().to_rfc3339(),
            config,
            results,
        }
    }
}

pub fn write_json<W: Write, T: Serialize>(out: &mut W, report: &Report<'_, T>) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

pub const TSV_HEADER: &str = "template\tstrand\tlength\tstart_offset\tsequence\ttm\tgc";

pub fn write_tsv_header<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "{}", TSV_HEADER)?;
    Ok(())
}

/// 每个候选一行；strand 为 forward / reverse
pub fn write_tsv_rows<W: Write>(out: &mut W, template: &str, strand: &str, primers: &[PrimerCandidate]) -> Result<()> {
    for p in primers {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{:.1}\t{:.2}",
            template, strand, p.length, p.start_offset, p.bases, p.melting_temp, p.gc_content
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::dna::DnaSequence;

    fn candidate() -> PrimerCandidate {
        PrimerCandidate {
            bases: DnaSequence::parse("ATCGATCGATCGATCGATCG").unwrap(),
            length: 20,
            start_offset: 3,
            melting_temp: 60.0,
            gc_content: 50.0,
        }
    }

    #[test]
    fn tsv_rows() {
        let mut buf = Vec::new();
        write_tsv_header(&mut buf).unwrap();
        write_tsv_rows(&mut buf, "tmpl", "forward", &[candidate()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], TSV_HEADER);
        assert_eq!(lines[1], "tmpl\tforward\t20\t3\tATCGATCGATCGATCGATCG\t60.0\t50.00");
    }

    #[test]
    fn json_report_carries_config_and_results() {
        let config = SearchConfig::default();
        let mut buf = Vec::new();
        write_json(&mut buf, &Report::new(&config, vec![candidate()])).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["tool"], "primer-rust");
        assert_eq!(v["config"]["min_length"], 17);
        assert_eq!(v["config"]["mode"], "shrinking");
        assert_eq!(v["results"][0]["bases"], "ATCGATCGATCGATCGATCG");
        assert_eq!(v["results"][0]["start_offset"], 3);
        assert!(v["generated_at"].as_str().unwrap().contains('T'));
    }
}
