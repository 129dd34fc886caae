use anyhow::{Context, Result};
use std::io::BufRead;

use crate::util::dna::{self, DnaSequence};

/// 一条已校验的模板序列
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: DnaSequence,
}

pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    peek_header: Option<String>,
    line_no: usize,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            done: false,
            peek_header: None,
            line_no: 0,
        }
    }

    fn read_line(&mut self) -> Result<usize> {
        self.buf.clear();
        let n = self.reader.read_line(&mut self.buf)?;
        if n > 0 {
            self.line_no += 1;
        }
        Ok(n)
    }

    /// 读取下一条记录；序列去空白、转大写后按 {A,T,C,G} 校验。
    pub fn next_record(&mut self) -> Result<Option<TemplateRecord>> {
        if self.done {
            return Ok(None);
        }

        let header = if let Some(h) = self.peek_header.take() {
            h
        } else {
            loop {
                if self.read_line()? == 0 {
                    self.done = true;
                    return Ok(None);
                }
                if let Some(rest) = self.buf.strip_prefix('>') {
                    break rest.trim().to_string();
                }
            }
        };

        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or("").to_string();
        let desc = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let mut raw: Vec<u8> = Vec::new();
        loop {
            if self.read_line()? == 0 {
                self.done = true;
                break;
            }
            if let Some(rest) = self.buf.strip_prefix('>') {
                self.peek_header = Some(rest.trim().to_string());
                break;
            }
            raw.extend_from_slice(self.buf.as_bytes());
        }

        let seq = DnaSequence::from_bytes(&dna::normalize_seq(&raw))
            .with_context(|| format!("record '{}' ending at line {}", id, self.line_no))?;

        Ok(Some(TemplateRecord { id, desc, seq }))
    }
}

/// 读取整个 FASTA 文件
pub fn read_templates(path: &str) -> Result<Vec<TemplateRecord>> {
    let fh = std::fs::File::open(path).with_context(|| format!("cannot open FASTA '{}'", path))?;
    let mut reader = FastaReader::new(std::io::BufReader::new(fh));
    let mut records = Vec::new();
    while let Some(rec) = reader.next_record()? {
        records.push(rec);
    }
    if records.is_empty() {
        anyhow::bail!("FASTA file '{}' contains no sequences", path);
    }
    Ok(records)
}
