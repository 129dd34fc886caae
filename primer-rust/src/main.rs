use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::{BufRead, Write};

use primer_rust::config::{self, SearchOverrides};
use primer_rust::io::{fasta, report};
use primer_rust::io::report::OutputFormat;
use primer_rust::primer::{self, DesignOptions, PrimerCandidate, SearchConfig, SplitMode};
use primer_rust::util::dna::DnaSequence;

/// stderr 诊断输出，--quiet 时关闭
macro_rules! info {
    ($quiet:expr, $($arg:tt)*) => {
        if !$quiet {
            eprintln!("[primer-rust] {}", format_args!($($arg)*));
        }
    };
}

#[derive(Parser, Debug)]
#[command(name = "primer-rust", author, version, about = "PCR primer discovery by Tm / GC sliding-window search", arg_required_else_help = true)]
struct Cli {
    /// Suppress diagnostics on stderr
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// JSON file with search parameters (flags below override it)
    #[arg(long)]
    config: Option<String>,
    #[arg(long = "min-length")]
    min_length: Option<usize>,
    #[arg(long = "max-length")]
    max_length: Option<usize>,
    #[arg(long = "min-tm")]
    min_melt_temp: Option<f64>,
    #[arg(long = "max-tm")]
    max_melt_temp: Option<f64>,
    #[arg(long = "min-gc")]
    min_gc: Option<f64>,
    #[arg(long = "max-gc")]
    max_gc: Option<f64>,
    /// Scan the whole sequence for every primer length instead of the shrinking window
    #[arg(long = "full-sequence")]
    full_sequence: bool,
}

impl SearchArgs {
    fn resolve(&self) -> Result<SearchConfig> {
        let overrides = SearchOverrides {
            min_length: self.min_length,
            max_length: self.max_length,
            min_melt_temp: self.min_melt_temp,
            max_melt_temp: self.max_melt_temp,
            min_gc: self.min_gc,
            max_gc: self.max_gc,
            full_sequence: self.full_sequence,
        };
        config::resolve(self.config.as_deref(), &overrides)
    }
}

#[derive(Args, Debug)]
struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
    format: OutputFormat,
    /// Output path (stdout if omitted)
    #[arg(short, long)]
    out: Option<String>,
}

impl OutputArgs {
    fn writer(&self) -> Result<Box<dyn Write>> {
        Ok(if let Some(p) = &self.out {
            let fh = std::fs::File::create(p).with_context(|| format!("cannot create output '{}'", p))?;
            Box::new(std::io::BufWriter::new(fh))
        } else {
            Box::new(std::io::BufWriter::new(std::io::stdout()))
        })
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find primer candidates in one or more sequences
    Search {
        /// Template sequence (prompted on stdin if neither this nor --fasta is given)
        #[arg(conflicts_with = "fasta")]
        sequence: Option<String>,
        /// FASTA file with one or more templates
        #[arg(long)]
        fasta: Option<String>,
        #[command(flatten)]
        search: SearchArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
    },
    /// Split a sequence into 5' flank, annealing area and 3' flank
    Split {
        sequence: Option<String>,
        #[arg(long)]
        start: usize,
        #[arg(long)]
        end: usize,
        #[arg(long = "max-primer-length", default_value_t = 25)]
        max_primer_length: usize,
        /// Do not extend the 5' flank past the annealing start
        #[arg(long)]
        plain: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Split around an annealing area and search forward / reverse primers on the flanks
    Design {
        sequence: Option<String>,
        #[arg(long)]
        start: usize,
        #[arg(long)]
        end: usize,
        #[arg(long)]
        plain: bool,
        #[command(flatten)]
        search: SearchArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print length, GC content, Wallace Tm and (reverse) complement of a sequence
    Stats { sequence: Option<String> },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let quiet = cli.quiet;
    match cli.command {
        Commands::Search { sequence, fasta, search, output, threads } => {
            run_search(sequence.as_deref(), fasta.as_deref(), &search, &output, threads, quiet)
        }
        Commands::Split { sequence, start, end, max_primer_length, plain, output } => {
            let seq = obtain_sequence(sequence.as_deref())?;
            run_split(&seq, start, end, max_primer_length, split_mode(plain), &output, quiet)
        }
        Commands::Design { sequence, start, end, plain, search, output } => {
            let seq = obtain_sequence(sequence.as_deref())?;
            let opts = DesignOptions { search: search.resolve()?, split_mode: split_mode(plain) };
            run_design(&seq, start, end, &opts, &output, quiet)
        }
        Commands::Stats { sequence } => {
            let seq = obtain_sequence(sequence.as_deref())?;
            run_stats(&seq)
        }
    }
}

fn split_mode(plain: bool) -> SplitMode {
    if plain { SplitMode::Plain } else { SplitMode::Extended }
}

/// 命令行给出则直接校验；否则在 stdin 上反复提示直到输入合法
fn obtain_sequence(arg: Option<&str>) -> Result<DnaSequence> {
    match arg {
        Some(raw) => Ok(DnaSequence::parse(raw)?),
        None => prompt_sequence(),
    }
}

fn prompt_sequence() -> Result<DnaSequence> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        eprint!("Sequence: ");
        std::io::stderr().flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            anyhow::bail!("no sequence entered");
        }
        match DnaSequence::parse(&line) {
            Ok(seq) if !seq.is_empty() => return Ok(seq),
            Ok(_) => {}
            Err(e) => eprintln!("{}", e),
        }
    }
}

#[derive(Serialize)]
struct TemplateHits<'a> {
    template: &'a str,
    length: usize,
    primers: &'a [PrimerCandidate],
}

fn run_search(
    sequence: Option<&str>,
    fasta_path: Option<&str>,
    search: &SearchArgs,
    output: &OutputArgs,
    threads: usize,
    quiet: bool,
) -> Result<()> {
    let config = search.resolve()?;

    let (ids, seqs): (Vec<String>, Vec<DnaSequence>) = match fasta_path {
        Some(path) => fasta::read_templates(path)?.into_iter().map(|r| (r.id, r.seq)).unzip(),
        None => (vec!["input".to_string()], vec![obtain_sequence(sequence)?]),
    };

    info!(quiet, "templates: {}", seqs.len());
    info!(quiet, "total_len: {}", seqs.iter().map(DnaSequence::len).sum::<usize>());
    info!(
        quiet,
        "length {}..={}, tm {}..={}, gc {}..={}, mode {:?}",
        config.min_length, config.max_length, config.min_melt_temp, config.max_melt_temp,
        config.min_gc, config.max_gc, config.mode
    );

    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads.max(1)).build()?;
    let hits = pool.install(|| primer::find_primers_batch(&seqs, &config))?;

    let mut out = output.writer()?;
    match output.format {
        OutputFormat::Tsv => {
            report::write_tsv_header(&mut out)?;
            for (id, primers) in ids.iter().zip(&hits) {
                report::write_tsv_rows(&mut out, id, "forward", primers)?;
            }
        }
        OutputFormat::Json => {
            let results: Vec<TemplateHits> = ids
                .iter()
                .zip(&seqs)
                .zip(&hits)
                .map(|((id, seq), primers)| TemplateHits { template: id, length: seq.len(), primers })
                .collect();
            report::write_json(&mut out, &report::Report::new(&config, results))?;
        }
    }
    out.flush()?;

    info!(quiet, "candidates: {}", hits.iter().map(Vec::len).sum::<usize>());
    Ok(())
}

fn run_split(
    seq: &DnaSequence,
    start: usize,
    end: usize,
    max_primer_length: usize,
    mode: SplitMode,
    output: &OutputArgs,
    quiet: bool,
) -> Result<()> {
    let parts = primer::split(seq, start, end, max_primer_length, mode)?;
    info!(
        quiet,
        "five_end={} annealing_area={} three_end={} ({:?})",
        parts.five_end.len(), parts.annealing_area.len(), parts.three_end.len(), mode
    );

    let mut out = output.writer()?;
    match output.format {
        OutputFormat::Tsv => {
            writeln!(out, "five_end\t{}", parts.five_end)?;
            writeln!(out, "annealing_area\t{}", parts.annealing_area)?;
            writeln!(out, "three_end\t{}", parts.three_end)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &parts)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn run_design(
    seq: &DnaSequence,
    start: usize,
    end: usize,
    opts: &DesignOptions,
    output: &OutputArgs,
    quiet: bool,
) -> Result<()> {
    let design = primer::design(seq, start, end, opts)?;
    info!(quiet, "annealing area: {}..{} ({} bp)", start, end, design.split.annealing_area.len());
    info!(quiet, "forward candidates: {}", design.forward.len());
    info!(quiet, "reverse candidates: {}", design.reverse.len());

    let mut out = output.writer()?;
    match output.format {
        OutputFormat::Tsv => {
            report::write_tsv_header(&mut out)?;
            report::write_tsv_rows(&mut out, "five_end", "forward", &design.forward)?;
            report::write_tsv_rows(&mut out, "three_end", "reverse", &design.reverse)?;
        }
        OutputFormat::Json => {
            report::write_json(&mut out, &report::Report::new(&opts.search, &design))?;
        }
    }
    out.flush()?;
    Ok(())
}

fn run_stats(seq: &DnaSequence) -> Result<()> {
    let gc = primer::gc_content(seq.as_bytes())?;
    let tm = primer::melting_temp(seq.as_bytes())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "sequence: {}", seq)?;
    writeln!(out, "length: {}", seq.len())?;
    writeln!(out, "gc: {:.2}", gc)?;
    writeln!(out, "tm_wallace: {:.1}", tm)?;
    writeln!(out, "complement: {}", seq.complement())?;
    writeln!(out, "reverse_complement: {}", seq.reverse_complement())?;
    Ok(())
}
