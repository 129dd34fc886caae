//! 演示如何在 library 模式下使用 primer-rust 切分退火区域并查找引物。
//!
//! 运行方式：
//! ```bash
//! cargo run --example design_primers
//! ```

use primer_rust::primer::{self, DesignOptions, SearchConfig, SearchMode, SplitMode};
use primer_rust::util::dna::DnaSequence;

fn main() -> Result<(), primer_rust::PrimerError> {
    // 1. 模板序列：两端各一段适合作引物的区域
    let template = DnaSequence::parse(
        "GATTACAGCGTACGATCGGCTAGCTAGGCTTACGATCGATGCGCTAGCATGCAATCGGACTAGCATCGGATCG\
         ATATATATATATATATATATATATATATATATATATATAT\
         CGTAGCTAGGCTTACGATCGATGCGCTAGCATGCAATCGGACTAGCATCGGATCGGATTACAGCGTACGATCG",
    )?;
    println!("模板长度: {} bp", template.len());
    println!("GC: {:.2}%  Tm(Wallace): {:.0}", primer::gc_content(template.as_bytes())?, primer::melting_temp(template.as_bytes())?);

    // 2. 退火区域切分
    let parts = primer::split(&template, 73, 113, 25, SplitMode::Extended)?;
    println!("\n5' 片段: {} bp", parts.five_end.len());
    println!("退火区域: {}", parts.annealing_area);
    println!("3' 片段: {} bp", parts.three_end.len());

    // 3. 兼容模式 vs 全序列模式
    let compat = primer::find_primers(&parts.five_end, &SearchConfig::default())?;
    let full_cfg = SearchConfig { mode: SearchMode::FullSequence, ..SearchConfig::default() };
    let full = primer::find_primers(&parts.five_end, &full_cfg)?;
    println!("\n5' 片段候选：兼容模式 {} 条，全序列模式 {} 条", compat.len(), full.len());

    // 4. 引物对设计
    let design = primer::design(&template, 73, 113, &DesignOptions::default())?;
    println!("\n正向引物（前 5 条）:");
    for p in design.forward.iter().take(5) {
        println!("  {} len={} offset={} Tm={:.0} GC={:.1}%", p.bases, p.length, p.start_offset, p.melting_temp, p.gc_content);
    }
    println!("反向引物（前 5 条）:");
    for p in design.reverse.iter().take(5) {
        println!("  {} len={} offset={} Tm={:.0} GC={:.1}%", p.bases, p.length, p.start_offset, p.melting_temp, p.gc_content);
    }

    println!("\n完成！");
    Ok(())
}
