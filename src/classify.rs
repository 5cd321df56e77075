use log::info;
use rustc_hash::FxHashMap;

use crate::shape_structs::{PromoterShape, PromoterTable, TcType, TssTable};

/// Promoters with a shape index above this cutoff are "Sharp", the rest
/// "Broad". Domain constant, taken as-is from the published analysis.
pub const SHARP_SI_CUTOFF: f64 = -1.0;

/// Collect the TSS positions falling inside `[start, end]` (inclusive) on the
/// promoter's seqname. Plain scan over the whole TSS table; the original
/// relative order of the rows is kept, duplicates included.
pub fn overlapping_tss(chr: u32, start: i64, end: i64, tss: &TssTable) -> Vec<i64> {
    tss.chrs
        .iter()
        .zip(&tss.positions)
        .filter(|(tss_chr, pos)| **tss_chr == chr && start <= **pos && **pos <= end)
        .map(|(_, pos)| *pos)
        .collect()
}

/// Shape index of a non-empty set of TSS positions: 2 minus the Shannon
/// entropy of the distribution over distinct position values.
///
/// The histogram is keyed by position value, so only observed values carry
/// probability mass and nothing ever reaches `log2(0)`. A single distinct
/// position gives entropy 0 and a shape index of exactly 2.
pub fn shape_index(positions: &[i64]) -> f64 {
    let mut counts: FxHashMap<i64, u32> = FxHashMap::default();
    for pos in positions {
        *counts.entry(*pos).or_insert(0) += 1;
    }

    let total = positions.len() as f64;
    let mut entropy = 0.0;
    for count in counts.values() {
        let p = *count as f64 / total;
        entropy -= p * p.log2();
    }

    2.0 - entropy
}

pub fn tc_type(shape_index: f64) -> TcType {
    if shape_index > SHARP_SI_CUTOFF {
        TcType::Sharp
    } else {
        TcType::Broad
    }
}

/// Compute the result for one promoter. An empty overlap set yields the
/// zero-count result with `None` statistic fields.
pub fn promoter_shape(chr: u32, start: i64, end: i64, tss: &TssTable) -> PromoterShape {
    let positions = overlapping_tss(chr, start, end, tss);

    if positions.is_empty() {
        return PromoterShape {
            total_tss: 0,
            tss_positions: Vec::new(),
            shape_index: None,
            tc_type: None,
        };
    }

    let si = shape_index(&positions);
    PromoterShape {
        total_tss: positions.len() as u32,
        shape_index: Some(si),
        tc_type: Some(tc_type(si)),
        tss_positions: positions,
    }
}

/// Classify every promoter against the full TSS table. Returns one result
/// per promoter, in promoter order.
pub fn classify_promoters(promoters: &PromoterTable, tss: &TssTable) -> Vec<PromoterShape> {
    let mut shapes = Vec::with_capacity(promoters.len());
    for i in 0..promoters.len() {
        info!(
            "Processing promoter: {} {} {}",
            promoters.seqnames[i], promoters.starts[i], promoters.ends[i]
        );
        shapes.push(promoter_shape(
            promoters.chrs[i],
            promoters.starts[i],
            promoters.ends[i],
            tss,
        ));
    }
    shapes
}
