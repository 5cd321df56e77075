/// Column-wise promoter table, one entry per input row. Row order is the
/// input file order and is preserved all the way to the output.
#[derive(Debug, Clone)]
pub struct PromoterTable {
    pub seqnames: Vec<String>,
    /// Integer seqname codes, shared with the TSS table.
    pub chrs: Vec<u32>,
    pub starts: Vec<i64>,
    pub ends: Vec<i64>,
}

impl PromoterTable {
    pub fn len(&self) -> usize {
        self.chrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chrs.is_empty()
    }
}

/// Column-wise TSS position table. Duplicate positions are kept; each row is
/// an independent observation.
#[derive(Debug, Clone)]
pub struct TssTable {
    pub chrs: Vec<u32>,
    pub positions: Vec<i64>,
}

impl TssTable {
    pub fn len(&self) -> usize {
        self.chrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chrs.is_empty()
    }
}

/// Promoter class derived from the shape index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcType {
    Sharp,
    Broad,
}

impl TcType {
    pub fn as_str(self) -> &'static str {
        match self {
            TcType::Sharp => "Sharp",
            TcType::Broad => "Broad",
        }
    }
}

/// Per-promoter result. The statistic fields are `None` when no TSS position
/// overlaps the promoter; that is a normal outcome, not an error.
#[derive(Debug, Clone)]
pub struct PromoterShape {
    pub total_tss: u32,
    /// Overlapping TSS positions in their original relative order,
    /// duplicates included. Empty when `total_tss` is 0.
    pub tss_positions: Vec<i64>,
    pub shape_index: Option<f64>,
    pub tc_type: Option<TcType>,
}
