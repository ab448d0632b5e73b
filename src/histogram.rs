use crate::mod_base_code::{DnaBase, ModKind, NUM_CONTEXTS};
use crate::mod_calls::{
    extract_context_calls, CallExtraction, ContextCall, ModCallRecord,
};
use crate::util::Strand;

/// One bucket per possible ML value.
pub const NUM_QUALS: usize = 256;

pub type QualHistogram = [u64; NUM_QUALS];

/// Quality histograms for each neighbor context, indexed by
/// [`DnaBase::index`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ContextTable {
    counts: [QualHistogram; NUM_CONTEXTS],
}

impl ContextTable {
    pub fn zero() -> Self {
        Self { counts: [[0u64; NUM_QUALS]; NUM_CONTEXTS] }
    }

    #[inline]
    pub fn increment(&mut self, context: DnaBase, qual: u8) {
        self.counts[context.index()][qual as usize] += 1;
    }

    pub fn histogram(&self, context: DnaBase) -> &QualHistogram {
        &self.counts[context.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &QualHistogram> {
        self.counts.iter()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub(crate) fn add_assign(&mut self, other: &Self) {
        for (agg, hist) in self.counts.iter_mut().zip(other.counts.iter()) {
            for (a, b) in agg.iter_mut().zip(hist.iter()) {
                *a += *b;
            }
        }
    }
}

/// Counts of extraction outcomes, accumulated along with the histograms.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct ExtractionCounts {
    pub num_records: u64,
    pub num_records_with_calls: u64,
    /// Records that contributed at least one position to the histograms.
    pub num_records_used: u64,
    pub num_records_failed: u64,
    pub num_positions_used: u64,
    pub num_invalid_context: u64,
    pub num_unpaired: u64,
}

impl ExtractionCounts {
    pub(crate) fn add_assign(&mut self, other: &Self) {
        self.num_records += other.num_records;
        self.num_records_with_calls += other.num_records_with_calls;
        self.num_records_used += other.num_records_used;
        self.num_records_failed += other.num_records_failed;
        self.num_positions_used += other.num_positions_used;
        self.num_invalid_context += other.num_invalid_context;
        self.num_unpaired += other.num_unpaired;
    }
}

/// The four accumulate-only tables: {methylation, hydroxymethylation} x
/// {forward, reverse}. Owned by whoever is doing the accumulation, a
/// parallel scan keeps one per worker and reduces them at the end.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ContextHistograms {
    methyl_fwd: ContextTable,
    methyl_rev: ContextTable,
    hydroxy_fwd: ContextTable,
    hydroxy_rev: ContextTable,
    counts: ExtractionCounts,
}

impl Default for ContextHistograms {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextHistograms {
    pub fn new() -> Self {
        Self {
            methyl_fwd: ContextTable::zero(),
            methyl_rev: ContextTable::zero(),
            hydroxy_fwd: ContextTable::zero(),
            hydroxy_rev: ContextTable::zero(),
            counts: ExtractionCounts::default(),
        }
    }

    pub fn table(&self, kind: ModKind, strand: Strand) -> &ContextTable {
        match (kind, strand) {
            (ModKind::Methyl, Strand::Positive) => &self.methyl_fwd,
            (ModKind::Methyl, Strand::Negative) => &self.methyl_rev,
            (ModKind::Hydroxy, Strand::Positive) => &self.hydroxy_fwd,
            (ModKind::Hydroxy, Strand::Negative) => &self.hydroxy_rev,
        }
    }

    fn table_mut(
        &mut self,
        kind: ModKind,
        strand: Strand,
    ) -> &mut ContextTable {
        match (kind, strand) {
            (ModKind::Methyl, Strand::Positive) => &mut self.methyl_fwd,
            (ModKind::Methyl, Strand::Negative) => &mut self.methyl_rev,
            (ModKind::Hydroxy, Strand::Positive) => &mut self.hydroxy_fwd,
            (ModKind::Hydroxy, Strand::Negative) => &mut self.hydroxy_rev,
        }
    }

    pub fn counts(&self) -> &ExtractionCounts {
        &self.counts
    }

    #[inline]
    pub fn add_call(&mut self, call: &ContextCall) {
        self.table_mut(call.kind, call.strand)
            .increment(call.context, call.qual);
    }

    pub fn add_extraction(&mut self, extraction: &CallExtraction) {
        for call in extraction.calls.iter() {
            self.add_call(call);
        }
        self.counts.num_positions_used += extraction.num_positions_used;
        self.counts.num_invalid_context += extraction.num_invalid_context;
        self.counts.num_unpaired += extraction.num_unpaired;
    }

    /// Extract and accumulate the calls on one record.
    pub fn add_record(&mut self, record: &ModCallRecord) {
        self.counts.num_records += 1;
        if record.has_calls() {
            self.counts.num_records_with_calls += 1;
        }
        let extraction = extract_context_calls(record);
        if extraction.num_positions_used > 0 {
            self.counts.num_records_used += 1;
        }
        self.add_extraction(&extraction);
    }

    /// Records that were read but whose modification calls could not be
    /// used at all.
    pub(crate) fn add_failed_records(&mut self, n: u64) {
        self.counts.num_records += n;
        self.counts.num_records_failed += n;
    }

    /// Total number of increments over all four tables.
    pub fn total_calls(&self) -> u64 {
        self.methyl_fwd.total()
            + self.methyl_rev.total()
            + self.hydroxy_fwd.total()
            + self.hydroxy_rev.total()
    }

    pub(crate) fn add_assign(&mut self, other: &Self) {
        self.methyl_fwd.add_assign(&other.methyl_fwd);
        self.methyl_rev.add_assign(&other.methyl_rev);
        self.hydroxy_fwd.add_assign(&other.hydroxy_fwd);
        self.hydroxy_rev.add_assign(&other.hydroxy_rev);
        self.counts.add_assign(&other.counts);
    }
}
