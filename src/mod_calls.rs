use derive_new::new;
use log::debug;
use log_once::debug_once;
use rust_htslib::bam;

use crate::errs::RunError;
use crate::mod_base_code::{DnaBase, ModKind};
use crate::util::Strand;

/// Stand-in base for a neighbor that falls off either end of the read.
const NO_NEIGHBOR: u8 = b'\0';

#[derive(Debug, Copy, Clone, Eq, PartialEq, new)]
pub struct ModCall {
    pub kind: ModKind,
    pub qual: u8,
}

/// All of the calls htslib reports at one read position, in the order they
/// appear in the MM tag.
#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct PositionCalls {
    pub position: usize,
    pub calls: Vec<ModCall>,
}

impl PositionCalls {
    fn first_of(&self, kind: ModKind) -> Option<usize> {
        self.calls.iter().position(|call| call.kind == kind)
    }

    /// Hydroxymethylation and methylation qualities at this position, or
    /// `None` unless both are present.
    pub fn paired_quals(&self) -> Option<(u8, u8)> {
        let h_idx = self.first_of(ModKind::Hydroxy)?;
        let m_idx = self.first_of(ModKind::Methyl)?;
        if m_idx < h_idx {
            debug_once!(
                "methylation call precedes hydroxymethylation call at a \
                 position, assigning by modification code"
            );
        }
        Some((self.calls[h_idx].qual, self.calls[m_idx].qual))
    }

    /// Modification codes at this position in MM tag order, e.g. "hm".
    pub fn kind_codes(&self) -> String {
        self.calls.iter().map(|call| call.kind.char()).collect()
    }
}

/// The parts of an alignment record the extractor needs: the read sequence
/// as stored, its strand and the per-position modification calls.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ModCallRecord {
    seq: Vec<u8>,
    strand: Strand,
    positions: Vec<PositionCalls>,
}

impl ModCallRecord {
    pub fn new(
        seq: &[u8],
        strand: Strand,
        positions: Vec<PositionCalls>,
    ) -> Self {
        Self { seq: seq.to_vec(), strand, positions }
    }

    pub fn from_bam_record(record: &bam::Record) -> Result<Self, RunError> {
        if record.seq_len() == 0 {
            return Err(RunError::new_skipped("empty read sequence"));
        }
        let seq = record.seq().as_bytes();
        let strand = Strand::from_record(record);
        let position_iter = record.basemods_position_iter().map_err(|e| {
            RunError::new_input_error(format!(
                "failed to parse MM/ML tags, {e}"
            ))
        })?;

        let mut positions = Vec::new();
        for result in position_iter {
            let (pos, mods) = result.map_err(|e| {
                RunError::new_input_error(format!(
                    "failed to iterate base modifications, {e}"
                ))
            })?;
            let position = usize::try_from(pos).map_err(|_| {
                RunError::new_input_error(format!(
                    "invalid modification position {pos}"
                ))
            })?;
            let calls = mods
                .iter()
                .filter_map(|base_mod| {
                    let kind =
                        ModKind::from_htslib_code(base_mod.modified_base)?;
                    // htslib reports -1 when there is no ML value
                    let qual = u8::try_from(base_mod.qual).ok()?;
                    Some(ModCall::new(kind, qual))
                })
                .collect::<Vec<ModCall>>();
            if !calls.is_empty() {
                positions.push(PositionCalls::new(position, calls));
            }
        }

        Ok(Self { seq, strand, positions })
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn has_calls(&self) -> bool {
        !self.positions.is_empty()
    }

    /// Base used as the context of a call at `position`. On the forward
    /// strand this is the following base, on the reverse strand the
    /// preceding one.
    pub fn context_neighbor(&self, position: usize) -> u8 {
        let idx = match self.strand {
            Strand::Positive => position.checked_add(1),
            Strand::Negative => position.checked_sub(1),
        };
        idx.and_then(|i| self.seq.get(i).copied()).unwrap_or(NO_NEIGHBOR)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, new)]
pub struct ContextCall {
    pub context: DnaBase,
    pub kind: ModKind,
    pub qual: u8,
    pub strand: Strand,
}

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct CallExtraction {
    pub calls: Vec<ContextCall>,
    pub num_positions_used: u64,
    pub num_invalid_context: u64,
    pub num_unpaired: u64,
}

/// Turn the calls on one record into context-tagged calls. Each surviving
/// position produces exactly one hydroxymethylation and one methylation
/// call; positions missing either kind or lacking a valid neighbor produce
/// nothing.
pub fn extract_context_calls(record: &ModCallRecord) -> CallExtraction {
    let mut extraction = CallExtraction::default();
    for position_calls in record.positions.iter() {
        let Some((h_qual, m_qual)) = position_calls.paired_quals() else {
            debug!(
                "unpaired calls '{}' at position {}, dropping calls",
                position_calls.kind_codes(),
                position_calls.position
            );
            extraction.num_unpaired += 1;
            continue;
        };
        let neighbor = record.context_neighbor(position_calls.position);
        let Some(context) = DnaBase::classify(neighbor) else {
            debug!(
                "no valid context at position {} ({} strand), dropping calls",
                position_calls.position,
                record.strand.to_char()
            );
            extraction.num_invalid_context += 1;
            continue;
        };
        extraction.calls.push(ContextCall::new(
            context,
            ModKind::Hydroxy,
            h_qual,
            record.strand,
        ));
        extraction.calls.push(ContextCall::new(
            context,
            ModKind::Methyl,
            m_qual,
            record.strand,
        ));
        extraction.num_positions_used += 1;
    }
    extraction
}
