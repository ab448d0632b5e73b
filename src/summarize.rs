use indexmap::IndexMap;
use serde::Serialize;

use crate::histogram::{ContextHistograms, ContextTable};
use crate::mod_base_code::{DnaBase, ModKind, NUM_CONTEXTS};
use crate::util::Strand;

/// Labels for forward tables, in context index order A, C, G, T. The
/// modified base is always the leading C.
pub const CONTEXT_LABELS: [&str; NUM_CONTEXTS] = ["CA", "CC", "CG", "CT"];
/// Labels for reverse tables in the stranded output. Index i carries the
/// label of the reverse complement of index i.
pub const REV_CONTEXT_LABELS: [&str; NUM_CONTEXTS] = ["CT", "CG", "CC", "CA"];

/// Context label to a 256-long quality histogram, in insertion order.
pub type LabeledHistograms = IndexMap<String, Vec<u64>>;

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct StrandCombinedSummary {
    pub methyl: LabeledHistograms,
    pub hydroxy: LabeledHistograms,
}

impl StrandCombinedSummary {
    pub fn new(histograms: &ContextHistograms) -> Self {
        let fold = |kind: ModKind| {
            fold_strands(
                histograms.table(kind, Strand::Positive),
                histograms.table(kind, Strand::Negative),
            )
        };
        Self { methyl: fold(ModKind::Methyl), hydroxy: fold(ModKind::Hydroxy) }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct StrandResolvedSummary {
    pub methyl_fwd: LabeledHistograms,
    pub methyl_rev: LabeledHistograms,
    pub hydroxy_fwd: LabeledHistograms,
    pub hydroxy_rev: LabeledHistograms,
}

impl StrandResolvedSummary {
    pub fn new(histograms: &ContextHistograms) -> Self {
        let fwd = |kind: ModKind| {
            label_table(
                histograms.table(kind, Strand::Positive),
                &CONTEXT_LABELS,
            )
        };
        let rev = |kind: ModKind| {
            label_table(
                histograms.table(kind, Strand::Negative),
                &REV_CONTEXT_LABELS,
            )
        };
        Self {
            methyl_fwd: fwd(ModKind::Methyl),
            methyl_rev: rev(ModKind::Methyl),
            hydroxy_fwd: fwd(ModKind::Hydroxy),
            hydroxy_rev: rev(ModKind::Hydroxy),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModContextSummary {
    Combined(StrandCombinedSummary),
    Stranded(StrandResolvedSummary),
}

impl ModContextSummary {
    pub fn new(histograms: &ContextHistograms, stranded: bool) -> Self {
        if stranded {
            Self::Stranded(StrandResolvedSummary::new(histograms))
        } else {
            Self::Combined(StrandCombinedSummary::new(histograms))
        }
    }
}

/// Add each reverse-strand histogram into the forward-strand histogram of
/// the complementary context.
fn fold_strands(fwd: &ContextTable, rev: &ContextTable) -> LabeledHistograms {
    DnaBase::ALL
        .iter()
        .map(|&context| {
            let combined = fwd
                .histogram(context)
                .iter()
                .zip(rev.histogram(context.complement()).iter())
                .map(|(f, r)| f + r)
                .collect::<Vec<u64>>();
            (CONTEXT_LABELS[context.index()].to_string(), combined)
        })
        .collect()
}

fn label_table(
    table: &ContextTable,
    labels: &[&str; NUM_CONTEXTS],
) -> LabeledHistograms {
    table
        .iter()
        .zip(labels.iter())
        .map(|(hist, label)| (label.to_string(), hist.to_vec()))
        .collect()
}

#[cfg(test)]
mod summarize_tests {
    use super::*;
    use crate::histogram::NUM_QUALS;
    use crate::mod_calls::{ModCall, ModCallRecord, PositionCalls};

    fn paired(position: usize, h: u8, m: u8) -> PositionCalls {
        PositionCalls::new(
            position,
            vec![
                ModCall::new(ModKind::Hydroxy, h),
                ModCall::new(ModKind::Methyl, m),
            ],
        )
    }

    fn histograms_from(records: &[ModCallRecord]) -> ContextHistograms {
        let mut histograms = ContextHistograms::new();
        records.iter().for_each(|r| histograms.add_record(r));
        histograms
    }

    fn nonzero(hists: &LabeledHistograms) -> Vec<(String, usize, u64)> {
        hists
            .iter()
            .flat_map(|(label, hist)| {
                hist.iter().enumerate().filter(|(_, n)| **n > 0).map(
                    move |(q, n)| (label.clone(), q, *n),
                )
            })
            .collect()
    }

    #[test]
    fn test_combined_forward_record() {
        let histograms = histograms_from(&[ModCallRecord::new(
            b"ACGT",
            Strand::Positive,
            vec![paired(0, 10, 20)],
        )]);
        let summary = StrandCombinedSummary::new(&histograms);
        assert_eq!(
            summary.methyl.keys().collect::<Vec<_>>(),
            vec!["CA", "CC", "CG", "CT"]
        );
        assert!(summary.methyl.values().all(|h| h.len() == NUM_QUALS));
        assert_eq!(nonzero(&summary.methyl), vec![("CC".to_string(), 20, 1)]);
        assert_eq!(nonzero(&summary.hydroxy), vec![("CC".to_string(), 10, 1)]);
    }

    #[test]
    fn test_stranded_reverse_record() {
        // neighbor G on the reverse strand
        let histograms = histograms_from(&[ModCallRecord::new(
            b"ACGT",
            Strand::Negative,
            vec![paired(3, 5, 7)],
        )]);
        let summary = StrandResolvedSummary::new(&histograms);
        assert_eq!(
            summary.methyl_rev.keys().collect::<Vec<_>>(),
            vec!["CT", "CG", "CC", "CA"]
        );
        assert_eq!(
            summary.methyl_fwd.keys().collect::<Vec<_>>(),
            vec!["CA", "CC", "CG", "CT"]
        );
        let g_label = REV_CONTEXT_LABELS[DnaBase::G.index()];
        assert_eq!(g_label, "CC");
        assert_eq!(summary.methyl_rev[g_label][7], 1);
        let cc = "CC".to_string();
        assert_eq!(nonzero(&summary.methyl_rev), vec![(cc.clone(), 7, 1)]);
        assert_eq!(nonzero(&summary.hydroxy_rev), vec![(cc.clone(), 5, 1)]);
        assert!(nonzero(&summary.methyl_fwd).is_empty());
        assert!(nonzero(&summary.hydroxy_fwd).is_empty());

        // folded into the complement of G
        let combined = StrandCombinedSummary::new(&histograms);
        assert_eq!(nonzero(&combined.methyl), vec![(cc, 7, 1)]);
    }

    #[test]
    fn test_combined_is_sum_of_stranded_by_label() {
        let seq = b"CACCGCTCNCAG";
        let records = (0..seq.len())
            .flat_map(|p| {
                [
                    ModCallRecord::new(
                        seq,
                        Strand::Positive,
                        vec![paired(p, p as u8, 100 + p as u8)],
                    ),
                    ModCallRecord::new(
                        seq,
                        Strand::Negative,
                        vec![paired(p, 2 * p as u8, 50 + p as u8)],
                    ),
                ]
            })
            .collect::<Vec<ModCallRecord>>();
        let histograms = histograms_from(&records);
        let combined = StrandCombinedSummary::new(&histograms);
        let stranded = StrandResolvedSummary::new(&histograms);
        for label in CONTEXT_LABELS {
            for q in 0..NUM_QUALS {
                assert_eq!(
                    combined.methyl[label][q],
                    stranded.methyl_fwd[label][q]
                        + stranded.methyl_rev[label][q]
                );
                assert_eq!(
                    combined.hydroxy[label][q],
                    stranded.hydroxy_fwd[label][q]
                        + stranded.hydroxy_rev[label][q]
                );
            }
        }
        // by index, forward i pairs with reverse 3 - i
        let fwd = histograms.table(ModKind::Methyl, Strand::Positive);
        let rev = histograms.table(ModKind::Methyl, Strand::Negative);
        for base in DnaBase::ALL {
            let label = CONTEXT_LABELS[base.index()];
            let rev_base = DnaBase::from_index(NUM_CONTEXTS - 1 - base.index())
                .unwrap();
            for q in 0..NUM_QUALS {
                assert_eq!(
                    combined.methyl[label][q],
                    fwd.histogram(base)[q] + rev.histogram(rev_base)[q]
                );
            }
        }
        let total_combined = combined
            .methyl
            .values()
            .chain(combined.hydroxy.values())
            .flatten()
            .sum::<u64>();
        assert_eq!(total_combined, histograms.total_calls());
    }

    #[test]
    fn test_empty_histograms_serialize_all_keys() {
        let histograms = ContextHistograms::new();
        let summary = ModContextSummary::new(&histograms, true);
        let value = serde_json::to_value(&summary).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        for key in ["methyl_fwd", "methyl_rev", "hydroxy_fwd", "hydroxy_rev"] {
            let hists = obj[key].as_object().unwrap();
            assert_eq!(hists.len(), 4);
            assert!(hists.values().all(|h| {
                let h = h.as_array().unwrap();
                h.len() == NUM_QUALS && h.iter().all(|n| n.as_u64() == Some(0))
            }));
        }
        let summary = ModContextSummary::new(&histograms, false);
        let value = serde_json::to_value(&summary).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>().len(), 2);
        assert!(obj.contains_key("methyl") && obj.contains_key("hydroxy"));
    }
}
