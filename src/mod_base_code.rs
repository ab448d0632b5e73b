use log_once::debug_once;

/// Number of canonical bases that can form a context.
pub const NUM_CONTEXTS: usize = 4;

/// ChEBI identifier for 5-methylcytosine.
pub const METHYL_CHEBI: i32 = 27551;
/// ChEBI identifier for 5-hydroxymethylcytosine.
pub const HYDROXY_CHEBI: i32 = 76792;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum DnaBase {
    A,
    C,
    G,
    T,
}

impl DnaBase {
    pub const ALL: [DnaBase; NUM_CONTEXTS] =
        [DnaBase::A, DnaBase::C, DnaBase::G, DnaBase::T];

    /// Classify the base adjacent to a modified cytosine. Only the four
    /// canonical upper-case bases form a context, everything else (N,
    /// lower-case, the NUL used for a missing neighbor) is `None`.
    #[inline]
    pub fn classify(nt: u8) -> Option<Self> {
        match nt {
            b'A' => Some(Self::A),
            b'C' => Some(Self::C),
            b'G' => Some(Self::G),
            b'T' => Some(Self::T),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::C => 1,
            Self::G => 2,
            Self::T => 3,
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn complement(self) -> Self {
        match self {
            Self::A => Self::T,
            Self::C => Self::G,
            Self::G => Self::C,
            Self::T => Self::A,
        }
    }
}

/// The two cytosine modifications that are histogrammed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum ModKind {
    /// 5hmC, 'h'
    Hydroxy,
    /// 5mC, 'm'
    Methyl,
}

impl ModKind {
    /// Parse the modification code as reported by htslib, positive values
    /// are single letter codes and negative values are ChEBI identifiers.
    pub fn from_htslib_code(code: i32) -> Option<Self> {
        if code < 0 {
            return match code.saturating_neg() {
                METHYL_CHEBI => Some(Self::Methyl),
                HYDROXY_CHEBI => Some(Self::Hydroxy),
                chebi => {
                    debug_once!("ignoring modification with ChEBI {chebi}");
                    None
                }
            };
        }
        match u8::try_from(code).map(char::from) {
            Ok('m') => Some(Self::Methyl),
            Ok('h') => Some(Self::Hydroxy),
            Ok(c) => {
                debug_once!("ignoring modification code {c}");
                None
            }
            Err(_) => {
                debug_once!("ignoring unknown modification code {code}");
                None
            }
        }
    }

    /// Single letter code as written in the MM tag.
    pub fn char(&self) -> char {
        match self {
            Self::Methyl => 'm',
            Self::Hydroxy => 'h',
        }
    }
}
