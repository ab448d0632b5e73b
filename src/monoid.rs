use crate::histogram::ContextHistograms;

pub trait Moniod {
    fn zero() -> Self;
    fn op(self, other: Self) -> Self;
    fn op_mut(&mut self, other: Self);
}

impl Moniod for ContextHistograms {
    fn zero() -> Self {
        ContextHistograms::new()
    }

    fn op(self, other: Self) -> Self {
        let mut agg = self;
        agg.op_mut(other);
        agg
    }

    fn op_mut(&mut self, other: Self) {
        self.add_assign(&other);
    }
}
