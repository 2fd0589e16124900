//! Flow identifiers and the threshold classifier.

/// One of the two traffic classes a PIFO multiplexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flow {
    /// Flow 0: values at or below the boundary.
    Zero,
    /// Flow 1: values above the boundary.
    One,
}

impl Flow {
    /// Returns both flows in index order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Zero, Self::One]
    }

    /// Returns the sub-queue index for this flow.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }

    /// Returns the sibling flow.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Zero => Self::One,
            Self::One => Self::Zero,
        }
    }

    /// Returns the flow for a sub-queue index, if valid.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Zero),
            1 => Some(Self::One),
            _ => None,
        }
    }
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "flow{}", self.index())
    }
}

/// Routes a value to a flow by comparing it against a fixed boundary.
///
/// Values `<= boundary` belong to [`Flow::Zero`], everything else to
/// [`Flow::One`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowClassifier<V> {
    boundary: V,
}

impl<V: Copy + Ord> FlowClassifier<V> {
    /// Creates a classifier with the given boundary.
    #[must_use]
    pub const fn new(boundary: V) -> Self {
        Self { boundary }
    }

    /// Returns the boundary.
    #[must_use]
    pub const fn boundary(&self) -> V {
        self.boundary
    }

    /// Returns the flow `value` belongs to.
    #[must_use]
    pub fn classify(&self, value: V) -> Flow {
        if value <= self.boundary {
            Flow::Zero
        } else {
            Flow::One
        }
    }
}
