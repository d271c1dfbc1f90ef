#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

impl LayerId {
    pub const MARKERS: LayerId = LayerId(1);
    pub const ROUTES: LayerId = LayerId(2);
}

pub trait Layer {
    fn id(&self) -> LayerId;
}
