use std::fmt;

/// The seven named JSON resources that make up a dataset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Places,
    People,
    Events,
    Passages,
    Journeys,
    Routes,
    Tours,
}

impl Resource {
    /// Load order. Every resource is attempted regardless of earlier failures.
    pub const ALL: [Resource; 7] = [
        Resource::Places,
        Resource::People,
        Resource::Events,
        Resource::Passages,
        Resource::Journeys,
        Resource::Routes,
        Resource::Tours,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Resource::Places => "places",
            Resource::People => "people",
            Resource::Events => "events",
            Resource::Passages => "passages",
            Resource::Journeys => "journeys",
            Resource::Routes => "routes",
            Resource::Tours => "tours",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.json", self.name())
    }

    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
