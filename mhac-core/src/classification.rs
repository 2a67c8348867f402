use std::fmt::Display;

/// ASPRS standard LAS classification codes used by the MHAC pipeline
pub mod codes {
    pub const CREATED_NEVER_CLASSIFIED: u8 = 0;
    pub const UNCLASSIFIED: u8 = 1;
    pub const GROUND: u8 = 2;
    pub const LOW_VEGETATION: u8 = 3;
    pub const MEDIUM_VEGETATION: u8 = 4;
    pub const HIGH_VEGETATION: u8 = 5;
    pub const BUILDING: u8 = 6;
    pub const LOW_POINT: u8 = 7;
    pub const WATER: u8 = 9;
    pub const BRIDGE_DECK: u8 = 17;
    pub const HIGH_NOISE: u8 = 18;
    /// Overhead structure (LAS 1.4 R15)
    pub const OVERHEAD_STRUCTURE: u8 = 19;
}

/// Returns a human readable name for the given classification code
pub fn classification_name(code: u8) -> &'static str {
    match code {
        codes::CREATED_NEVER_CLASSIFIED => "Created, never classified",
        codes::UNCLASSIFIED => "Unclassified",
        codes::GROUND => "Ground",
        codes::LOW_VEGETATION => "Low vegetation",
        codes::MEDIUM_VEGETATION => "Medium vegetation",
        codes::HIGH_VEGETATION => "High vegetation",
        codes::BUILDING => "Building",
        codes::LOW_POINT => "Low point",
        8 => "Model key-point",
        codes::WATER => "Water",
        10 => "Rail",
        11 => "Road surface",
        13 => "Wire guard",
        14 => "Wire conductor",
        15 => "Transmission tower",
        16 => "Wire-structure connector",
        codes::BRIDGE_DECK => "Bridge deck",
        codes::HIGH_NOISE => "High noise",
        codes::OVERHEAD_STRUCTURE => "Overhead structure",
        _ => "Reserved / user defined",
    }
}

/// Selects points by their classification code
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ClassFilter {
    /// Keep only points whose code is in the list
    Include(Vec<u8>),
    /// Keep all points except those whose code is in the list
    Exclude(Vec<u8>),
}

impl ClassFilter {
    /// Vegetation (3, 4, 5) and overhead structures (19) removed, everything else kept
    pub fn without_vegetation() -> Self {
        Self::Exclude(vec![
            codes::LOW_VEGETATION,
            codes::MEDIUM_VEGETATION,
            codes::HIGH_VEGETATION,
            codes::OVERHEAD_STRUCTURE,
        ])
    }

    /// Building points only
    pub fn buildings_only() -> Self {
        Self::Include(vec![codes::BUILDING])
    }

    /// Returns true if a point with the given classification passes this filter
    /// ```
    /// # use mhac_core::classification::{ClassFilter, codes};
    /// let filter = ClassFilter::without_vegetation();
    /// assert!(filter.accepts(codes::BUILDING));
    /// assert!(!filter.accepts(codes::HIGH_VEGETATION));
    /// ```
    pub fn accepts(&self, classification: u8) -> bool {
        match self {
            ClassFilter::Include(codes) => codes.contains(&classification),
            ClassFilter::Exclude(codes) => !codes.contains(&classification),
        }
    }
}

impl Default for ClassFilter {
    fn default() -> Self {
        Self::without_vegetation()
    }
}

impl Display for ClassFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (op, codes) = match self {
            ClassFilter::Include(codes) => ("Classification in", codes),
            ClassFilter::Exclude(codes) => ("Classification not in", codes),
        };
        let codes = codes
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{} [{}]", op, codes)
    }
}
