//! Keyword tables: category label → trigger phrases.
//!
//! Two tables drive classification: six municipal departments and three
//! priority levels. Tables are built once at startup and passed into the
//! [`Classifier`](crate::Classifier); nothing here is global state.
//!
//! Category order is significant. When two categories score the same, the one
//! added first wins.

use nagrik_core::Priority;

/// Ordered mapping from category label to lowercase trigger phrases.
///
/// Phrases match as substrings of normalised text, so overlapping phrases
/// ("leak" and "leakage") are allowed and each counts on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTable<L> {
    categories: Vec<(L, Vec<String>)>,
}

impl<L> Default for KeywordTable<L> {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
        }
    }
}

impl<L> KeywordTable<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a category. Phrases are lowercased and trimmed; empty phrases
    /// are dropped since they would match every text.
    pub fn with_category<I, S>(mut self, label: L, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        self.categories.push((label, phrases));
        self
    }

    /// Categories in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&L, &[String])> {
        self.categories
            .iter()
            .map(|(label, phrases)| (label, phrases.as_slice()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &L> {
        self.categories.iter().map(|(label, _)| label)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total trigger phrases across all categories.
    pub fn phrase_count(&self) -> usize {
        self.categories.iter().map(|(_, p)| p.len()).sum()
    }
}

/// Department table: Water, Electricity, Municipality, PWD, Police, Traffic.
pub fn department_table() -> KeywordTable<String> {
    KeywordTable::new()
        .with_category(
            "Water".to_string(),
            [
                "water", "supply", "no water", "pipeline", "pipe",
                "tap", "pressure", "tank", "leak", "leakage",
                "dirty water", "drinking water", "water shortage", "manhole", "open manhole",
            ],
        )
        .with_category(
            "Electricity".to_string(),
            [
                "electric", "electricity", "power", "current",
                "light", "lights", "streetlight",
                "wire", "spark", "shock",
                "transformer", "pole", "meter",
                "voltage", "power cut", "short circuit",
            ],
        )
        .with_category(
            "Municipality".to_string(),
            [
                "garbage", "waste", "dump", "dumping",
                "drain", "drains", "sewer", "sewage",
                "dirty", "smell", "mosquito",
                "sanitation", "toilet", "dustbin",
            ],
        )
        .with_category(
            "PWD".to_string(),
            [
                "road", "roads", "pothole", "potholes",
                "bridge", "flyover", "highway",
                "footpath", "divider", "culvert",
                "crack", "collapse", "asphalt",
                "construction", "speed breaker",
            ],
        )
        .with_category(
            "Police".to_string(),
            [
                "theft", "stolen", "robbery",
                "fight", "fighting", "quarrel",
                "harass", "harassment", "eve teasing",
                "crime", "criminal", "threat",
                "drunk", "alcohol", "drug",
                "noise", "loud", "disturbance",
                "security", "unsafe",
            ],
        )
        .with_category(
            "Traffic".to_string(),
            [
                "traffic", "signal", "signals",
                "parking", "jam", "congestion",
                "junction", "crossing",
                "wrong side", "accident",
                "rash driving", "speeding",
                "bus stop", "lane",
            ],
        )
}

/// Priority table: High, Medium, Low.
pub fn priority_table() -> KeywordTable<Priority> {
    KeywordTable::new()
        .with_category(
            Priority::High,
            [
                "live wire", "electric shock", "fire", "big jam",
                "collapse", "fallen", "burst",
                "open manhole", "accident", "danger",
                "emergency", "attack", "fight", "theft",
            ],
        )
        .with_category(
            Priority::Medium,
            [
                "not working", "damaged", "leak",
                "overflow", "blocked", "frequent",
                "low pressure", "delay",
            ],
        )
        .with_category(
            Priority::Low,
            [
                "dirty", "dust", "small", "minor",
                "slow", "dim", "maintenance",
            ],
        )
}
