use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::slice;

/// One discovered occurrence of a build artifact (for example a jar in the Bazel output tree).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDescriptor {
    /// Identifies this occurrence; unique among the locations of one artifact.
    pub location_identifier: String,
    /// The Bazel label that produced (or imports) the artifact.
    pub label: String,
    #[serde(default)]
    pub version: String,
    /// Age of the artifact in days, `None` if it could not be determined.
    ///
    /// Serialized as `-1` when unknown; any negative value reads back as unknown.
    #[serde(
        default,
        serialize_with = "serialize_age",
        deserialize_with = "deserialize_age"
    )]
    pub age_in_days: Option<u32>,
}

impl LocationDescriptor {
    pub fn new(
        location_identifier: impl Into<String>,
        label: impl Into<String>,
        version: impl Into<String>,
        age_in_days: Option<u32>,
    ) -> Self {
        Self {
            location_identifier: location_identifier.into(),
            label: label.into(),
            version: version.into(),
            age_in_days,
        }
    }
}

fn serialize_age<S: Serializer>(age: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
    match age {
        Some(days) => serializer.serialize_i64(i64::from(*days)),
        None => serializer.serialize_i64(-1),
    }
}

fn deserialize_age<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|days| u32::try_from(days).ok()))
}

/// All known locations of one indexed name.
///
/// Most artifacts are found exactly once, and an index build holds tens of thousands of
/// entries, so the single-location case is stored inline without a `Vec` allocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LocationEntry {
    #[default]
    Empty,
    Single(LocationDescriptor),
    /// Two or more locations in discovery order.
    Multiple(Vec<LocationDescriptor>),
}

impl LocationEntry {
    pub fn new(location: LocationDescriptor) -> Self {
        LocationEntry::Single(location)
    }

    /// Record another location.
    ///
    /// A location whose identifier is already present is ignored (the same file can be found
    /// twice, e.g. through a symlink). Returns whether the location was added.
    pub fn add_location(&mut self, location: LocationDescriptor) -> bool {
        if self.contains(&location.location_identifier) {
            return false;
        }

        *self = match std::mem::take(self) {
            LocationEntry::Empty => LocationEntry::Single(location),
            LocationEntry::Single(existing) => LocationEntry::Multiple(vec![existing, location]),
            LocationEntry::Multiple(mut locations) => {
                locations.push(location);
                LocationEntry::Multiple(locations)
            }
        };
        true
    }

    /// The canonical location: the first one discovered.
    ///
    /// Only insertion order decides; callers should not read more into the choice.
    pub fn primary_location(&self) -> Option<&LocationDescriptor> {
        self.locations().first()
    }

    /// Every location, in discovery order.
    pub fn locations(&self) -> &[LocationDescriptor] {
        match self {
            LocationEntry::Empty => &[],
            LocationEntry::Single(location) => slice::from_ref(location),
            LocationEntry::Multiple(locations) => locations,
        }
    }

    pub fn contains(&self, location_identifier: &str) -> bool {
        self.locations()
            .iter()
            .any(|location| location.location_identifier == location_identifier)
    }

    pub fn len(&self) -> usize {
        self.locations().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, LocationEntry::Empty)
    }
}
