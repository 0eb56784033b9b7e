use crate::geography::Location;

/// Metadata read from or written to an image
///
/// `date_time`, `camera_make` and `camera_model` are provenance fields. They
/// are reported by readers but never written.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct MetadataInfo {
    pub gps: Option<Location>,
    /// Comma-joined list of tags
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub date_time: Option<String>,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
}

impl MetadataInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gps(mut self, gps: Location) -> Self {
        self.gps = Some(gps);
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether any of the writable fields is set
    pub fn has_writable_fields(&self) -> bool {
        self.gps.is_some() || self.keywords.is_some() || self.description.is_some()
    }

    /// Fills fields that are unset with the values from `other`
    ///
    /// ```
    /// # use geostamp_common::metadata::MetadataInfo;
    /// let mut a = MetadataInfo::new().with_description("first");
    /// let b = MetadataInfo::new()
    ///     .with_description("second")
    ///     .with_keywords("a,b");
    /// a.merge_missing(b);
    /// assert_eq!(a.description.as_deref(), Some("first"));
    /// assert_eq!(a.keywords.as_deref(), Some("a,b"));
    /// ```
    pub fn merge_missing(&mut self, other: MetadataInfo) {
        let MetadataInfo {
            gps,
            keywords,
            description,
            date_time,
            camera_make,
            camera_model,
        } = other;

        self.gps = self.gps.or(gps);
        self.keywords = self.keywords.take().or(keywords);
        self.description = self.description.take().or(description);
        self.date_time = self.date_time.take().or(date_time);
        self.camera_make = self.camera_make.take().or(camera_make);
        self.camera_model = self.camera_model.take().or(camera_model);
    }
}
