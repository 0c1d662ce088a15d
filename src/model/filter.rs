/// Query-string keys that may be used to filter surveys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    SurveyRef,
    ShortName,
    LongName,
}

impl FilterKey {
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "surveyRef" => Some(Self::SurveyRef),
            "shortName" => Some(Self::ShortName),
            "longName" => Some(Self::LongName),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::SurveyRef => "survey_ref",
            Self::ShortName => "short_name",
            Self::LongName => "long_name",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SurveyRef => "surveyRef",
            Self::ShortName => "shortName",
            Self::LongName => "longName",
        }
    }
}

/// Raw filter pairs taken from a request, in first-appearance order.
///
/// Keys are not validated here; an unrecognised key is rejected when the
/// predicate is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    entries: Vec<(String, String)>,
}

impl FilterSet {
    /// Build from query pairs. A repeated key keeps its first value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (key, value) in pairs {
            if entries.iter().any(|(existing, _)| *existing == key) {
                continue;
            }
            entries.push((key, value));
        }
        Self { entries }
    }

    pub fn by_reference(reference: &str) -> Self {
        Self {
            entries: vec![(FilterKey::SurveyRef.as_str().to_string(), reference.to_string())],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
